// Copyright (C) 2024 Bellande Artificial Intelligence Computer Vision Research Innovation Center, Ronaldson Bellande

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::core::error::StegoError;

/// Floating point tensor in row-major (C-contiguous) layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
}

/// Raw 8-bit pixel tensor, the representation between decoding and the dtype cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelTensor {
    pub data: Vec<u8>,
    pub shape: Vec<usize>,
}

impl Tensor {
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, StegoError> {
        check_size(data.len(), &shape)?;
        Ok(Tensor { data, shape })
    }

    pub fn zeros(shape: &[usize]) -> Self {
        let size = shape.iter().product();
        Tensor {
            data: vec![0.0; size],
            shape: shape.to_vec(),
        }
    }

    // Data access methods
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn stride(&self) -> Vec<usize> {
        compute_strides(&self.shape)
    }

    /// Element at a full multi-dimensional index, `None` when out of bounds.
    pub fn get(&self, indices: &[usize]) -> Option<f32> {
        flat_index(indices, &self.shape).map(|idx| self.data[idx])
    }

    /// Index of the largest value in every row of a `(rows, columns)` tensor.
    pub fn argmax_rows(&self) -> Result<Vec<usize>, StegoError> {
        let [rows, columns] = self.shape[..] else {
            return Err(StegoError::InvalidShape(format!(
                "argmax expects a 2D tensor, got shape {:?}",
                self.shape
            )));
        };

        if columns == 0 {
            return Err(StegoError::InvalidShape(
                "argmax over zero columns".to_string(),
            ));
        }

        Ok(self
            .data
            .chunks(columns)
            .take(rows)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f32::NEG_INFINITY), |best, (idx, &value)| {
                        if value > best.1 {
                            (idx, value)
                        } else {
                            best
                        }
                    })
                    .0
            })
            .collect())
    }
}

impl PixelTensor {
    pub fn new(data: Vec<u8>, shape: Vec<usize>) -> Result<Self, StegoError> {
        check_size(data.len(), &shape)?;
        Ok(PixelTensor { data, shape })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn get(&self, indices: &[usize]) -> Option<u8> {
        flat_index(indices, &self.shape).map(|idx| self.data[idx])
    }

    /// Applies `f` to every element, keeping the shape.
    pub fn map(self, f: impl Fn(u8) -> u8) -> PixelTensor {
        PixelTensor {
            data: self.data.into_iter().map(f).collect(),
            shape: self.shape,
        }
    }

    /// Widens every element to `f32` without rescaling.
    pub fn to_float(&self) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&v| f32::from(v)).collect(),
            shape: self.shape.clone(),
        }
    }
}

fn check_size(len: usize, shape: &[usize]) -> Result<(), StegoError> {
    let size: usize = shape.iter().product();
    if len != size {
        return Err(StegoError::ShapeMismatch(format!(
            "data of length {} does not fit shape {:?}",
            len, shape
        )));
    }
    Ok(())
}

fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut stride = Vec::with_capacity(shape.len());
    let mut current_stride = 1;
    for &dim in shape.iter().rev() {
        stride.push(current_stride);
        current_stride *= dim;
    }
    stride.reverse();
    stride
}

fn flat_index(indices: &[usize], shape: &[usize]) -> Option<usize> {
    if indices.len() != shape.len() || indices.iter().zip(shape).any(|(&i, &d)| i >= d) {
        return None;
    }

    Some(
        indices
            .iter()
            .zip(compute_strides(shape))
            .map(|(&i, s)| i * s)
            .sum(),
    )
}
