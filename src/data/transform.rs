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

use crate::core::{
    error::StegoError,
    tensor::{PixelTensor, Tensor},
};
use crate::data::image_decoder::{decode_image, DecodedImage};
use std::path::Path;

/// Transformation applied to a decoded image before tensor conversion.
pub trait ImageTransform: Send + Sync {
    fn apply(&self, image: &DecodedImage) -> Result<DecodedImage, StegoError>;
    fn name(&self) -> &str;
}

/// Transformation applied to the raw pixel tensor.
pub trait Transform: Send + Sync {
    fn apply(&self, tensor: PixelTensor) -> Result<PixelTensor, StegoError>;
    fn name(&self) -> &str;
}

/// Zero padding on each edge of an image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Padding {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

/// Pads symmetrically with zeros up to the target size, then center crops.
///
/// Pixels are only ever copied, so the bit pattern of every retained pixel is
/// preserved. When the needed padding is odd the extra row or column goes to
/// the bottom or right edge. The crop offset is half the excess rounded half
/// to even, so an excess of 1 or 5 trims the extra row at the bottom while an
/// excess of 3 or 7 trims it at the top.
pub struct PadCenterCrop {
    height: usize,
    width: usize,
}

impl PadCenterCrop {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn padding(&self, height: usize, width: usize) -> Padding {
        let pad_h = self.height.saturating_sub(height);
        let pad_w = self.width.saturating_sub(width);
        Padding {
            top: pad_h / 2,
            bottom: pad_h - pad_h / 2,
            left: pad_w / 2,
            right: pad_w - pad_w / 2,
        }
    }

    pub fn pad(&self, image: &DecodedImage) -> Result<DecodedImage, StegoError> {
        let padding = self.padding(image.height(), image.width());
        if padding == (Padding { top: 0, bottom: 0, left: 0, right: 0 }) {
            return Ok(image.clone());
        }

        let channels = image.channels();
        let out_h = image.height() + padding.top + padding.bottom;
        let out_w = image.width() + padding.left + padding.right;
        let row_len = image.width() * channels;
        let mut padded = vec![0u8; out_h * out_w * channels];

        for (y, row) in image.pixels().chunks(row_len.max(1)).enumerate().take(image.height()) {
            let dst = ((y + padding.top) * out_w + padding.left) * channels;
            padded[dst..dst + row_len].copy_from_slice(row);
        }

        DecodedImage::new(out_w, out_h, image.channel(), padded)
    }

    pub fn center_crop(&self, image: &DecodedImage) -> Result<DecodedImage, StegoError> {
        if image.height() < self.height || image.width() < self.width {
            return Err(StegoError::InvalidShape(format!(
                "Crop size {}x{} larger than input size {}x{}",
                self.height,
                self.width,
                image.height(),
                image.width()
            )));
        }

        if image.height() == self.height && image.width() == self.width {
            return Ok(image.clone());
        }

        let channels = image.channels();
        let start_h = crop_offset(image.height() - self.height);
        let start_w = crop_offset(image.width() - self.width);
        let in_row = image.width() * channels;
        let out_row = self.width * channels;
        let mut cropped = Vec::with_capacity(self.height * out_row);

        for h in 0..self.height {
            let src = (start_h + h) * in_row + start_w * channels;
            cropped.extend_from_slice(&image.pixels()[src..src + out_row]);
        }

        DecodedImage::new(self.width, self.height, image.channel(), cropped)
    }
}

/// `excess / 2` rounded half to even.
pub fn crop_offset(excess: usize) -> usize {
    let half = excess / 2;
    half + (half & excess & 1)
}

impl ImageTransform for PadCenterCrop {
    fn apply(&self, image: &DecodedImage) -> Result<DecodedImage, StegoError> {
        self.center_crop(&self.pad(image)?)
    }

    fn name(&self) -> &str {
        "PadCenterCrop"
    }
}

/// HWC bytes to a CHW pixel tensor, values untouched.
pub struct ToTensor;

impl ToTensor {
    pub fn convert(&self, image: &DecodedImage) -> Result<PixelTensor, StegoError> {
        let (height, width, channels) = (image.height(), image.width(), image.channels());
        let plane = height * width;
        let mut data = vec![0u8; channels * plane];

        for (idx, pixel) in image.pixels().chunks(channels).enumerate() {
            for (c, &value) in pixel.iter().enumerate() {
                data[c * plane + idx] = value;
            }
        }

        PixelTensor::new(data, vec![channels, height, width])
    }

    pub fn name(&self) -> &str {
        "ToTensor"
    }
}

/// Replaces every value by its least significant bit.
pub struct ExtractLsb;

impl Transform for ExtractLsb {
    fn apply(&self, tensor: PixelTensor) -> Result<PixelTensor, StegoError> {
        Ok(tensor.map(|value| value & 1))
    }

    fn name(&self) -> &str {
        "ExtractLsb"
    }
}

/// Casts pixels to `f32` without rescaling (1 stays 1.0).
pub struct ToDtype;

impl ToDtype {
    pub fn cast(&self, tensor: &PixelTensor) -> Tensor {
        tensor.to_float()
    }

    pub fn name(&self) -> &str {
        "ToDtype"
    }
}

/// The fixed per-sample pipeline: pad/crop, tensor conversion, optional LSB
/// extraction, dtype cast. Stage order cannot be changed.
pub struct TransformPipeline {
    resize: PadCenterCrop,
    to_tensor: ToTensor,
    extract_lsb: Option<ExtractLsb>,
    to_dtype: ToDtype,
}

impl TransformPipeline {
    pub fn new(image_size: usize, extract_lsb: bool) -> Self {
        TransformPipeline {
            resize: PadCenterCrop::square(image_size),
            to_tensor: ToTensor,
            extract_lsb: extract_lsb.then_some(ExtractLsb),
            to_dtype: ToDtype,
        }
    }

    /// Names of the active stages, in application order.
    pub fn stage_names(&self) -> Vec<&str> {
        let mut names = vec![self.resize.name(), self.to_tensor.name()];
        if let Some(lsb) = &self.extract_lsb {
            names.push(lsb.name());
        }
        names.push(self.to_dtype.name());
        names
    }

    pub fn apply(&self, image: &DecodedImage) -> Result<Tensor, StegoError> {
        let resized = self.resize.apply(image)?;
        let mut pixels = self.to_tensor.convert(&resized)?;
        if let Some(lsb) = &self.extract_lsb {
            pixels = lsb.apply(pixels)?;
        }
        Ok(self.to_dtype.cast(&pixels))
    }

    /// Decodes `path` and runs the pipeline; decode failures are returned.
    pub fn load(&self, path: &Path) -> Result<Tensor, StegoError> {
        let image = decode_image(path)?;
        self.apply(&image)
    }
}
