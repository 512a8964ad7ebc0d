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

use crate::core::{error::StegoError, tensor::Tensor};

/// Image classifier scoring a batch of transformed images.
pub trait Classifier: Send + Sync {
    /// Forward pass: `(batch, C, H, W)` images to `(batch, num_classes)` scores
    /// (logits or probabilities).
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, StegoError>;

    /// Number of output classes
    fn num_classes(&self) -> usize;

    /// Set model to evaluation mode
    fn eval(&mut self) {}
}

/// Checks that `scores` has shape `(batch, num_classes)`.
pub fn check_scores(scores: &Tensor, batch: usize, num_classes: usize) -> Result<(), StegoError> {
    if scores.shape() != [batch, num_classes].as_slice() {
        return Err(StegoError::ShapeMismatch(format!(
            "classifier returned shape {:?}, expected [{}, {}]",
            scores.shape(),
            batch,
            num_classes
        )));
    }
    Ok(())
}
