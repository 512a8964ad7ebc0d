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
use crate::data::stego_type::IndexedClass;

/// Number of positions where prediction and label agree, and the label count.
pub fn accuracy<T: PartialEq>(predicted: &[T], labels: &[T]) -> (usize, usize) {
    let correct = predicted
        .iter()
        .zip(labels.iter())
        .filter(|(p, l)| p == l)
        .count();
    (correct, labels.len())
}

/// Regroups a flat prediction stream into one `(correct, total)` bucket per class.
///
/// Both `predictions` and `labels` are registry bitmasks, not dense indices.
/// A pair is counted in every bucket whose bit is set in its label, so a label
/// with several bits lands in several buckets and a label with no known bit in
/// none. The output has one entry per dense index in `classes`; buckets that
/// receive nothing stay `(0, 0)`.
pub fn per_class_accuracy(
    predictions: &[u32],
    labels: &[u32],
    classes: &[IndexedClass],
) -> Vec<(usize, usize)> {
    let buckets = classes.iter().map(|c| c.index + 1).max().unwrap_or(0);
    let mut accuracies = vec![(0, 0); buckets];

    for (&prediction, &label) in predictions.iter().zip(labels.iter()) {
        for class in classes {
            if label & class.entry.bitmask != 0 {
                let (correct, total) = &mut accuracies[class.index];
                if prediction == label {
                    *correct += 1;
                }
                *total += 1;
            }
        }
    }

    accuracies
}

/// `correct / total`, or 0 for an empty bucket.
pub fn ratio(correct: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        correct as f32 / total as f32
    }
}

pub trait Metric {
    fn reset(&mut self);
    fn update(&mut self, prediction: &Tensor, target: &[usize]) -> Result<(), StegoError>;
    fn compute(&self) -> f32;
    fn name(&self) -> &str;
}

#[derive(Debug, Default)]
pub struct Accuracy {
    correct: usize,
    total: usize,
}

impl Accuracy {
    pub fn new() -> Self {
        Accuracy {
            correct: 0,
            total: 0,
        }
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.correct, self.total)
    }
}

impl Metric for Accuracy {
    fn reset(&mut self) {
        self.correct = 0;
        self.total = 0;
    }

    fn update(&mut self, prediction: &Tensor, target: &[usize]) -> Result<(), StegoError> {
        let pred_classes = prediction.argmax_rows()?;
        if pred_classes.len() != target.len() {
            return Err(StegoError::ShapeMismatch(format!(
                "{} predictions for {} targets",
                pred_classes.len(),
                target.len()
            )));
        }

        let (correct, total) = accuracy(&pred_classes, target);
        self.correct += correct;
        self.total += total;
        Ok(())
    }

    fn compute(&self) -> f32 {
        ratio(self.correct, self.total)
    }

    fn name(&self) -> &str {
        "accuracy"
    }
}
