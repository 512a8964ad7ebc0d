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
use crate::data::dataloader::DataLoader;
use crate::data::label_space::LabelSpace;
use crate::metrics::metrics::{per_class_accuracy, ratio, Accuracy, Metric};
use crate::models::classifier::{check_scores, Classifier};

/// Accuracy of a single class bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassAccuracy {
    pub name: String,
    pub correct: usize,
    pub total: usize,
}

impl ClassAccuracy {
    pub fn accuracy(&self) -> f32 {
        ratio(self.correct, self.total)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationReport {
    pub correct: usize,
    pub total: usize,
    pub per_class: Vec<ClassAccuracy>,
}

impl EvaluationReport {
    /// Overall accuracy in percent, rounded to three decimals.
    pub fn accuracy_percent(&self) -> f32 {
        round3(100.0 * ratio(self.correct, self.total))
    }
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

pub struct Evaluator {
    classifier: Box<dyn Classifier>,
}

impl Evaluator {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Evaluator { classifier }
    }

    /// Runs one pass over `loader`, scoring overall and per-class accuracy.
    ///
    /// The loader yields dense labels; both labels and predictions are mapped
    /// to registry bitmasks through `label_space` before per-class regrouping.
    pub fn evaluate(
        &mut self,
        loader: &mut DataLoader,
        label_space: &LabelSpace,
    ) -> Result<EvaluationReport, StegoError> {
        let num_classes = label_space.num_classes();
        if self.classifier.num_classes() != num_classes {
            return Err(StegoError::ConfigurationError(format!(
                "classifier predicts {} classes but the dataset has {}",
                self.classifier.num_classes(),
                num_classes
            )));
        }

        self.classifier.eval();

        let mut metric = Accuracy::new();
        let mut predicted_bits = Vec::new();
        let mut label_bits = Vec::new();

        for batch in loader.iter() {
            let batch = batch?;
            let scores = self.classifier.forward(&batch.images)?;
            check_scores(&scores, batch.len(), num_classes)?;

            metric.update(&scores, &batch.labels)?;
            let predicted = scores.argmax_rows()?;

            predicted_bits.extend(label_space.to_bitmasks(&predicted)?);
            label_bits.extend(label_space.to_bitmasks(&batch.labels)?);

            log::debug!("{}: {:.3}%", metric.name(), round3(100.0 * metric.compute()));
        }

        let buckets = per_class_accuracy(
            &predicted_bits,
            &label_bits,
            &label_space.indexed_classes(),
        );
        let per_class = label_space
            .classes()
            .iter()
            .zip(buckets)
            .map(|(class, (correct, total))| ClassAccuracy {
                name: class.name.clone(),
                correct,
                total,
            })
            .collect();

        let (correct, total) = metric.counts();
        let report = EvaluationReport {
            correct,
            total,
            per_class,
        };
        log::info!("Accuracy at end of epoch: {}%", report.accuracy_percent());
        Ok(report)
    }
}
