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
use crate::data::dataset::Dataset;
use crate::data::factory;
use crate::data::stego_dataset::StegoDataset;
use crate::models::classifier::Classifier;
use crate::training::evaluator::{EvaluationReport, Evaluator};
use std::path::Path;
use std::sync::Arc;

pub mod core;
pub mod data;
pub mod metrics;
pub mod models;
pub mod training;
pub mod utilities;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const FRAMEWORK_NAME: &str = "Bellande Steganography Detection Framework";

pub struct Framework {
    config: utilities::config::Configuration,
}

impl Framework {
    pub fn new() -> Self {
        Framework {
            config: utilities::config::Configuration::default(),
        }
    }

    pub fn with_config<P: AsRef<Path>>(config_path: P) -> Result<Self, StegoError> {
        let config = utilities::config::Configuration::from_file(config_path)?;
        Ok(Framework { config })
    }

    pub fn from_config(config: utilities::config::Configuration) -> Result<Self, StegoError> {
        config.validate()?;
        Ok(Framework { config })
    }

    pub fn config(&self) -> &utilities::config::Configuration {
        &self.config
    }

    /// Train and test splits of the configured standard-layout data root.
    pub fn datasets(&self) -> Result<(StegoDataset, StegoDataset), StegoError> {
        factory::get_datasets(&self.config)
    }

    /// Scores `classifier` on `dataset` in file order.
    pub fn evaluate(
        &self,
        classifier: Box<dyn Classifier>,
        dataset: StegoDataset,
    ) -> Result<EvaluationReport, StegoError> {
        let dataset = Arc::new(dataset);
        let shared: Arc<dyn Dataset> = dataset.clone();
        let mut loader = factory::data_loader(&self.config, shared, false)?;
        Evaluator::new(classifier).evaluate(&mut loader, dataset.label_space())
    }

    pub fn get_version() -> &'static str {
        VERSION
    }

    pub fn get_name() -> &'static str {
        FRAMEWORK_NAME
    }

    pub fn system_info() -> String {
        format!(
            "{} v{}\n\
            CPU Threads: {}",
            FRAMEWORK_NAME,
            VERSION,
            num_cpus::get(),
        )
    }
}

impl Default for Framework {
    fn default() -> Self {
        Self::new()
    }
}
