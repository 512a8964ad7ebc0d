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
use crate::data::dataset_spec::{
    ColorChannel, DatasetLayout, DatasetMode, DatasetSpec, DEFAULT_IMAGE_SIZE,
};
use crate::data::stego_type::{SteganographyType, TypeRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CUSTOM_IMAGE_SIZE: usize = 128;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Configuration {
    // Dataset configuration
    pub data: DataConfig,

    // Batching configuration
    pub loader: LoaderConfig,

    // System configuration
    pub system: SystemConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Holds the `train`, `test` and `val` split directories.
    pub data_root: PathBuf,
    /// Holds the `<name><Mode>` directories of the custom layout.
    pub custom_root: PathBuf,
    pub dataset_types: Vec<String>,
    pub custom_types: Vec<String>,
    pub color_channel: ColorChannel,
    pub image_size: usize,
    pub custom_image_size: usize,
    pub extract_lsb: bool,
    pub down_sample_size_train: Option<usize>,
    pub down_sample_size_test: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    pub batch_size: usize,
    pub shuffle: bool,
    pub num_workers: usize,
    pub drop_last: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SystemConfig {
    pub seed: Option<u64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            data_root: PathBuf::from("data"),
            custom_root: PathBuf::from("data/CustomStego"),
            dataset_types: SteganographyType::ALL
                .iter()
                .map(|t| t.name().to_string())
                .collect(),
            custom_types: Vec::new(),
            color_channel: ColorChannel::default(),
            image_size: DEFAULT_IMAGE_SIZE,
            custom_image_size: DEFAULT_CUSTOM_IMAGE_SIZE,
            extract_lsb: false,
            down_sample_size_train: None,
            down_sample_size_test: None,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            batch_size: 32,
            shuffle: true,
            num_workers: num_cpus::get(),
            drop_last: false,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            data: DataConfig::default(),
            loader: LoaderConfig::default(),
            system: SystemConfig::default(),
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

impl Configuration {
    /// Reads a configuration from YAML, or JSON when the file ends in `.json`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Configuration = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        // Validate batching
        if self.loader.batch_size == 0 {
            return Err(StegoError::ConfigurationError(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if self.loader.num_workers == 0 {
            return Err(StegoError::ConfigurationError(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        // Validate image geometry
        if self.data.image_size == 0 || self.data.custom_image_size == 0 {
            return Err(StegoError::ConfigurationError(
                "Image size must be greater than 0".to_string(),
            ));
        }

        // Validate down sample caps
        for (split, cap) in [
            ("train", self.data.down_sample_size_train),
            ("test", self.data.down_sample_size_test),
        ] {
            if cap == Some(0) {
                return Err(StegoError::ConfigurationError(format!(
                    "0 is too small for the {} down sample size",
                    split
                )));
            }
        }

        // Standard class names must exist before any directory is touched
        TypeRegistry::standard().resolve(&self.data.dataset_types)?;
        if !self.data.custom_types.is_empty() {
            TypeRegistry::custom(&self.data.custom_types)?;
        }

        Ok(())
    }

    /// Spec of a standard-layout split rooted at `<data_root>/<mode>`.
    pub fn dataset_spec(&self, mode: DatasetMode) -> DatasetSpec {
        DatasetSpec::new(
            self.data.data_root.join(mode.as_str()),
            &self.data.dataset_types,
            mode,
        )
        .with_color_channel(self.data.color_channel)
        .with_down_sample_size(self.down_sample_size(mode))
        .with_image_size(self.data.image_size)
        .with_extract_lsb(self.data.extract_lsb)
    }

    /// Spec of a custom-layout split rooted at `custom_root`.
    pub fn custom_dataset_spec(&self, mode: DatasetMode) -> DatasetSpec {
        DatasetSpec::new(&self.data.custom_root, &self.data.custom_types, mode)
            .with_layout(DatasetLayout::Custom)
            .with_color_channel(self.data.color_channel)
            .with_down_sample_size(self.down_sample_size(mode))
            .with_image_size(self.data.custom_image_size)
            .with_extract_lsb(self.data.extract_lsb)
    }

    /// Validation shares the test cap.
    pub fn down_sample_size(&self, mode: DatasetMode) -> Option<usize> {
        match mode {
            DatasetMode::Train => self.data.down_sample_size_train,
            DatasetMode::Test | DatasetMode::Val => self.data.down_sample_size_test,
        }
    }
}
