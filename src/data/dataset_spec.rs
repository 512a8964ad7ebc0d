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
use crate::data::stego_type::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_IMAGE_SIZE: usize = 256;

/// Dataset split.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetMode {
    Train,
    Val,
    Test,
}

impl DatasetMode {
    /// Lowercase token, used as the sub-root of the standard layout.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetMode::Train => "train",
            DatasetMode::Val => "val",
            DatasetMode::Test => "test",
        }
    }

    /// Capitalized token appended to class folder names.
    pub fn capitalized(&self) -> &'static str {
        match self {
            DatasetMode::Train => "Train",
            DatasetMode::Val => "Val",
            DatasetMode::Test => "Test",
        }
    }
}

impl FromStr for DatasetMode {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(DatasetMode::Train),
            "val" => Ok(DatasetMode::Val),
            "test" => Ok(DatasetMode::Test),
            _ => Err(StegoError::ConfigurationError(format!(
                "{} is not a valid dataset mode",
                s
            ))),
        }
    }
}

impl fmt::Display for DatasetMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Native color mode an image must have to be retained.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorChannel {
    #[serde(rename = "L", alias = "l")]
    L,
    #[serde(rename = "RGB", alias = "rgb")]
    Rgb,
    #[serde(rename = "RGBA", alias = "rgba")]
    Rgba,
}

impl ColorChannel {
    pub fn token(&self) -> &'static str {
        match self {
            ColorChannel::L => "L",
            ColorChannel::Rgb => "RGB",
            ColorChannel::Rgba => "RGBA",
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            ColorChannel::L => 1,
            ColorChannel::Rgb => 3,
            ColorChannel::Rgba => 4,
        }
    }
}

impl Default for ColorChannel {
    fn default() -> Self {
        ColorChannel::Rgb
    }
}

impl FromStr for ColorChannel {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "L" | "GRAY" | "GRAYSCALE" => Ok(ColorChannel::L),
            "RGB" => Ok(ColorChannel::Rgb),
            "RGBA" => Ok(ColorChannel::Rgba),
            _ => Err(StegoError::ConfigurationError(format!(
                "{} is not a valid color channel",
                s
            ))),
        }
    }
}

impl fmt::Display for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Which directory convention and registry a dataset uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetLayout {
    /// `<data_root>/<mode>/<folder><Mode>` with the fixed seven-class registry.
    Standard,
    /// `<data_root>/<name><Mode>` with caller-chosen class names.
    Custom,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        DatasetLayout::Standard
    }
}

/// Everything needed to build one dataset instance.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetSpec {
    /// Directory holding the `<folder><Mode>` class directories.
    pub root: PathBuf,
    pub classes: Vec<String>,
    pub mode: DatasetMode,
    pub layout: DatasetLayout,
    pub color_channel: ColorChannel,
    pub down_sample_size: Option<usize>,
    pub image_size: usize,
    pub extract_lsb: bool,
}

impl DatasetSpec {
    pub fn new<P, S>(root: P, classes: &[S], mode: DatasetMode) -> Self
    where
        P: Into<PathBuf>,
        S: AsRef<str>,
    {
        DatasetSpec {
            root: root.into(),
            classes: classes.iter().map(|c| c.as_ref().to_string()).collect(),
            mode,
            layout: DatasetLayout::Standard,
            color_channel: ColorChannel::default(),
            down_sample_size: None,
            image_size: DEFAULT_IMAGE_SIZE,
            extract_lsb: false,
        }
    }

    pub fn with_layout(mut self, layout: DatasetLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_color_channel(mut self, color_channel: ColorChannel) -> Self {
        self.color_channel = color_channel;
        self
    }

    pub fn with_down_sample_size(mut self, down_sample_size: Option<usize>) -> Self {
        self.down_sample_size = down_sample_size;
        self
    }

    pub fn with_image_size(mut self, image_size: usize) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn with_extract_lsb(mut self, extract_lsb: bool) -> Self {
        self.extract_lsb = extract_lsb;
        self
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        if let Some(size) = self.down_sample_size {
            if size < 1 {
                return Err(StegoError::ConfigurationError(format!(
                    "{} is too small for a down sample size",
                    size
                )));
            }
        }

        if self.image_size == 0 {
            return Err(StegoError::ConfigurationError(
                "Image size must be greater than 0".to_string(),
            ));
        }

        if self.classes.is_empty() {
            return Err(StegoError::ConfigurationError(
                "At least one dataset class must be requested".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(StegoError::ConfigurationError(format!(
                "Dataset class '{}' requested more than once",
                duplicate
            )));
        }

        Ok(())
    }

    /// Registry the requested class names are resolved against.
    pub fn registry(&self) -> Result<TypeRegistry, StegoError> {
        match self.layout {
            DatasetLayout::Standard => Ok(TypeRegistry::standard()),
            DatasetLayout::Custom => TypeRegistry::custom(&self.classes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing_is_case_insensitive() {
        assert_eq!("TRAIN".parse::<DatasetMode>().unwrap(), DatasetMode::Train);
        assert_eq!("val".parse::<DatasetMode>().unwrap().capitalized(), "Val");
        assert!(matches!(
            "validation".parse::<DatasetMode>(),
            Err(StegoError::ConfigurationError(_))
        ));
    }

    #[test]
    fn channel_tokens() {
        assert_eq!("rgb".parse::<ColorChannel>().unwrap(), ColorChannel::Rgb);
        assert_eq!("grayscale".parse::<ColorChannel>().unwrap(), ColorChannel::L);
        assert_eq!(ColorChannel::Rgba.token(), "RGBA");
        assert!("CMYK".parse::<ColorChannel>().is_err());
    }

    #[test]
    fn validate_rejects_zero_down_sample() {
        let spec = DatasetSpec::new("data/train", &["CLEAN"], DatasetMode::Train)
            .with_down_sample_size(Some(0));
        assert!(matches!(
            spec.validate(),
            Err(StegoError::ConfigurationError(_))
        ));

        let spec = spec.with_down_sample_size(Some(1));
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicates_and_empty_class_lists() {
        let empty: [&str; 0] = [];
        assert!(DatasetSpec::new("d", &empty, DatasetMode::Test).validate().is_err());
        assert!(DatasetSpec::new("d", &["LSB", "LSB"], DatasetMode::Test)
            .validate()
            .is_err());
        assert!(DatasetSpec::new("d", &["LSB"], DatasetMode::Test)
            .with_image_size(0)
            .validate()
            .is_err());
    }
}
