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

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StegoError {
    ConfigurationError(String),
    UnknownClass(String),
    ImageDecodeError { path: PathBuf, reason: String },
    IndexOutOfRange { index: usize, len: usize },
    IoError(String),
    SerializationError(String),
    InvalidShape(String),
    ShapeMismatch(String),
}

impl Error for StegoError {}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StegoError::ConfigurationError(msg) => write!(f, "Invalid configuration: {}", msg),
            StegoError::UnknownClass(name) => write!(f, "Unknown steganography class: {}", name),
            StegoError::ImageDecodeError { path, reason } => {
                write!(f, "Failed to decode image {}: {}", path.display(), reason)
            }
            StegoError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for length {}", index, len)
            }
            StegoError::IoError(msg) => write!(f, "IO error: {}", msg),
            StegoError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            StegoError::InvalidShape(msg) => write!(f, "Invalid tensor shape: {}", msg),
            StegoError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
        }
    }
}

impl From<std::io::Error> for StegoError {
    fn from(error: std::io::Error) -> Self {
        StegoError::IoError(error.to_string())
    }
}

impl From<serde_yaml::Error> for StegoError {
    fn from(error: serde_yaml::Error) -> Self {
        StegoError::SerializationError(error.to_string())
    }
}

impl From<serde_json::Error> for StegoError {
    fn from(error: serde_json::Error) -> Self {
        StegoError::SerializationError(error.to_string())
    }
}
