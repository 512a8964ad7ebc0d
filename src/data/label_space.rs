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
use crate::data::discovery::ClassFiles;
use crate::data::stego_type::{ClassEntry, IndexedClass};
use std::path::{Path, PathBuf};

/// One retained file and its dense class index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatSample {
    pub path: PathBuf,
    pub label: usize,
}

/// Flattened view of a filtered manifest.
///
/// Dense labels are positions in `classes`, which is the retained class order.
/// They are not the registry bitmasks; `to_bitmask` converts between the two.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSpace {
    samples: Vec<FlatSample>,
    dataset_sizes: Vec<usize>,
    classes: Vec<ClassEntry>,
}

impl LabelSpace {
    pub fn build(manifest: Vec<ClassFiles>) -> Self {
        let mut samples = Vec::new();
        let mut dataset_sizes = Vec::with_capacity(manifest.len());
        let mut classes = Vec::with_capacity(manifest.len());

        for (label, ClassFiles { class, files }) in manifest.into_iter().enumerate() {
            dataset_sizes.push(files.len());
            samples.extend(files.into_iter().map(|path| FlatSample { path, label }));
            classes.push(class);
        }

        LabelSpace {
            samples,
            dataset_sizes,
            classes,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[FlatSample] {
        &self.samples
    }

    pub fn sample(&self, index: usize) -> Result<&FlatSample, StegoError> {
        self.samples.get(index).ok_or(StegoError::IndexOutOfRange {
            index,
            len: self.samples.len(),
        })
    }

    pub fn files(&self) -> Vec<&Path> {
        self.samples.iter().map(|s| s.path.as_path()).collect()
    }

    pub fn labels(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.label).collect()
    }

    pub fn dataset_sizes(&self) -> &[usize] {
        &self.dataset_sizes
    }

    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Retained classes paired with their dense index.
    pub fn indexed_classes(&self) -> Vec<IndexedClass<'_>> {
        self.classes
            .iter()
            .enumerate()
            .map(|(index, entry)| IndexedClass { entry, index })
            .collect()
    }

    pub fn to_bitmask(&self, label: usize) -> Result<u32, StegoError> {
        self.classes
            .get(label)
            .map(|c| c.bitmask)
            .ok_or(StegoError::IndexOutOfRange {
                index: label,
                len: self.classes.len(),
            })
    }

    pub fn to_bitmasks(&self, labels: &[usize]) -> Result<Vec<u32>, StegoError> {
        labels.iter().map(|&label| self.to_bitmask(label)).collect()
    }
}
