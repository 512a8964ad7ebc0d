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
use crate::data::dataset::Dataset;
use crate::data::dataset_spec::DatasetSpec;
use crate::data::discovery::{discover, filter_manifest};
use crate::data::label_space::LabelSpace;
use crate::data::transform::TransformPipeline;

/// Random-access dataset over per-class steganography folders.
///
/// Construction does all the discovery and filtering work; afterwards the
/// dataset is read-only and `get` may be called from several threads.
pub struct StegoDataset {
    spec: DatasetSpec,
    label_space: LabelSpace,
    transform: TransformPipeline,
}

impl StegoDataset {
    pub fn new(spec: DatasetSpec) -> Result<Self, StegoError> {
        spec.validate()?;

        let registry = spec.registry()?;
        let classes = registry.resolve(&spec.classes)?;

        let manifest = discover(&spec.root, &classes, spec.mode, spec.down_sample_size)?;
        let manifest = filter_manifest(manifest, spec.color_channel);
        let label_space = LabelSpace::build(manifest);

        log::info!(
            "{} dataset from {}: {} samples, classes {:?}, sizes {:?}",
            spec.mode,
            spec.root.display(),
            label_space.len(),
            label_space.class_names(),
            label_space.dataset_sizes()
        );

        let transform = TransformPipeline::new(spec.image_size, spec.extract_lsb);

        Ok(StegoDataset {
            spec,
            label_space,
            transform,
        })
    }

    pub fn spec(&self) -> &DatasetSpec {
        &self.spec
    }

    pub fn label_space(&self) -> &LabelSpace {
        &self.label_space
    }

    pub fn transform(&self) -> &TransformPipeline {
        &self.transform
    }

    /// Retained samples per class, in dense label order.
    pub fn dataset_sizes(&self) -> &[usize] {
        self.label_space.dataset_sizes()
    }

    /// Names of the retained classes, in dense label order.
    pub fn class_labels(&self) -> Vec<&str> {
        self.label_space.class_names()
    }

    pub fn labels(&self) -> Vec<usize> {
        self.label_space.labels()
    }
}

impl Dataset for StegoDataset {
    fn len(&self) -> usize {
        self.label_space.len()
    }

    fn num_classes(&self) -> usize {
        self.label_space.num_classes()
    }

    /// Loads and transforms the sample from disk on every call.
    fn get(&self, index: usize) -> Result<(Tensor, usize), StegoError> {
        let sample = self.label_space.sample(index)?;
        let image = self.transform.load(&sample.path)?;
        Ok((image, sample.label))
    }
}
