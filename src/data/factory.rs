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
use crate::data::dataset::Dataset;
use crate::data::dataset_spec::DatasetMode;
use crate::data::sampler::{RandomSampler, Sampler, SequentialSampler};
use crate::data::stego_dataset::StegoDataset;
use crate::utilities::config::Configuration;
use std::sync::Arc;

/// Train and test splits of the standard layout.
pub fn get_datasets(config: &Configuration) -> Result<(StegoDataset, StegoDataset), StegoError> {
    config.validate()?;
    let train = StegoDataset::new(config.dataset_spec(DatasetMode::Train))?;
    let test = StegoDataset::new(config.dataset_spec(DatasetMode::Test))?;
    Ok((train, test))
}

/// Train and test splits of the custom layout.
pub fn get_custom_dataset(
    config: &Configuration,
) -> Result<(StegoDataset, StegoDataset), StegoError> {
    config.validate()?;
    let train = StegoDataset::new(config.custom_dataset_spec(DatasetMode::Train))?;
    let test = StegoDataset::new(config.custom_dataset_spec(DatasetMode::Test))?;
    Ok((train, test))
}

pub fn get_validation_dataset(config: &Configuration) -> Result<StegoDataset, StegoError> {
    config.validate()?;
    StegoDataset::new(config.dataset_spec(DatasetMode::Val))
}

pub fn get_custom_validation_dataset(config: &Configuration) -> Result<StegoDataset, StegoError> {
    config.validate()?;
    StegoDataset::new(config.custom_dataset_spec(DatasetMode::Val))
}

/// Loader over `dataset` using the configured batching. A configured seed makes
/// shuffling reproducible.
pub fn data_loader(
    config: &Configuration,
    dataset: Arc<dyn Dataset>,
    shuffle: bool,
) -> Result<DataLoader, StegoError> {
    let sampler: Box<dyn Sampler> = match (shuffle, config.system.seed) {
        (true, Some(seed)) => Box::new(RandomSampler::with_seed(dataset.len(), seed)),
        (true, None) => Box::new(RandomSampler::new(dataset.len())),
        (false, _) => Box::new(SequentialSampler::new(dataset.len())),
    };
    DataLoader::with_sampler(
        dataset,
        config.loader.batch_size,
        sampler,
        config.loader.num_workers,
        config.loader.drop_last,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_png(path: &Path, size: u32) {
        image::RgbImage::from_pixel(size, size, image::Rgb([10, 20, 30]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn standard_splits_use_their_own_caps() {
        let dir = tempfile::tempdir().unwrap();
        for (split, mode) in [("train", "Train"), ("test", "Test")] {
            let class_dir = dir.path().join(split).join(format!("clean{}", mode));
            fs::create_dir_all(&class_dir).unwrap();
            for i in 0..3 {
                write_png(&class_dir.join(format!("{}.png", i)), 4);
            }
        }

        let mut config = Configuration::default();
        config.data.data_root = dir.path().to_path_buf();
        config.data.dataset_types = vec!["CLEAN".to_string()];
        config.data.image_size = 4;
        config.data.down_sample_size_train = Some(2);
        config.data.down_sample_size_test = Some(1);

        let (train, test) = get_datasets(&config).unwrap();
        assert_eq!(train.len(), 2);
        assert_eq!(test.len(), 1);
        assert_eq!(train.class_labels(), vec!["CLEAN"]);
    }

    #[test]
    fn missing_validation_split_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Configuration::default();
        config.data.data_root = dir.path().to_path_buf();
        config.data.dataset_types = vec!["LSB".to_string()];

        assert!(matches!(
            get_validation_dataset(&config),
            Err(StegoError::IoError(_))
        ));
    }

    #[test]
    fn custom_split_uses_custom_image_size() {
        let dir = tempfile::tempdir().unwrap();
        for mode in ["Train", "Test"] {
            let class_dir = dir.path().join(format!("Alpha{}", mode));
            fs::create_dir_all(&class_dir).unwrap();
            write_png(&class_dir.join("a.png"), 2);
        }

        let mut config = Configuration::default();
        config.data.custom_root = dir.path().to_path_buf();
        config.data.custom_types = vec!["Alpha".to_string()];
        config.data.custom_image_size = 6;

        let (train, _) = get_custom_dataset(&config).unwrap();
        let (image, label) = train.get(0).unwrap();
        assert_eq!(image.shape(), &[3, 6, 6]);
        assert_eq!(label, 0);
    }

    #[test]
    fn custom_validation_split_uses_test_cap() {
        let dir = tempfile::tempdir().unwrap();
        let class_dir = dir.path().join("AlphaVal");
        fs::create_dir_all(&class_dir).unwrap();
        for i in 0..3 {
            write_png(&class_dir.join(format!("{}.png", i)), 2);
        }

        let mut config = Configuration::default();
        config.data.custom_root = dir.path().to_path_buf();
        config.data.custom_types = vec!["Alpha".to_string()];
        config.data.down_sample_size_train = Some(3);
        config.data.down_sample_size_test = Some(2);

        let val = get_custom_validation_dataset(&config).unwrap();
        assert_eq!(val.spec().mode, DatasetMode::Val);
        assert_eq!(val.len(), 2);
        assert_eq!(val.class_labels(), vec!["Alpha"]);
    }

    #[test]
    fn seeded_loader_is_reproducible() {
        struct Indices(usize);

        impl Dataset for Indices {
            fn len(&self) -> usize {
                self.0
            }

            fn get(&self, index: usize) -> Result<(crate::core::tensor::Tensor, usize), StegoError> {
                Ok((crate::core::tensor::Tensor::new(vec![index as f32], vec![1])?, 0))
            }

            fn num_classes(&self) -> usize {
                1
            }
        }

        let mut config = Configuration::default();
        config.loader.batch_size = 16;
        config.loader.num_workers = 1;
        config.system.seed = Some(5);

        let order = |config: &Configuration| -> Vec<f32> {
            let mut loader = data_loader(config, Arc::new(Indices(16)), true).unwrap();
            let batch = loader.iter().next().unwrap().unwrap();
            batch.images.data().to_vec()
        };
        assert_eq!(order(&config), order(&config));
    }
}
