// Copyright (C) 2025 Bellande Artificial Intelligence Computer Vision Research Innovation Center, Ronaldson Bellande

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
use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma, Rgb, RgbImage};
use stego_detection_framework::{
    core::{error::StegoError, tensor::Tensor},
    data::{
        dataset::Dataset,
        dataset_spec::{ColorChannel, DatasetMode, DatasetSpec},
        stego_dataset::StegoDataset,
    },
    models::classifier::Classifier,
    utilities::config::Configuration,
    Framework,
};

fn class_dir(root: &Path, name: &str) -> Result<PathBuf, Box<dyn Error>> {
    let dir = root.join(name);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// `train/cleanTrain` with three RGB images and `train/LSBTrain` with one RGB
/// image plus one file that is not an image at all.
fn standard_fixture(root: &Path) -> Result<(), Box<dyn Error>> {
    let clean = class_dir(root, "train/cleanTrain")?;
    for i in 0..3 {
        RgbImage::from_pixel(2, 2, Rgb([i, 0, 0])).save(clean.join(format!("c{}.png", i)))?;
    }

    let lsb = class_dir(root, "train/LSBTrain")?;
    RgbImage::from_pixel(2, 2, Rgb([3, 3, 3])).save(lsb.join("l0.png"))?;
    fs::write(lsb.join("broken.png"), b"not an image")?;
    Ok(())
}

/// Scores dense class 0 highest for every input.
struct FirstClass {
    classes: usize,
}

impl Classifier for FirstClass {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, StegoError> {
        let batch = input.shape()[0];
        let mut scores = vec![0.0; batch * self.classes];
        for row in 0..batch {
            scores[row * self.classes] = 1.0;
        }
        Tensor::new(scores, vec![batch, self.classes])
    }

    fn num_classes(&self) -> usize {
        self.classes
    }
}

#[test]
fn test_end_to_end_dataset() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    standard_fixture(dir.path())?;

    let spec = DatasetSpec::new(dir.path().join("train"), &["CLEAN", "LSB"], DatasetMode::Train)
        .with_image_size(4);
    let dataset = StegoDataset::new(spec)?;

    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.labels(), vec![0, 0, 0, 1]);
    assert_eq!(dataset.dataset_sizes(), &[3, 1]);
    assert_eq!(dataset.len(), dataset.dataset_sizes().iter().sum::<usize>());
    assert_eq!(dataset.class_labels(), vec!["CLEAN", "LSB"]);

    for index in 0..dataset.len() {
        let (image, label) = dataset.get(index)?;
        assert_eq!(image.shape(), &[3, 4, 4]);
        assert!(label < dataset.num_classes());
    }

    Ok(())
}

#[test]
fn test_channel_filter_drops_empty_class() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    standard_fixture(dir.path())?;
    let gray = class_dir(dir.path(), "train/PVDTrain")?;
    GrayImage::from_pixel(2, 2, Luma([7])).save(gray.join("g.png"))?;

    let spec = DatasetSpec::new(
        dir.path().join("train"),
        &["CLEAN", "PVD", "LSB"],
        DatasetMode::Train,
    )
    .with_color_channel(ColorChannel::L)
    .with_image_size(2)
    .with_extract_lsb(true);
    let dataset = StegoDataset::new(spec)?;

    assert_eq!(dataset.class_labels(), vec!["PVD"]);
    assert_eq!(dataset.labels(), vec![0]);

    let (image, label) = dataset.get(0)?;
    assert_eq!(label, 0);
    assert_eq!(image.data(), &[1.0; 4]);

    Ok(())
}

#[test]
fn test_palette_png_excluded_from_rgb() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    standard_fixture(dir.path())?;

    let file = fs::File::create(dir.path().join("train/cleanTrain/palette.png"))?;
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), 2, 2);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(vec![0, 0, 0, 255, 255, 255]);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&[0, 1, 1, 0])?;
    writer.finish()?;

    let spec = DatasetSpec::new(dir.path().join("train"), &["CLEAN", "LSB"], DatasetMode::Train)
        .with_image_size(4);
    let dataset = StegoDataset::new(spec)?;

    assert_eq!(dataset.dataset_sizes(), &[3, 1]);
    for index in 0..dataset.len() {
        dataset.get(index)?;
    }

    Ok(())
}

#[test]
fn test_per_class_accuracy_out_of_registry_order() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    standard_fixture(dir.path())?;

    let mut config = Configuration::default();
    config.data.data_root = dir.path().to_path_buf();
    config.data.dataset_types = vec!["LSB".to_string(), "CLEAN".to_string()];
    config.data.image_size = 4;
    config.loader.batch_size = 3;
    config.loader.num_workers = 2;
    let framework = Framework::from_config(config)?;

    let spec = framework.config().dataset_spec(DatasetMode::Train);
    let dataset = StegoDataset::new(spec)?;
    assert_eq!(dataset.class_labels(), vec!["LSB", "CLEAN"]);

    let report = framework.evaluate(Box::new(FirstClass { classes: 2 }), dataset)?;
    assert_eq!((report.correct, report.total), (1, 4));
    assert_eq!(report.accuracy_percent(), 25.0);

    let buckets: Vec<(&str, usize, usize)> = report
        .per_class
        .iter()
        .map(|c| (c.name.as_str(), c.correct, c.total))
        .collect();
    assert_eq!(buckets, vec![("LSB", 1, 1), ("CLEAN", 0, 3)]);

    Ok(())
}

#[test]
fn test_missing_class_directory() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    standard_fixture(dir.path())?;

    let spec = DatasetSpec::new(dir.path().join("train"), &["CLEAN", "DCT"], DatasetMode::Train);
    match StegoDataset::new(spec) {
        Err(StegoError::IoError(message)) => assert!(message.contains("DCTTrain")),
        Err(other) => return Err(other.into()),
        Ok(_) => panic!("DCTTrain does not exist"),
    }

    Ok(())
}

#[test]
fn test_framework_info() -> Result<(), Box<dyn Error>> {
    assert!(Framework::system_info().contains(Framework::get_version()));
    assert!(!Framework::get_name().is_empty());
    Ok(())
}
