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
use crate::data::dataset_spec::{ColorChannel, DatasetMode};
use crate::data::image_decoder::native_channel;
use crate::data::stego_type::ClassEntry;
use std::fs;
use std::path::{Path, PathBuf};

/// A class together with the files that currently belong to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassFiles {
    pub class: ClassEntry,
    pub files: Vec<PathBuf>,
}

/// `root/<folder_name><Mode>`, e.g. `data/train/cleanTrain`.
pub fn class_directory(root: &Path, class: &ClassEntry, mode: DatasetMode) -> PathBuf {
    root.join(format!("{}{}", class.folder_name, mode.capitalized()))
}

/// Lists the files of every class directory, keeping the order of `classes`.
///
/// Files come back in whatever order `std::fs::read_dir` yields them, which is
/// platform and filesystem dependent. A `down_sample_size` keeps the first
/// entries of that listing rather than a random subset.
pub fn discover(
    root: &Path,
    classes: &[ClassEntry],
    mode: DatasetMode,
    down_sample_size: Option<usize>,
) -> Result<Vec<ClassFiles>, StegoError> {
    classes
        .iter()
        .map(|class| {
            let directory = class_directory(root, class, mode);
            let mut files = list_directory(&directory)?;
            if let Some(limit) = down_sample_size {
                files.truncate(limit);
            }
            log::debug!(
                "found {} candidate files for {} in {}",
                files.len(),
                class.name,
                directory.display()
            );
            Ok(ClassFiles {
                class: class.clone(),
                files,
            })
        })
        .collect()
}

fn list_directory(directory: &Path) -> Result<Vec<PathBuf>, StegoError> {
    let entries = fs::read_dir(directory).map_err(|e| {
        StegoError::IoError(format!(
            "Failed to list class directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    entries
        .map(|entry| Ok(entry?.path()))
        .collect::<Result<Vec<_>, std::io::Error>>()
        .map_err(StegoError::from)
}

/// Keeps the paths whose native color mode is exactly `channel`.
///
/// Files that fail to open or decode are excluded, not reported.
pub fn filter_by_channel(paths: &[PathBuf], channel: ColorChannel) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| native_channel(path) == Some(channel))
        .cloned()
        .collect()
}

/// Filters every class and drops the ones left without files.
///
/// The result is a fresh collection so a class and its file list are always
/// kept or dropped together.
pub fn filter_manifest(manifest: Vec<ClassFiles>, channel: ColorChannel) -> Vec<ClassFiles> {
    manifest
        .into_iter()
        .filter_map(|ClassFiles { class, files }| {
            let kept = filter_by_channel(&files, channel);
            if kept.len() < files.len() {
                log::debug!(
                    "{} of {} files for {} are not {} images",
                    files.len() - kept.len(),
                    files.len(),
                    class.name,
                    channel
                );
            }
            if kept.is_empty() {
                log::warn!(
                    "dropping class {}: no {} images left after filtering",
                    class.name,
                    channel
                );
                None
            } else {
                Some(ClassFiles { class, files: kept })
            }
        })
        .collect()
}
