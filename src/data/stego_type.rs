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
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Embedding techniques known to the standard dataset layout.
///
/// Every variant owns a distinct single bit so labels can be tested for
/// membership with a bitwise AND.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SteganographyType {
    Clean,
    Dct,
    Fft,
    Lsb,
    Pvd,
    Ssb4,
    Ssbn,
}

impl SteganographyType {
    pub const ALL: [SteganographyType; 7] = [
        SteganographyType::Clean,
        SteganographyType::Dct,
        SteganographyType::Fft,
        SteganographyType::Lsb,
        SteganographyType::Pvd,
        SteganographyType::Ssb4,
        SteganographyType::Ssbn,
    ];

    pub fn bitmask(&self) -> u32 {
        match self {
            SteganographyType::Clean => 1 << 0,
            SteganographyType::Dct => 1 << 1,
            SteganographyType::Fft => 1 << 2,
            SteganographyType::Lsb => 1 << 3,
            SteganographyType::Pvd => 1 << 4,
            SteganographyType::Ssb4 => 1 << 5,
            SteganographyType::Ssbn => 1 << 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SteganographyType::Clean => "CLEAN",
            SteganographyType::Dct => "DCT",
            SteganographyType::Fft => "FFT",
            SteganographyType::Lsb => "LSB",
            SteganographyType::Pvd => "PVD",
            SteganographyType::Ssb4 => "SSB4",
            SteganographyType::Ssbn => "SSBN",
        }
    }

    /// Directory prefix used on disk, e.g. `clean` in `cleanTrain`.
    pub fn folder_name(&self) -> &'static str {
        match self {
            SteganographyType::Clean => "clean",
            other => other.name(),
        }
    }

    pub fn from_name(name: &str) -> Result<Self, StegoError> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == name || ty.folder_name() == name)
            .ok_or_else(|| StegoError::UnknownClass(name.to_string()))
    }

    pub fn entry(&self) -> ClassEntry {
        ClassEntry {
            name: self.name().to_string(),
            bitmask: self.bitmask(),
            folder_name: self.folder_name().to_string(),
        }
    }
}

/// One registered class: display name, bit identifier and folder prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub bitmask: u32,
    pub folder_name: String,
}

/// A class paired with its dense index inside an active subset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedClass<'a> {
    pub entry: &'a ClassEntry,
    pub index: usize,
}

/// Lookup key accepted by [`TypeRegistry::index_of`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKey<'a> {
    Name(&'a str),
    Bitmask(u32),
}

impl<'a> From<&'a str> for ClassKey<'a> {
    fn from(name: &'a str) -> Self {
        ClassKey::Name(name)
    }
}

impl From<u32> for ClassKey<'_> {
    fn from(bitmask: u32) -> Self {
        ClassKey::Bitmask(bitmask)
    }
}

impl From<SteganographyType> for ClassKey<'_> {
    fn from(ty: SteganographyType) -> Self {
        ClassKey::Bitmask(ty.bitmask())
    }
}

/// Ordered set of classes a dataset may draw from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRegistry {
    entries: Vec<ClassEntry>,
}

impl TypeRegistry {
    /// The fixed seven-class registry of the standard layout.
    pub fn standard() -> Self {
        TypeRegistry {
            entries: SteganographyType::ALL.iter().map(|ty| ty.entry()).collect(),
        }
    }

    /// Registry for the custom layout, where every name is used verbatim as the
    /// folder prefix and receives bit `1 << position`.
    pub fn custom<S: AsRef<str>>(names: &[S]) -> Result<Self, StegoError> {
        if names.len() > u32::BITS as usize {
            return Err(StegoError::ConfigurationError(format!(
                "a custom registry holds at most {} classes, got {}",
                u32::BITS,
                names.len()
            )));
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if name.is_empty() {
                return Err(StegoError::ConfigurationError(
                    "custom class names must not be empty".to_string(),
                ));
            }
            if !seen.insert(name) {
                return Err(StegoError::ConfigurationError(format!(
                    "duplicate custom class '{}'",
                    name
                )));
            }
            entries.push(ClassEntry {
                name: name.to_string(),
                bitmask: 1 << position,
                folder_name: name.to_string(),
            });
        }

        Ok(TypeRegistry { entries })
    }

    pub fn classes(&self) -> &[ClassEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Result<&ClassEntry, StegoError> {
        self.entries
            .iter()
            .find(|entry| entry.name == name || entry.folder_name == name)
            .ok_or_else(|| StegoError::UnknownClass(name.to_string()))
    }

    pub fn lookup_bitmask(&self, bitmask: u32) -> Result<&ClassEntry, StegoError> {
        self.entries
            .iter()
            .find(|entry| entry.bitmask == bitmask)
            .ok_or_else(|| StegoError::UnknownClass(format!("{:#b}", bitmask)))
    }

    fn lookup_key(&self, key: ClassKey) -> Result<&ClassEntry, StegoError> {
        match key {
            ClassKey::Name(name) => self.lookup(name),
            ClassKey::Bitmask(bitmask) => self.lookup_bitmask(bitmask),
        }
    }

    /// Resolves every requested name up front, failing on the first unknown one.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ClassEntry>, StegoError> {
        names
            .iter()
            .map(|name| self.lookup(name.as_ref()).cloned())
            .collect()
    }

    /// Dense position of `key` within `active`.
    pub fn index_of<'k>(
        &self,
        key: impl Into<ClassKey<'k>>,
        active: &[ClassEntry],
    ) -> Result<usize, StegoError> {
        let key = key.into();
        let entry = self.lookup_key(key)?;
        active
            .iter()
            .position(|candidate| candidate.bitmask == entry.bitmask)
            .ok_or_else(|| {
                StegoError::UnknownClass(format!("{} is not part of the active classes", entry.name))
            })
    }

    /// Pairs every active class with its dense index, in the order supplied.
    pub fn iterate_with_index<'a>(
        &self,
        active: &'a [ClassEntry],
    ) -> Result<Vec<IndexedClass<'a>>, StegoError> {
        active
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                self.lookup_bitmask(entry.bitmask)?;
                Ok(IndexedClass { entry, index })
            })
            .collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
