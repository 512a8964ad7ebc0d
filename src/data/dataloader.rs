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
use crate::core::tensor::Tensor;
use crate::data::dataset::Dataset;
use crate::data::sampler::{RandomSampler, Sampler, SequentialSampler};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;

/// A collated batch: images of shape `(batch, C, H, W)` and their dense labels.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub images: Tensor,
    pub labels: Vec<usize>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub struct DataLoader {
    dataset: Arc<dyn Dataset>,
    batch_size: usize,
    sampler: Box<dyn Sampler>,
    pool: Option<ThreadPool>,
    drop_last: bool,
}

impl DataLoader {
    pub fn new(
        dataset: Arc<dyn Dataset>,
        batch_size: usize,
        shuffle: bool,
        num_workers: usize,
        drop_last: bool,
    ) -> Result<Self, StegoError> {
        let sampler: Box<dyn Sampler> = if shuffle {
            Box::new(RandomSampler::new(dataset.len()))
        } else {
            Box::new(SequentialSampler::new(dataset.len()))
        };
        Self::with_sampler(dataset, batch_size, sampler, num_workers, drop_last)
    }

    pub fn with_sampler(
        dataset: Arc<dyn Dataset>,
        batch_size: usize,
        sampler: Box<dyn Sampler>,
        num_workers: usize,
        drop_last: bool,
    ) -> Result<Self, StegoError> {
        if batch_size == 0 {
            return Err(StegoError::ConfigurationError(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if sampler.len() != dataset.len() {
            return Err(StegoError::ConfigurationError(format!(
                "sampler covers {} samples but the dataset has {}",
                sampler.len(),
                dataset.len()
            )));
        }

        let pool = if num_workers > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(num_workers)
                .build()
                .map_err(|e| StegoError::ConfigurationError(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(DataLoader {
            dataset,
            batch_size,
            sampler,
            pool,
            drop_last,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn num_batches(&self) -> usize {
        let len = self.dataset.len();
        if self.drop_last {
            len / self.batch_size
        } else {
            (len + self.batch_size - 1) / self.batch_size
        }
    }

    /// Starts a new epoch, drawing a fresh index order from the sampler.
    pub fn iter(&mut self) -> DataLoaderIterator<'_> {
        let indices = self.sampler.epoch_indices();
        DataLoaderIterator {
            dataloader: self,
            indices,
            position: 0,
        }
    }

    fn load(&self, batch_indices: &[usize]) -> Result<Batch, StegoError> {
        let samples: Result<Vec<(Tensor, usize)>, StegoError> = match &self.pool {
            Some(pool) => pool.install(|| {
                batch_indices
                    .par_iter()
                    .map(|&idx| self.dataset.get(idx))
                    .collect()
            }),
            None => batch_indices
                .iter()
                .map(|&idx| self.dataset.get(idx))
                .collect(),
        };
        collate_batch(samples?)
    }
}

pub struct DataLoaderIterator<'a> {
    dataloader: &'a DataLoader,
    indices: Vec<usize>,
    position: usize,
}

impl<'a> Iterator for DataLoaderIterator<'a> {
    type Item = Result<Batch, StegoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.indices.len() {
            return None;
        }

        let end = (self.position + self.dataloader.batch_size).min(self.indices.len());
        if self.dataloader.drop_last && end - self.position < self.dataloader.batch_size {
            return None;
        }

        let batch_indices = &self.indices[self.position..end];
        self.position = end;
        Some(self.dataloader.load(batch_indices))
    }
}

/// Stacks equally shaped samples along a new leading batch dimension.
pub fn collate_batch(batch: Vec<(Tensor, usize)>) -> Result<Batch, StegoError> {
    let Some((first, _)) = batch.first() else {
        return Err(StegoError::InvalidShape("Empty batch provided".to_string()));
    };
    let base_shape = first.shape().to_vec();

    for (i, (tensor, _)) in batch.iter().enumerate().skip(1) {
        if tensor.shape() != base_shape.as_slice() {
            return Err(StegoError::ShapeMismatch(format!(
                "tensor 0 has shape {:?} but tensor {} has shape {:?}",
                base_shape,
                i,
                tensor.shape()
            )));
        }
    }

    let mut batch_shape = vec![batch.len()];
    batch_shape.extend(&base_shape);

    let mut data = Vec::with_capacity(batch_shape.iter().product());
    let mut labels = Vec::with_capacity(batch.len());
    for (tensor, label) in batch {
        data.extend_from_slice(tensor.data());
        labels.push(label);
    }

    Ok(Batch {
        images: Tensor::new(data, batch_shape)?,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant {
        len: usize,
    }

    impl Dataset for Constant {
        fn len(&self) -> usize {
            self.len
        }

        fn get(&self, index: usize) -> Result<(Tensor, usize), StegoError> {
            if index >= self.len {
                return Err(StegoError::IndexOutOfRange {
                    index,
                    len: self.len,
                });
            }
            Ok((Tensor::new(vec![index as f32; 4], vec![1, 2, 2])?, index % 2))
        }

        fn num_classes(&self) -> usize {
            2
        }
    }

    #[test]
    fn sequential_batches_cover_dataset() {
        let mut loader = DataLoader::new(Arc::new(Constant { len: 5 }), 2, false, 1, false).unwrap();
        assert_eq!(loader.num_batches(), 3);

        let batches: Vec<Batch> = loader.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].images.shape(), &[2, 1, 2, 2]);
        assert_eq!(batches[1].labels, vec![0, 1]);
        assert_eq!(batches[2].len(), 1);
        assert_eq!(batches[2].images.get(&[0, 0, 1, 1]), Some(4.0));
    }

    #[test]
    fn drop_last_skips_partial_batch() {
        let mut loader = DataLoader::new(Arc::new(Constant { len: 5 }), 2, true, 1, true).unwrap();
        assert_eq!(loader.num_batches(), 2);
        assert_eq!(loader.iter().count(), 2);
    }

    #[test]
    fn parallel_loading_keeps_batch_order() {
        let sampler = Box::new(RandomSampler::with_seed(8, 3));
        let mut expected = RandomSampler::with_seed(8, 3).epoch_indices();
        let mut loader =
            DataLoader::with_sampler(Arc::new(Constant { len: 8 }), 4, sampler, 4, false).unwrap();

        let mut seen = Vec::new();
        for batch in loader.iter() {
            let batch = batch.unwrap();
            for b in 0..batch.len() {
                seen.push(batch.images.get(&[b, 0, 0, 0]).unwrap() as usize);
            }
        }
        assert_eq!(seen, expected);

        expected.sort_unstable();
        seen.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn collate_rejects_mixed_shapes() {
        let batch = vec![(Tensor::zeros(&[1, 2, 2]), 0), (Tensor::zeros(&[1, 3, 3]), 1)];
        assert!(matches!(
            collate_batch(batch),
            Err(StegoError::ShapeMismatch(_))
        ));
        assert!(collate_batch(Vec::new()).is_err());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(DataLoader::new(Arc::new(Constant { len: 1 }), 0, false, 1, false).is_err());
    }
}
