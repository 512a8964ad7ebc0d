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

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Produces the order in which dataset indices are visited during one epoch.
pub trait Sampler: Send + Sync {
    fn epoch_indices(&mut self) -> Vec<usize>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct RandomSampler {
    data_len: usize,
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(data_len: usize) -> Self {
        RandomSampler {
            data_len,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(data_len: usize, seed: u64) -> Self {
        RandomSampler {
            data_len,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn epoch_indices(&mut self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.data_len).collect();
        indices.shuffle(&mut self.rng);
        indices
    }

    fn len(&self) -> usize {
        self.data_len
    }
}

pub struct SequentialSampler {
    data_len: usize,
}

impl SequentialSampler {
    pub fn new(data_len: usize) -> Self {
        SequentialSampler { data_len }
    }
}

impl Sampler for SequentialSampler {
    fn epoch_indices(&mut self) -> Vec<usize> {
        (0..self.data_len).collect()
    }

    fn len(&self) -> usize {
        self.data_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_visits_in_order() {
        let mut sampler = SequentialSampler::new(4);
        assert_eq!(sampler.epoch_indices(), vec![0, 1, 2, 3]);
        assert_eq!(sampler.epoch_indices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn random_is_a_seeded_permutation() {
        let mut a = RandomSampler::with_seed(50, 7);
        let mut b = RandomSampler::with_seed(50, 7);
        let first = a.epoch_indices();
        assert_eq!(first, b.epoch_indices());

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }
}
