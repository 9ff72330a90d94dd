use rand::{SeedableRng, rng, rngs::StdRng, seq::SliceRandom};

use crate::{
    convert::{Converter, Record},
    error::Result,
    fashion_mnist_dataset::FashionMnistDataset,
};

/// One pass over the dataset, converting each record as it is pulled.
pub struct FashionMnistIter {
    dataset: FashionMnistDataset,
    converter: Converter,
    remaining_indices: Vec<usize>,
}

impl FashionMnistIter {
    pub fn new(
        dataset: FashionMnistDataset,
        converter: Converter,
        shuffle: bool,
        seed: Option<u64>,
    ) -> Self {
        let mut remaining_indices = (0..dataset.len()).rev().collect::<Vec<_>>();
        if shuffle {
            match seed {
                Some(seed) => remaining_indices.shuffle(&mut StdRng::seed_from_u64(seed)),
                None => remaining_indices.shuffle(&mut rng()),
            }
        }
        Self {
            dataset,
            converter,
            remaining_indices,
        }
    }
}

impl Iterator for FashionMnistIter {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.remaining_indices.pop()?;
        Some(self.converter.convert(self.dataset.get(idx)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining_indices.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for FashionMnistIter {}
