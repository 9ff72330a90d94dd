use candle_core::Device;

use crate::{
    batcher::Batcher,
    config::{Config, validate_batch_size, validate_prefetch_depth},
    convert::Converter,
    data_loader::DataLoader,
    error::Result,
    fashion_mnist_batcher::FashionMnistBatcher,
    fashion_mnist_dataset::FashionMnistDataset,
    fashion_mnist_iter::FashionMnistIter,
    metadata::Metadata,
    prefetch::Prefetch,
};

pub struct FashionMnistDataLoader {
    dataset: FashionMnistDataset,
    converter: Converter,
    batch_size: usize,
    prefetch_depth: usize,
    shuffle: bool,
    seed: Option<u64>,
    drop_last: bool,
}

impl FashionMnistDataLoader {
    /// Fails with `InvalidConfiguration` before any record is touched.
    pub fn new(
        dataset: FashionMnistDataset,
        metadata: &Metadata,
        cfg: &Config,
        device: Device,
    ) -> Result<Self> {
        let batch_size = validate_batch_size(cfg.batch_size)?;
        let prefetch_depth = validate_prefetch_depth(cfg.prefetch_depth)?;
        Ok(Self {
            dataset,
            converter: Converter::new(metadata.image_shape.clone(), device),
            batch_size,
            prefetch_depth,
            shuffle: cfg.shuffle,
            seed: cfg.seed,
            drop_last: cfg.drop_last,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn prefetch_depth(&self) -> usize {
        self.prefetch_depth
    }
}

impl DataLoader for FashionMnistDataLoader {
    type Batcher = Prefetch<FashionMnistBatcher>;

    fn batcher(&self) -> Result<Self::Batcher> {
        let iter = FashionMnistIter::new(
            self.dataset.clone(),
            self.converter.clone(),
            self.shuffle,
            self.seed,
        );
        let batcher = Batcher::new(iter)
            .batch_size(self.batch_size)
            .return_last_incomplete_batch(!self.drop_last);
        Prefetch::new(batcher, self.prefetch_depth)
    }
}
