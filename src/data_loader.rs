use crate::error::Result;

/// A restartable source of batches: each call to `batcher` starts a new pass.
pub trait DataLoader {
    type Batcher: Iterator;

    fn batcher(&self) -> Result<Self::Batcher>;
}
