pub mod batcher;
pub mod config;
pub mod convert;
pub mod data_loader;
pub mod data_source;
pub mod error;
pub mod fashion_mnist_batcher;
pub mod fashion_mnist_dataset;
pub mod fashion_mnist_iter;
pub mod fashion_mnist_loader;
pub mod idx;
pub mod metadata;
pub mod prefetch;
pub mod preview;
pub mod record;
pub mod split;

pub use batcher::{Batch, batch};
pub use convert::{Record, convert};
pub use error::{Error, Result};
pub use fashion_mnist_dataset::load;
pub use prefetch::prefetch;
