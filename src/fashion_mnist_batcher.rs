use crate::{batcher::Batcher, fashion_mnist_iter::FashionMnistIter};

pub type FashionMnistBatcher = Batcher<FashionMnistIter>;
