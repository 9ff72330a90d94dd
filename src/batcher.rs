use candle_core::Tensor;

use crate::{
    config::validate_batch_size,
    convert::Record,
    error::{Error, Result},
};

#[derive(Debug, Clone)]
pub struct Batch {
    /// `[n, ..image_shape]`
    pub images: Tensor,
    /// `[n]`
    pub labels: Tensor,
}

impl Batch {
    pub fn stack(records: &[Record]) -> Result<Self> {
        let images = records.iter().map(|r| r.image.clone()).collect::<Vec<_>>();
        let labels = records.iter().map(|r| r.label.clone()).collect::<Vec<_>>();
        Ok(Self {
            images: Tensor::stack(&images, 0)?,
            labels: Tensor::stack(&labels, 0)?,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.dims().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups consecutive records into batches. A failed record fails the
/// batch it belongs to; the rest of that batch is still drawn from the
/// source so later batches keep their boundaries.
pub struct Batcher<I> {
    inner: I,
    batch_size: usize,
    return_last_incomplete_batch: bool,
}

impl<I> Batcher<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            batch_size: 16,
            return_last_incomplete_batch: true,
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn return_last_incomplete_batch(mut self, r: bool) -> Self {
        self.return_last_incomplete_batch = r;
        self
    }
}

impl<I: Iterator<Item = Result<Record>>> Iterator for Batcher<I> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut records = Vec::with_capacity(self.batch_size);
        let mut first_err: Option<Error> = None;
        let mut pulled = 0;
        while pulled < self.batch_size {
            match self.inner.next() {
                Some(Ok(record)) => records.push(record),
                Some(Err(err)) => {
                    if first_err.is_none() {
                        first_err = Some(err);
                    }
                }
                None => break,
            }
            pulled += 1;
        }

        if let Some(err) = first_err {
            return Some(Err(err));
        }
        if records.is_empty() || (pulled < self.batch_size && !self.return_last_incomplete_batch)
        {
            return None;
        }
        Some(Batch::stack(&records))
    }
}

/// Lazily groups `records` into batches of `batch_size`, keeping the final
/// short batch.
pub fn batch<I>(records: I, batch_size: i64) -> Result<Batcher<I::IntoIter>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let batch_size = validate_batch_size(batch_size)?;
    Ok(Batcher::new(records.into_iter()).batch_size(batch_size))
}

#[cfg(test)]
pub(crate) mod tests {
    use candle_core::Device;

    use super::*;

    /// Record `i` holds image `[i]` and label `i`.
    pub(crate) fn records(n: usize) -> Vec<Result<Record>> {
        (0..n)
            .map(|i| -> Result<Record> {
                Ok(Record {
                    image: Tensor::new(&[i as f32], &Device::Cpu)?,
                    label: Tensor::new(i as f32, &Device::Cpu)?,
                })
            })
            .collect()
    }

    pub(crate) fn labels_of(batch: &Batch) -> Vec<f32> {
        batch.labels.to_vec1::<f32>().unwrap()
    }

    fn sizes_and_order(n: usize, b: i64) -> (Vec<usize>, Vec<f32>) {
        let mut sizes = vec![];
        let mut order = vec![];
        for item in batch(records(n), b).unwrap() {
            let item = item.unwrap();
            sizes.push(item.len());
            order.extend(labels_of(&item));
        }
        (sizes, order)
    }

    #[test]
    fn test_hundred_records_in_thirty_twos() {
        let (sizes, order) = sizes_and_order(100, 32);
        assert_eq!(sizes, vec![32, 32, 32, 4]);
        assert_eq!(order, (0..100).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_batch_counts_follow_ceil_division() {
        for (n, b) in [(0, 3), (1, 1), (5, 5), (6, 5), (7, 2), (10, 20)] {
            let (sizes, order) = sizes_and_order(n, b);
            let b = b as usize;
            assert_eq!(sizes.len(), n.div_ceil(b), "n={n} b={b}");
            if let Some((last, full)) = sizes.split_last() {
                assert!(full.iter().all(|&s| s == b));
                assert_eq!(*last, if n % b == 0 { b } else { n % b });
            }
            assert_eq!(order.len(), n);
        }
    }

    #[test]
    fn test_batch_shapes() {
        let first = batch(records(10), 4).unwrap().next().unwrap().unwrap();
        assert_eq!(first.images.dims(), &[4, 1]);
        assert_eq!(first.labels.dims(), &[4]);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_drop_last() {
        let sizes = Batcher::new(records(10).into_iter())
            .batch_size(4)
            .return_last_incomplete_batch(false)
            .map(|b| b.unwrap().len())
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![4, 4]);
    }

    #[test]
    fn test_non_positive_batch_size_is_invalid_configuration() {
        for bad in [0, -5] {
            assert!(matches!(
                batch(records(10), bad),
                Err(Error::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_failed_record_fails_its_batch_only() {
        let mut input = records(10);
        input[5] = Err(Error::InvalidRecordShape {
            expected: vec![1],
            found: vec![2],
            samples: 2,
        });
        let out = batch(input, 4).unwrap().collect::<Vec<_>>();
        assert_eq!(out.len(), 3);
        assert_eq!(labels_of(out[0].as_ref().unwrap()), vec![0.0, 1.0, 2.0, 3.0]);
        assert!(matches!(out[1], Err(Error::InvalidRecordShape { .. })));
        assert_eq!(labels_of(out[2].as_ref().unwrap()), vec![8.0, 9.0]);
    }

    #[test]
    fn test_failed_record_alone_in_last_batch_still_surfaces() {
        let mut input = records(5);
        input[4] = Err(Error::InvalidRecordShape {
            expected: vec![1],
            found: vec![],
            samples: 0,
        });
        let out = Batcher::new(input.into_iter())
            .batch_size(4)
            .return_last_incomplete_batch(false)
            .collect::<Vec<_>>();
        assert_eq!(out.len(), 2);
        assert!(out[0].is_ok());
        assert!(out[1].is_err());
    }
}
