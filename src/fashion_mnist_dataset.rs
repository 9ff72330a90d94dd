use std::{ops::Deref, sync::Arc};

use log::info;

use crate::{
    config::DATASET_NAME,
    data_source::DataSource,
    error::{Error, Result},
    idx,
    metadata::{CLASS_NAMES, Metadata},
    record::{RawImage, RawRecord},
    split::SplitSpec,
};

#[derive(Clone, Debug)]
pub struct FashionMnistDataset(Arc<FashionMnistDataset_>);

#[derive(Debug)]
pub struct FashionMnistDataset_ {
    records: Vec<RawRecord>,
}

impl FashionMnistDataset {
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        Self(Arc::new(FashionMnistDataset_ { records }))
    }

    /// Pairs an IDX image file (`[count, rows, cols]`) with an IDX label file
    /// (`[count]`). Images get a trailing channel axis: `[rows, cols, 1]`.
    pub fn from_idx(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Self> {
        let images = idx::parse(image_bytes, "images")?;
        let labels = idx::parse(label_bytes, "labels")?;

        if images.dims.len() != 3 {
            return Err(Error::unavailable(format!(
                "image file must be rank 3, found dimensions {:?}",
                images.dims
            )));
        }
        if labels.dims.len() != 1 {
            return Err(Error::unavailable(format!(
                "label file must be rank 1, found dimensions {:?}",
                labels.dims
            )));
        }
        if images.len() != labels.len() {
            return Err(Error::unavailable(format!(
                "{} images but {} labels",
                images.len(),
                labels.len()
            )));
        }

        let mut shape = images.item_dims().to_vec();
        shape.push(1);
        let records = (0..images.len())
            .map(|i| RawRecord {
                image: RawImage::u8(shape.clone(), images.item(i).to_vec()),
                label: labels.item(i)[0] as i64,
            })
            .collect();

        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, idx: usize) -> &RawRecord {
        &self.records[idx]
    }

    /// Shape of the first record, if any.
    pub fn image_shape(&self) -> Option<&[usize]> {
        self.records.first().map(|r| r.image.shape.as_slice())
    }

    fn slice(&self, range: std::ops::Range<usize>) -> Self {
        if range.start == 0 && range.end == self.len() {
            return self.clone();
        }
        Self::from_records(self.records[range].to_vec())
    }
}

impl Deref for FashionMnistDataset {
    type Target = FashionMnistDataset_;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Opens `split` of the named dataset from `source`.
pub fn load(name: &str, split: &str, source: &DataSource) -> Result<(FashionMnistDataset, Metadata)> {
    if name != DATASET_NAME {
        return Err(Error::unavailable(format!(
            "unknown dataset {name:?}, only {DATASET_NAME:?} is available"
        )));
    }
    let spec: SplitSpec = split.parse()?;
    let (images_file, labels_file) = spec.name.file_names();

    let image_bytes = source.read(images_file)?;
    let label_bytes = source.read(labels_file)?;
    let full = FashionMnistDataset::from_idx(&image_bytes, &label_bytes)?;

    let split_size = full.len();
    let image_shape = full.image_shape().map(<[usize]>::to_vec).unwrap_or_default();
    let dataset = full.slice(spec.resolve(split_size));

    let metadata = Metadata {
        name: name.to_string(),
        split: spec.to_string(),
        num_records: dataset.len(),
        split_size,
        image_shape,
        class_names: CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
    };
    info!(
        "loaded {}/{}: {} of {} records, image shape {:?}",
        metadata.name, metadata.split, metadata.num_records, split_size, metadata.image_shape
    );

    Ok((dataset, metadata))
}
