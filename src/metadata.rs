pub const CLASS_NAMES: [&str; 10] = [
    "T-shirt/top",
    "Trouser",
    "Pullover",
    "Dress",
    "Coat",
    "Sandal",
    "Shirt",
    "Sneaker",
    "Bag",
    "Ankle boot",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub split: String,
    /// Records in the (possibly sliced) split.
    pub num_records: usize,
    /// Records in the whole split before slicing.
    pub split_size: usize,
    pub image_shape: Vec<usize>,
    pub class_names: Vec<String>,
}

impl Metadata {
    pub fn num_classes(&self) -> usize {
        self.class_names.len()
    }

    pub fn class_name(&self, label: i64) -> Option<&str> {
        usize::try_from(label)
            .ok()
            .and_then(|i| self.class_names.get(i))
            .map(String::as_str)
    }

    pub fn num_batches(&self, batch_size: usize, drop_last: bool) -> usize {
        if batch_size == 0 {
            return 0;
        }
        if drop_last {
            self.num_records / batch_size
        } else {
            self.num_records.div_ceil(batch_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(num_records: usize) -> Metadata {
        Metadata {
            name: "fashion_mnist".to_string(),
            split: "train".to_string(),
            num_records,
            split_size: 60_000,
            image_shape: vec![28, 28, 1],
            class_names: CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_num_batches() {
        let info = metadata(100);
        assert_eq!(info.num_batches(32, false), 4);
        assert_eq!(info.num_batches(32, true), 3);
        assert_eq!(info.num_batches(25, false), 4);
        assert_eq!(info.num_batches(0, false), 0);
        assert_eq!(metadata(0).num_batches(32, false), 0);
    }

    #[test]
    fn test_class_names() {
        let info = metadata(1);
        assert_eq!(info.num_classes(), 10);
        assert_eq!(info.class_name(0), Some("T-shirt/top"));
        assert_eq!(info.class_name(9), Some("Ankle boot"));
        assert_eq!(info.class_name(10), None);
        assert_eq!(info.class_name(-1), None);
    }
}
