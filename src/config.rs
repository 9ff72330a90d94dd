use std::{path::PathBuf, str::FromStr};

use crate::error::{Error, Result};

pub const DATASET_NAME: &str = "fashion_mnist";

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset: String,
    pub split: String,
    pub batch_size: i64,
    pub prefetch_depth: i64,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub drop_last: bool,
    pub data_dir: PathBuf,
    pub download: bool,
    pub preview: Option<PathBuf>,
}

impl Config {
    pub fn fashion_mnist() -> Self {
        Self {
            dataset: DATASET_NAME.to_string(),
            split: "train".to_string(),
            batch_size: 32,
            prefetch_depth: 1,
            shuffle: false,
            seed: None,
            drop_last: false,
            data_dir: PathBuf::from("data/fashion_mnist"),
            download: true,
            preview: None,
        }
    }

    /// `Config::fashion_mnist()` with `FASHION_MNIST_*` environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::fashion_mnist();
        if let Some(split) = lookup("FASHION_MNIST_SPLIT") {
            cfg.split = split;
        }
        if let Some(v) = lookup("FASHION_MNIST_BATCH_SIZE") {
            cfg.batch_size = parse_var("FASHION_MNIST_BATCH_SIZE", &v)?;
        }
        if let Some(v) = lookup("FASHION_MNIST_PREFETCH") {
            cfg.prefetch_depth = parse_var("FASHION_MNIST_PREFETCH", &v)?;
        }
        if let Some(v) = lookup("FASHION_MNIST_SHUFFLE") {
            cfg.shuffle = parse_flag("FASHION_MNIST_SHUFFLE", &v)?;
        }
        if let Some(v) = lookup("FASHION_MNIST_SEED") {
            cfg.seed = Some(parse_var("FASHION_MNIST_SEED", &v)?);
        }
        if let Some(v) = lookup("FASHION_MNIST_DROP_LAST") {
            cfg.drop_last = parse_flag("FASHION_MNIST_DROP_LAST", &v)?;
        }
        if let Some(dir) = lookup("FASHION_MNIST_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(v) = lookup("FASHION_MNIST_DOWNLOAD") {
            cfg.download = parse_flag("FASHION_MNIST_DOWNLOAD", &v)?;
        }
        if let Some(path) = lookup("FASHION_MNIST_PREVIEW") {
            cfg.preview = Some(PathBuf::from(path));
        }
        Ok(cfg)
    }
}

pub fn validate_batch_size(batch_size: i64) -> Result<usize> {
    if batch_size <= 0 {
        return Err(Error::configuration(format!(
            "batch_size must be positive, got {batch_size}"
        )));
    }
    usize::try_from(batch_size)
        .map_err(|_| Error::configuration(format!("batch_size {batch_size} is too large")))
}

pub fn validate_prefetch_depth(depth: i64) -> Result<usize> {
    if depth < 0 {
        return Err(Error::configuration(format!(
            "prefetch depth must be non-negative, got {depth}"
        )));
    }
    usize::try_from(depth)
        .map_err(|_| Error::configuration(format!("prefetch depth {depth} is too large")))
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::configuration(format!("{key}: cannot parse {value:?}")))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "{key}: expected a boolean, got {value:?}"
        ))),
    }
}
