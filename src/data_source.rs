use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use log::debug;

use crate::{
    config::Config,
    error::{Error, Result},
};

pub const DEFAULT_MIRROR: &str = "http://fashion-mnist.s3-website.eu-central-1.amazonaws.com/";

/// Where the IDX files of the dataset live: a local cache directory,
/// optionally backed by a download mirror.
#[derive(Debug, Clone)]
pub struct DataSource {
    dir: PathBuf,
    download: bool,
    mirror: String,
}

impl DataSource {
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            download: false,
            mirror: DEFAULT_MIRROR.to_string(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::local(&cfg.data_dir).with_download(cfg.download)
    }

    pub fn with_download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    pub fn with_mirror(mut self, mirror: impl Into<String>) -> Self {
        self.mirror = mirror.into();
        self
    }

    /// Bytes of `base_name`, trying the plain file, then `.gz`, then the mirror.
    pub fn read(&self, base_name: &str) -> Result<Vec<u8>> {
        let plain = self.dir.join(base_name);
        if plain.is_file() {
            debug!("reading {}", plain.display());
            return fs::read(&plain).map_err(|e| read_error(&plain, e));
        }

        let gz = self.dir.join(format!("{base_name}.gz"));
        if !gz.is_file() {
            if !self.download {
                return Err(Error::unavailable(format!(
                    "{base_name} not found in {} and downloads are disabled",
                    self.dir.display()
                )));
            }
            self.download(base_name, &gz)?;
        }
        debug!("reading {}", gz.display());
        decompress(&gz)
    }

    #[cfg(feature = "download")]
    fn download(&self, base_name: &str, dest: &Path) -> Result<()> {
        let url = format!("{}{base_name}.gz", self.mirror);
        log::info!("downloading {url}");
        let body = reqwest::blocking::get(&url)
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(|e| Error::unavailable(format!("fetching {url}: {e}")))?;

        fs::create_dir_all(&self.dir).map_err(|e| read_error(&self.dir, e))?;
        let partial = dest.with_extension("gz.partial");
        fs::write(&partial, &body).map_err(|e| read_error(&partial, e))?;
        fs::rename(&partial, dest).map_err(|e| read_error(dest, e))?;
        debug!("cached {} bytes at {}", body.len(), dest.display());
        Ok(())
    }

    #[cfg(not(feature = "download"))]
    fn download(&self, base_name: &str, _dest: &Path) -> Result<()> {
        Err(Error::unavailable(format!(
            "{base_name} not found in {} and this build has no download support",
            self.dir.display()
        )))
    }
}

fn decompress(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| read_error(path, e))?;
    let mut bytes = Vec::new();
    GzDecoder::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| read_error(path, e))?;
    Ok(bytes)
}

fn read_error(path: &Path, err: std::io::Error) -> Error {
    Error::unavailable(format!("{}: {err}", path.display()))
}
