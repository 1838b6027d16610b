//! Dataset acquisition: local cache first, one-shot remote download second.

pub mod kaggle;

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::data::loader::{read_csv, write_csv};
use crate::data::model::Dataset;

pub use kaggle::KaggleFetcher;

// ---------------------------------------------------------------------------
// Remote fetch collaborator
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("dataset handle '{0}' is not of the form owner/name")]
    InvalidHandle(String),
    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not unpack the downloaded archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Resolves a dataset handle to a local directory containing its files.
pub trait DatasetFetcher {
    fn fetch(&self, handle: &str) -> Result<PathBuf, FetchError>;
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Reasons a dataset could not be produced. `Display` is shown to the user.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error downloading dataset: {0}")]
    Fetch(#[from] FetchError),
    #[error("No CSV file found in the downloaded dataset ({}).", .0.display())]
    NoCsvFile(PathBuf),
    #[error("Error reading downloaded dataset: {0:#}")]
    Parse(anyhow::Error),
    #[error("Error saving local cache: {0:#}")]
    Persist(anyhow::Error),
    #[error("Error preparing local cache {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a loaded dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Cache,
    /// Freshly downloaded. `replaced_cache` is set when an unreadable cache
    /// file was found and overwritten.
    Download { replaced_cache: bool },
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub dataset: Arc<Dataset>,
    pub source: DataSource,
}

/// Loads the exoplanet table once per provider and keeps it.
pub struct DatasetProvider<F> {
    cache_path: PathBuf,
    handle: String,
    fetcher: F,
    loaded: OnceCell<Loaded>,
}

impl<F: DatasetFetcher> DatasetProvider<F> {
    pub fn new(cache_path: impl Into<PathBuf>, handle: impl Into<String>, fetcher: F) -> Self {
        Self {
            cache_path: cache_path.into(),
            handle: handle.into(),
            fetcher,
            loaded: OnceCell::new(),
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Return the dataset, reading the cache or downloading on first use.
    ///
    /// Successful loads are memoized; a failed load may be retried by
    /// calling again.
    pub fn load(&self) -> Result<Loaded, LoadError> {
        if let Some(loaded) = self.loaded.get() {
            return Ok(loaded.clone());
        }
        let loaded = self.resolve()?;
        Ok(self.loaded.get_or_init(|| loaded).clone())
    }

    fn resolve(&self) -> Result<Loaded, LoadError> {
        let mut replaced_cache = false;

        if self.cache_path.exists() {
            match read_csv(&self.cache_path) {
                Ok(ds) => {
                    log::info!(
                        "Loaded {} exoplanets from cache {}",
                        ds.len(),
                        self.cache_path.display()
                    );
                    return Ok(Loaded {
                        dataset: Arc::new(ds),
                        source: DataSource::Cache,
                    });
                }
                Err(e) => {
                    log::warn!("Discarding unreadable cache: {e:#}");
                    replaced_cache = true;
                }
            }
        }

        if let Some(dir) = self.cache_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        log::info!("Downloading dataset {} (this will only happen once)...", self.handle);
        let download_dir = self.fetcher.fetch(&self.handle)?;

        let csv_path = first_csv(&download_dir)?;
        let ds = read_csv(&csv_path).map_err(LoadError::Parse)?;

        write_csv(&ds, &self.cache_path).map_err(LoadError::Persist)?;
        log::info!(
            "Cached {} exoplanets at {}",
            ds.len(),
            self.cache_path.display()
        );

        Ok(Loaded {
            dataset: Arc::new(ds),
            source: DataSource::Download { replaced_cache },
        })
    }
}

/// First `*.csv` entry of `dir` by file name.
fn first_csv(dir: &Path) -> Result<PathBuf, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| LoadError::NoCsvFile(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const PLANETS: &str = "Planet Name,Mass,Discovery Year\n\
                           Kepler-1 b,1.0,2014\n\
                           51 Peg b,0.47,1995\n";

    /// Serves a fixed directory and counts how often it is asked.
    struct StubFetcher {
        dir: Option<PathBuf>,
        calls: Cell<usize>,
    }

    impl StubFetcher {
        fn serving(dir: &Path) -> Self {
            Self { dir: Some(dir.to_path_buf()), calls: Cell::new(0) }
        }

        fn failing() -> Self {
            Self { dir: None, calls: Cell::new(0) }
        }
    }

    impl DatasetFetcher for StubFetcher {
        fn fetch(&self, handle: &str) -> Result<PathBuf, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.dir
                .clone()
                .ok_or_else(|| FetchError::InvalidHandle(handle.to_string()))
        }
    }

    fn remote_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    #[test]
    fn valid_cache_is_used_without_fetching() {
        let work = tempfile::tempdir().unwrap();
        let cache = work.path().join("exoplanets.csv");
        std::fs::write(&cache, PLANETS).unwrap();

        let provider = DatasetProvider::new(&cache, "owner/set", StubFetcher::failing());
        let first = provider.load().unwrap();
        let second = provider.load().unwrap();

        assert_eq!(first.source, DataSource::Cache);
        assert_eq!(first.dataset, second.dataset);
        assert!(Arc::ptr_eq(&first.dataset, &second.dataset));
        assert_eq!(provider.fetcher.calls.get(), 0);
    }

    #[test]
    fn two_providers_over_one_cache_agree() {
        let work = tempfile::tempdir().unwrap();
        let cache = work.path().join("exoplanets.csv");
        std::fs::write(&cache, PLANETS).unwrap();

        let a = DatasetProvider::new(&cache, "owner/set", StubFetcher::failing());
        let b = DatasetProvider::new(&cache, "owner/set", StubFetcher::failing());
        assert_eq!(a.load().unwrap().dataset, b.load().unwrap().dataset);
    }

    #[test]
    fn missing_cache_downloads_and_persists() {
        let remote = remote_dir(&[("data.csv", PLANETS)]);
        let work = tempfile::tempdir().unwrap();
        let cache = work.path().join("data").join("exoplanets.csv");

        let provider = DatasetProvider::new(&cache, "owner/set", StubFetcher::serving(remote.path()));
        let loaded = provider.load().unwrap();

        assert_eq!(loaded.source, DataSource::Download { replaced_cache: false });
        assert_eq!(loaded.dataset.len(), 2);
        assert!(cache.exists());
        assert_eq!(*loaded.dataset, read_csv(&cache).unwrap());
        assert_eq!(
            *loaded.dataset,
            read_csv(&remote.path().join("data.csv")).unwrap()
        );

        provider.load().unwrap();
        assert_eq!(provider.fetcher.calls.get(), 1);
    }

    #[test]
    fn corrupt_cache_falls_through_to_download() {
        let remote = remote_dir(&[("data.csv", PLANETS)]);
        let work = tempfile::tempdir().unwrap();
        let cache = work.path().join("exoplanets.csv");
        std::fs::write(&cache, "Planet Name,Mass\nbroken,1.0,extra,fields\n").unwrap();

        let provider = DatasetProvider::new(&cache, "owner/set", StubFetcher::serving(remote.path()));
        let loaded = provider.load().unwrap();

        assert_eq!(loaded.source, DataSource::Download { replaced_cache: true });
        assert_eq!(provider.fetcher.calls.get(), 1);
        assert_eq!(read_csv(&cache).unwrap().len(), 2);
    }

    #[test]
    fn first_csv_by_name_is_picked() {
        let remote = remote_dir(&[
            ("readme.txt", "hello"),
            ("b.csv", "Mass\n2\n"),
            ("a.CSV", "Mass\n1\n2\n"),
        ]);
        let work = tempfile::tempdir().unwrap();
        let cache = work.path().join("exoplanets.csv");

        let provider = DatasetProvider::new(&cache, "owner/set", StubFetcher::serving(remote.path()));
        assert_eq!(provider.load().unwrap().dataset.len(), 2);
    }

    #[test]
    fn no_csv_in_download_is_reported() {
        let remote = remote_dir(&[("readme.txt", "hello")]);
        let work = tempfile::tempdir().unwrap();
        let cache = work.path().join("exoplanets.csv");

        let provider = DatasetProvider::new(&cache, "owner/set", StubFetcher::serving(remote.path()));
        let err = provider.load().unwrap_err();

        assert!(matches!(err, LoadError::NoCsvFile(_)));
        assert!(err.to_string().starts_with("No CSV file found"));
        assert!(!cache.exists());
    }

    #[test]
    fn fetch_failure_is_terminal_and_not_memoized() {
        let work = tempfile::tempdir().unwrap();
        let cache = work.path().join("exoplanets.csv");

        let provider = DatasetProvider::new(&cache, "owner/set", StubFetcher::failing());
        assert!(matches!(provider.load(), Err(LoadError::Fetch(_))));
        assert!(provider.load().is_err());
        assert_eq!(provider.fetcher.calls.get(), 2);
    }
}
