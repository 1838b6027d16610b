use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::{DatasetFetcher, FetchError};
use crate::config::Config;

const USER_AGENT: &str = concat!("exoplanet-explorer/", env!("CARGO_PKG_VERSION"));
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub key: String,
}

/// Downloads public Kaggle datasets into a local per-dataset directory.
///
/// Layout mirrors the Kaggle client cache:
/// `{cache_root}/datasets/{owner}/{slug}/`. A directory that already holds
/// files is returned as-is.
pub struct KaggleFetcher {
    base_url: String,
    cache_root: PathBuf,
    timeout: Option<Duration>,
    credentials: Option<Credentials>,
}

impl KaggleFetcher {
    pub fn new(base_url: impl Into<String>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            cache_root: cache_root.into(),
            timeout: None,
            credentials: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let cache_root = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kagglehub");
        Self::new(config.kaggle_base_url.trim_end_matches('/'), cache_root)
            .with_timeout(config.fetch_timeout_secs.map(Duration::from_secs))
            .with_credentials(discover_credentials())
    }

    fn dataset_dir(&self, owner: &str, slug: &str) -> PathBuf {
        self.cache_root.join("datasets").join(owner).join(slug)
    }

    /// Sibling of the dataset directory that a download is unpacked into.
    /// The whole slug is kept, so `set.v2` and `set.v3` never share one.
    fn staging_dir(&self, owner: &str, slug: &str) -> PathBuf {
        self.dataset_dir(owner, slug).with_file_name(format!("{slug}.partial"))
    }

    fn download(&self, owner: &str, slug: &str) -> Result<Vec<u8>, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?;

        let url = format!("{}/datasets/download/{owner}/{slug}", self.base_url);
        let mut request = client.get(&url);
        if let Some(c) = &self.credentials {
            request = request.basic_auth(&c.username, Some(&c.key));
        }

        log::debug!("GET {url}");
        let response = request.send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

impl DatasetFetcher for KaggleFetcher {
    fn fetch(&self, handle: &str) -> Result<PathBuf, FetchError> {
        let (owner, slug) = parse_handle(handle)?;
        let dir = self.dataset_dir(owner, slug);

        if has_files(&dir) {
            log::info!("Using previously downloaded files in {}", dir.display());
            return Ok(dir);
        }

        let payload = self.download(owner, slug)?;

        // Unpack beside the final location so an interrupted run never
        // leaves a half-filled dataset directory behind.
        let staging = self.staging_dir(owner, slug);
        if staging.exists() {
            std::fs::remove_dir_all(&staging)?;
        }
        std::fs::create_dir_all(&staging)?;
        store_payload(&payload, &staging, slug)?;

        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::rename(&staging, &dir)?;
        log::info!("Dataset downloaded to {}", dir.display());
        Ok(dir)
    }
}

/// Split `owner/slug`.
pub fn parse_handle(handle: &str) -> Result<(&str, &str), FetchError> {
    match handle.split_once('/') {
        Some((owner, slug))
            if !owner.is_empty() && !slug.is_empty() && !slug.contains('/') =>
        {
            Ok((owner, slug))
        }
        _ => Err(FetchError::InvalidHandle(handle.to_string())),
    }
}

/// Extract a ZIP payload into `dir`, or store a bare file as `{slug}.csv`.
fn store_payload(payload: &[u8], dir: &Path, slug: &str) -> Result<(), FetchError> {
    if payload.starts_with(ZIP_MAGIC) {
        let mut archive = zip::ZipArchive::new(Cursor::new(payload))?;
        archive.extract(dir)?;
    } else {
        std::fs::write(dir.join(format!("{slug}.csv")), payload)?;
    }
    Ok(())
}

fn has_files(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// `KAGGLE_USERNAME`/`KAGGLE_KEY`, falling back to `~/.kaggle/kaggle.json`.
/// Public datasets download without credentials.
fn discover_credentials() -> Option<Credentials> {
    if let (Ok(username), Ok(key)) = (std::env::var("KAGGLE_USERNAME"), std::env::var("KAGGLE_KEY")) {
        return Some(Credentials { username, key });
    }
    let path = dirs::home_dir()?.join(".kaggle").join("kaggle.json");
    let text = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&text) {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("Ignoring malformed {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answer exactly one HTTP request on a loopback port with `status` and
    /// `body`. Returns the base URL and the server thread.
    fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}"), server)
    }

    fn zipped_csv(name: &str, contents: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut w = zip::ZipWriter::new(Cursor::new(&mut buf));
            w.start_file(name, zip::write::SimpleFileOptions::default())
                .unwrap();
            w.write_all(contents).unwrap();
            w.finish().unwrap();
        }
        buf
    }

    #[test]
    fn handle_must_be_owner_slash_slug() {
        assert_eq!(
            parse_handle("shivamb/all-exoplanets-dataset").unwrap(),
            ("shivamb", "all-exoplanets-dataset")
        );
        for bad in ["", "noslash", "/slug", "owner/", "a/b/c"] {
            assert!(matches!(parse_handle(bad), Err(FetchError::InvalidHandle(_))), "{bad}");
        }
    }

    #[test]
    fn zip_payload_is_extracted() {
        let buf = zipped_csv("all_exoplanets_2021.csv", b"Planet Name,Mass\nb,1\n");
        let dir = tempfile::tempdir().unwrap();

        store_payload(&buf, dir.path(), "all-exoplanets-dataset").unwrap();

        let text = std::fs::read_to_string(dir.path().join("all_exoplanets_2021.csv")).unwrap();
        assert!(text.starts_with("Planet Name,Mass"));
    }

    #[test]
    fn plain_payload_is_stored_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        store_payload(b"Mass\n1\n", dir.path(), "planets").unwrap();
        assert!(dir.path().join("planets.csv").is_file());
    }

    #[test]
    fn populated_dataset_dir_is_reused_offline() {
        let root = tempfile::tempdir().unwrap();
        let fetcher = KaggleFetcher::new("http://127.0.0.1:9", root.path());
        let dir = fetcher.dataset_dir("owner", "set");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("set.csv"), "Mass\n1\n").unwrap();

        assert_eq!(fetcher.fetch("owner/set").unwrap(), dir);
    }

    #[test]
    fn kaggle_json_shape_deserializes() {
        let c: Credentials = serde_json::from_str(r#"{"username":"u","key":"k"}"#).unwrap();
        assert_eq!(c, Credentials { username: "u".into(), key: "k".into() });
    }

    #[test]
    fn staging_dir_keeps_the_whole_slug() {
        let fetcher = KaggleFetcher::new("http://127.0.0.1:9", "/cache");
        let staging = fetcher.staging_dir("owner", "set.v2");

        assert_eq!(staging, PathBuf::from("/cache/datasets/owner/set.v2.partial"));
        assert_ne!(staging, fetcher.staging_dir("owner", "set.v3"));
        assert_ne!(staging, fetcher.dataset_dir("owner", "set"));
    }

    #[test]
    fn fetch_downloads_and_publishes_the_archive() {
        let body = zipped_csv("planets.csv", b"Planet Name,Mass\nb,1\n");
        let (base, server) = serve_once("200 OK", body);
        let root = tempfile::tempdir().unwrap();
        let fetcher = KaggleFetcher::new(base, root.path());

        let dir = fetcher.fetch("owner/set.v2").unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /datasets/download/owner/set.v2 "), "{request}");
        assert_eq!(dir, fetcher.dataset_dir("owner", "set.v2"));
        assert!(dir.join("planets.csv").is_file());
        assert!(!fetcher.staging_dir("owner", "set.v2").exists());
    }

    #[test]
    fn fetch_replaces_empty_dir_and_stale_staging() {
        let (base, server) = serve_once("200 OK", b"Mass\n1\n".to_vec());
        let root = tempfile::tempdir().unwrap();
        let fetcher = KaggleFetcher::new(base, root.path());
        let dir = fetcher.dataset_dir("owner", "set");
        let staging = fetcher.staging_dir("owner", "set");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join("leftover.csv"), "junk").unwrap();

        assert_eq!(fetcher.fetch("owner/set").unwrap(), dir);
        server.join().unwrap();

        assert_eq!(std::fs::read_to_string(dir.join("set.csv")).unwrap(), "Mass\n1\n");
        assert!(!dir.join("leftover.csv").exists());
        assert!(!staging.exists());
    }

    #[test]
    fn http_error_leaves_no_dataset_dir() {
        let (base, server) = serve_once("404 Not Found", Vec::new());
        let root = tempfile::tempdir().unwrap();
        let fetcher = KaggleFetcher::new(base, root.path());

        let err = fetcher.fetch("owner/set").unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, FetchError::Http(_)), "{err:?}");
        assert!(!fetcher.dataset_dir("owner", "set").exists());
        assert!(!fetcher.staging_dir("owner", "set").exists());
    }
}
