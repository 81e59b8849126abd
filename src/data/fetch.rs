use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::info;
use tempfile::{NamedTempFile, TempDir};

use crate::error::LoadError;

pub const DEFAULT_URL: &str = "https://www.cs.cmu.edu/~ark/personas/data/MovieSummaries.tar.gz";
pub const ARCHIVE_NAME: &str = "MovieSummaries.tar.gz";
pub const EXTRACTED_DIR: &str = "MovieSummaries";

// ---------------------------------------------------------------------------
// DatasetSource – where the archive comes from and where it is cached
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DatasetSource {
    pub url: String,
    pub cache_dir: PathBuf,
    pub archive_name: String,
}

impl DatasetSource {
    /// The public corpus cached under `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        DatasetSource {
            url: DEFAULT_URL.to_string(),
            cache_dir: cache_dir.into(),
            archive_name: ARCHIVE_NAME.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn archive_path(&self) -> PathBuf {
        self.cache_dir.join(&self.archive_name)
    }

    pub fn extracted_dir(&self) -> PathBuf {
        self.cache_dir.join(EXTRACTED_DIR)
    }

    /// Download and extract as needed, returning the extracted directory.
    /// Both steps are skipped when their artifacts already exist.
    pub fn ensure(&self) -> Result<PathBuf, LoadError> {
        fs::create_dir_all(&self.cache_dir).map_err(|e| LoadError::io(&self.cache_dir, e))?;

        let archive = self.archive_path();
        if archive.exists() {
            info!("Using cached archive {}", archive.display());
        } else {
            download(&self.url, &archive)?;
        }

        let extracted = self.extracted_dir();
        if extracted.exists() {
            info!("Using extracted data in {}", extracted.display());
        } else {
            extract(&archive, &self.cache_dir)?;
        }
        Ok(extracted)
    }
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// Stream `url` into `dest`. The body goes to a temporary file in the same
/// directory and is only renamed to `dest` once fully written.
fn download(url: &str, dest: &Path) -> Result<(), LoadError> {
    info!("Downloading {url}");
    let mut response = reqwest::blocking::get(url)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status,
        });
    }

    let dir = parent_dir(dest);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| LoadError::io(dir, e))?;
    let bytes = response.copy_to(tmp.as_file_mut())?;
    tmp.persist(dest).map_err(|e| LoadError::io(dest, e.error))?;

    info!("Download complete ({bytes} bytes)");
    Ok(())
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Unpack a `.tar.gz` archive whose top-level entry is [`EXTRACTED_DIR`]
/// into `cache_dir`. Unpacking happens in a scratch directory which is
/// removed on any failure.
pub fn extract(archive: &Path, cache_dir: &Path) -> Result<(), LoadError> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !(name.ends_with(".tar.gz") || name.ends_with(".tgz")) {
        return Err(LoadError::UnsupportedArchive(archive.to_path_buf()));
    }

    info!("Extracting {}", archive.display());
    let file = File::open(archive).map_err(|e| LoadError::io(archive, e))?;
    let scratch = TempDir::new_in(cache_dir).map_err(|e| LoadError::io(cache_dir, e))?;

    tar::Archive::new(GzDecoder::new(BufReader::new(file)))
        .unpack(scratch.path())
        .map_err(|e| LoadError::io(archive, e))?;

    let unpacked = scratch.path().join(EXTRACTED_DIR);
    if !unpacked.is_dir() {
        return Err(LoadError::MissingFile(PathBuf::from(EXTRACTED_DIR)));
    }
    let target = cache_dir.join(EXTRACTED_DIR);
    fs::rename(&unpacked, &target).map_err(|e| LoadError::io(&target, e))?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Gzipped tar holding `{top}/movie.metadata.tsv`.
    fn archive_bytes(top: &str) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

        let body = b"1\t/m/x\tTitle\t2001\t\t90\t{}\t{}\t{}\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{top}/movie.metadata.tsv"), &body[..])
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap()
    }

    /// Build a small `MovieSummaries.tar.gz` in `dir`.
    fn build_archive(dir: &Path, top: &str) -> PathBuf {
        let path = dir.join(ARCHIVE_NAME);
        fs::write(&path, archive_bytes(top)).unwrap();
        path
    }

    /// Answer a single HTTP request on a local port with `status` and `body`,
    /// returning the archive URL to fetch.
    fn serve_once(status: &'static str, body: Vec<u8>) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/{ARCHIVE_NAME}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        (url, handle)
    }

    fn cache_entries(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect()
    }

    // Port 9 (discard) is never contacted: every test below has the archive
    // in place already.
    fn offline_source(dir: &Path) -> DatasetSource {
        DatasetSource::new(dir).with_url("http://127.0.0.1:9/MovieSummaries.tar.gz")
    }

    #[test]
    fn extracts_cached_archive_without_downloading() {
        let dir = tempfile::tempdir().unwrap();
        build_archive(dir.path(), EXTRACTED_DIR);

        let extracted = offline_source(dir.path()).ensure().unwrap();

        assert_eq!(extracted, dir.path().join(EXTRACTED_DIR));
        let body = fs::read_to_string(extracted.join("movie.metadata.tsv")).unwrap();
        assert!(body.starts_with("1\t/m/x\tTitle"));
    }

    #[test]
    fn downloads_missing_archive_then_extracts() {
        let dir = tempfile::tempdir().unwrap();
        let (url, server) = serve_once("200 OK", archive_bytes(EXTRACTED_DIR));
        let source = DatasetSource::new(dir.path()).with_url(url);

        let extracted = source.ensure().unwrap();
        server.join().unwrap();

        assert_eq!(fs::read(source.archive_path()).unwrap(), archive_bytes(EXTRACTED_DIR));
        let body = fs::read_to_string(extracted.join("movie.metadata.tsv")).unwrap();
        assert_eq!(body, "1\t/m/x\tTitle\t2001\t\t90\t{}\t{}\t{}\n");
        let mut entries = cache_entries(dir.path());
        entries.sort();
        assert_eq!(entries, [extracted, source.archive_path()]);
    }

    #[test]
    fn http_error_leaves_no_archive_behind() {
        let dir = tempfile::tempdir().unwrap();
        let (url, server) = serve_once("404 Not Found", Vec::new());
        let source = DatasetSource::new(dir.path()).with_url(url.clone());

        match source.ensure() {
            Err(LoadError::Status { url: failed, status }) => {
                assert_eq!(failed, url);
                assert_eq!(status.as_u16(), 404);
            }
            other => panic!("expected Status error, got {other:?}"),
        }
        server.join().unwrap();

        assert!(!source.archive_path().exists());
        assert!(cache_entries(dir.path()).is_empty(), "no temporary files are left");
    }

    #[test]
    fn existing_extraction_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        build_archive(dir.path(), EXTRACTED_DIR);
        let marker = dir.path().join(EXTRACTED_DIR);
        fs::create_dir(&marker).unwrap();
        fs::write(marker.join("keep.txt"), "x").unwrap();

        let extracted = offline_source(dir.path()).ensure().unwrap();

        assert!(extracted.join("keep.txt").exists());
        assert!(!extracted.join("movie.metadata.tsv").exists());
    }

    #[test]
    fn rejects_unsupported_archive_format() {
        let dir = tempfile::tempdir().unwrap();
        let zip = dir.path().join("MovieSummaries.zip");
        fs::write(&zip, b"PK").unwrap();

        match extract(&zip, dir.path()) {
            Err(LoadError::UnsupportedArchive(path)) => assert_eq!(path, zip),
            other => panic!("expected UnsupportedArchive, got {other:?}"),
        }
    }

    #[test]
    fn failed_extraction_leaves_no_partial_directory() {
        let dir = tempfile::tempdir().unwrap();
        let archive = build_archive(dir.path(), "SomethingElse");

        assert!(matches!(
            extract(&archive, dir.path()),
            Err(LoadError::MissingFile(_))
        ));
        assert!(!dir.path().join(EXTRACTED_DIR).exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .collect();
        assert!(leftovers.is_empty(), "scratch directory should be removed");
    }
}
