//! Streaming content fingerprint for local files.

use std::io::Read;
use std::path::{Path, PathBuf};

use reelpush_core::{Digest, Error, Result};
use tokio::sync::OnceCell;

const CHUNK_SIZE: usize = 256 * 1024;

/// Compute the MD5 digest of a file without holding more than one chunk in memory.
pub async fn digest(path: &Path) -> Result<Digest> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || digest_sync(&path))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

fn digest_sync(path: &Path) -> Result<Digest> {
    let mut file = std::fs::File::open(path)?;
    let mut context = md5::Context::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        context.consume(&buffer[..n]);
    }
    Ok(Digest::from_hex(format!("{:x}", context.compute())))
}

/// A file on local disk that the pipeline reads but never modifies.
#[derive(Debug)]
pub struct LocalFile {
    path: PathBuf,
    len: u64,
    digest: OnceCell<Digest>,
}

impl LocalFile {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(Error::Validation(format!(
                "File '{}' not found.",
                path.display()
            )));
        }
        Ok(Self {
            path,
            len: metadata.len(),
            digest: OnceCell::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Digest of the file contents, computed on first use and reused afterwards.
    pub async fn digest(&self) -> Result<&Digest> {
        self.digest.get_or_try_init(|| digest(&self.path)).await
    }
}
