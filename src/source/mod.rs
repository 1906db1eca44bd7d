//! Script acquisition: object store locations, local files and stdin.

use std::{
    fmt,
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

pub mod object_store;

pub use object_store::ObjectStoreClient;

/// Bucket and key of a script in the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLocation {
    pub bucket: String,
    pub key: String,
}

impl ScriptLocation {
    /// Compose the key as `{key_prefix}/{file_name}`. Surrounding slashes on
    /// the prefix are ignored and an empty prefix yields just the file name.
    pub fn new(bucket: impl Into<String>, key_prefix: &str, file_name: &str) -> Self {
        let prefix = key_prefix.trim_matches('/');
        let key = if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", prefix, file_name)
        };
        Self { bucket: bucket.into(), key }
    }
}

impl fmt::Display for ScriptLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("object store error ({status}) for {location}: {body}")]
    Api {
        status: u16,
        location: String,
        body: String,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("script is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Remote collaborator that returns the raw bytes stored at a location.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    async fn fetch(&self, location: &ScriptLocation) -> Result<Vec<u8>, SourceError>;
}

/// Where the script text comes from for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptInput {
    File(PathBuf),
    Stdin,
    ObjectStore,
}

pub async fn read_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn read_stdin() -> Result<Vec<u8>, SourceError> {
    read_all(tokio::io::stdin(), Path::new("<stdin>")).await
}

/// Drain `reader`, naming `path` in any error.
pub async fn read_all<R>(mut reader: R, path: &Path) -> Result<Vec<u8>, SourceError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(buf)
}

/// Decode fetched bytes as UTF-8 text.
pub fn decode_script(bytes: Vec<u8>) -> Result<String, SourceError> {
    Ok(String::from_utf8(bytes)?)
}
