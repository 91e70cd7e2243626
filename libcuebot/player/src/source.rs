use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::dto::track::Track;

/// Opaque reference to a remote folder of playable files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderRef(pub String);

impl From<String> for FolderRef {
    fn from(folder_id: String) -> Self {
        Self(folder_id)
    }
}

impl From<&str> for FolderRef {
    fn from(folder_id: &str) -> Self {
        Self(folder_id.to_owned())
    }
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An opaque byte stream handed as-is to the audio output. The player
/// performs no decoding or transcoding.
pub struct AudioStream(Box<dyn AsyncRead + Send + Unpin + 'static>);

impl AudioStream {
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self(Box::new(reader))
    }

    pub fn into_inner(self) -> Box<dyn AsyncRead + Send + Unpin + 'static> {
        self.0
    }
}

impl fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AudioStream")
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("folder not found: {0}")]
    FolderNotFound(String),
    #[error("timed out opening stream after {0:?}")]
    Timeout(Duration),
}

/// Adapter over the remote file store. Implementations resolve a folder to
/// its playable tracks and open a streaming byte source for one track.
#[async_trait]
pub trait TrackSource: Send + Sync + 'static {
    async fn list_tracks(&self, folder: &FolderRef) -> Result<Vec<Track>, SourceError>;

    async fn open_stream(&self, track_id: &str) -> Result<AudioStream, SourceError>;
}
