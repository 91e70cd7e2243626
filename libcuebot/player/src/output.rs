use thiserror::Error;

use crate::source::AudioStream;

/// Notification from the audio output. `Finished` is emitted only when a
/// stream exhausts naturally; an explicit `stop` produces no event, which
/// is what lets the controller tell the two idle causes apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputEvent {
    Finished { generation: u64 },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to initialize audio output: {0}")]
    InitFailed(String),
    #[error("failed to start playback: {0}")]
    StartFailed(String),
}

/// A single audio output resource. At most one stream plays at a time;
/// `start` on an output that is already playing must replace the stream.
pub trait AudioOutput: Send + 'static {
    /// Begins playing `stream`. Emitted `Finished` events must carry
    /// `generation` so late notifications can be discarded.
    fn start(&mut self, stream: AudioStream, generation: u64) -> Result<(), OutputError>;

    fn pause(&mut self);

    fn resume(&mut self);

    /// Stops playback without emitting `Finished`.
    fn stop(&mut self);
}

pub trait AudioBackend: Clone + Send + Sync + 'static {
    type Output: AudioOutput;

    fn new_output(&self, events: flume::Sender<OutputEvent>) -> Result<Self::Output, OutputError>;
}
