use super::track::Track;
use crate::source::{AudioStream, FolderRef, SourceError};

#[derive(Debug)]
pub(crate) enum Command {
    SelectFolder(FolderRef),
    Skip,
    Previous,
    JumpTo(usize),
    Stop,
    Pause,
    Resume,
    ToggleLoop,
    GetCurrentState,
    /// Spawned folder listing completed.
    FolderLoaded {
        generation: u64,
        result: Result<Vec<Track>, SourceError>,
    },
    /// Spawned stream open completed.
    StreamReady {
        generation: u64,
        result: Result<AudioStream, SourceError>,
    },
    /// The audio output exhausted its stream naturally.
    Ended {
        generation: u64,
    },
    Shutdown,
}
