use super::audio_status::AudioStatus;
use super::track::Track;

/// Read-only snapshot of the session, broadcast to presenters after every
/// transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub current: Option<Track>,
    pub queue: Vec<Track>,
    pub status: AudioStatus,
    pub loop_enabled: bool,
    pub history_len: usize,
}
