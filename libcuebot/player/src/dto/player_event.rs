use strum::Display;

use super::player_state::PlayerState;

#[derive(Clone, Debug, Display)]
pub enum PlayerEvent {
    /// The queue was replaced wholesale from a folder selection.
    StartQueue(PlayerState),
    /// A new track became the current track.
    TrackChanged(PlayerState),
    Pause(PlayerState),
    Resume(PlayerState),
    Stop(PlayerState),
    LoopChanged(PlayerState),
    /// The queue ran out with nothing left to play.
    QueueEnded(PlayerState),
    /// A track could not be started; playback fell back to idle.
    PlaybackError { state: PlayerState, message: String },
}
