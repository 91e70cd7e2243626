use tracing::info;

use crate::dto::audio_status::AudioStatus;
use crate::output::{AudioBackend, AudioOutput, OutputError, OutputEvent};
use crate::source::AudioStream;

/// State machine around the single audio output resource. Owned exclusively
/// by the transition controller; nothing else touches the output.
pub(crate) struct Playback<B: AudioBackend> {
    output: B::Output,
    status: AudioStatus,
}

impl<B: AudioBackend> Playback<B> {
    pub(crate) fn new(
        backend: &B,
        events: flume::Sender<OutputEvent>,
    ) -> Result<Self, OutputError> {
        Ok(Self {
            output: backend.new_output(events)?,
            status: AudioStatus::Idle,
        })
    }

    pub(crate) fn status(&self) -> AudioStatus {
        self.status
    }

    /// Begins playing a stream. An active stream is stopped first so two
    /// streams never overlap on the same output.
    pub(crate) fn start(
        &mut self,
        stream: AudioStream,
        generation: u64,
    ) -> Result<(), OutputError> {
        if self.status != AudioStatus::Idle {
            self.output.stop();
            self.status = AudioStatus::Idle;
        }
        self.output.start(stream, generation)?;
        self.status = AudioStatus::Playing;
        Ok(())
    }

    pub(crate) fn pause(&mut self) -> bool {
        if self.status != AudioStatus::Playing {
            info!("Ignoring pause, player is {:?}", self.status);
            return false;
        }
        self.output.pause();
        self.status = AudioStatus::Paused;
        true
    }

    pub(crate) fn resume(&mut self) -> bool {
        if self.status != AudioStatus::Paused {
            info!("Ignoring resume, player is {:?}", self.status);
            return false;
        }
        self.output.resume();
        self.status = AudioStatus::Playing;
        true
    }

    pub(crate) fn stop(&mut self) {
        if self.status == AudioStatus::Idle {
            return;
        }
        self.output.stop();
        self.status = AudioStatus::Idle;
    }

    /// Records that the output went idle on its own after a natural end.
    pub(crate) fn mark_idle(&mut self) {
        self.status = AudioStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_output::{MockAction, MockBackend};
    use crate::source::AudioStream;

    fn stream() -> AudioStream {
        AudioStream::new(tokio::io::empty())
    }

    fn new_playback(backend: &MockBackend) -> Playback<MockBackend> {
        let (events, _events_rx) = flume::unbounded();
        Playback::new(backend, events).unwrap()
    }

    #[test]
    fn start_while_playing_stops_first() {
        let backend = MockBackend::default();
        let mut playback = new_playback(&backend);
        playback.start(stream(), 1).unwrap();
        playback.start(stream(), 2).unwrap();
        assert_eq!(
            backend.actions(),
            vec![
                MockAction::Start { generation: 1 },
                MockAction::Stop,
                MockAction::Start { generation: 2 },
            ]
        );
        assert_eq!(playback.status(), AudioStatus::Playing);
    }

    #[test]
    fn pause_and_resume_reject_wrong_states() {
        let backend = MockBackend::default();
        let mut playback = new_playback(&backend);
        assert!(!playback.pause());
        assert!(!playback.resume());

        playback.start(stream(), 1).unwrap();
        assert!(!playback.resume());
        assert!(playback.pause());
        assert_eq!(playback.status(), AudioStatus::Paused);
        assert!(!playback.pause());
        assert!(playback.resume());
        assert_eq!(playback.status(), AudioStatus::Playing);
    }

    #[test]
    fn stop_from_idle_does_not_touch_output() {
        let backend = MockBackend::default();
        let mut playback = new_playback(&backend);
        playback.stop();
        assert!(backend.actions().is_empty());
    }
}
