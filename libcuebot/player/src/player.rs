use std::sync::Arc;

use tap::TapFallible;
use tokio::sync::broadcast;
use tokio::time::{Instant, timeout};
use tracing::{error, info, warn};

use crate::dto::action_outcome::{ActionOutcome, Rejection};
use crate::dto::audio_status::AudioStatus;
use crate::dto::command::Command;
use crate::dto::player_event::PlayerEvent;
use crate::dto::player_response::PlayerResponse;
use crate::dto::player_state::PlayerState;
use crate::dto::track::Track;
use crate::history::History;
use crate::output::AudioBackend;
use crate::playback::Playback;
use crate::queue::PlaybackQueue;
use crate::settings::Settings;
use crate::source::{AudioStream, FolderRef, SourceError, TrackSource};
use crate::two_way_channel::TwoWaySender;

/// An I/O step that was handed off to the runtime. While one is pending,
/// user triggers other than `stop` are rejected rather than queued.
#[derive(Debug)]
enum Pending {
    FolderList { generation: u64 },
    TrackStart { generation: u64, track: Track },
}

/// The transition controller. Single writer of queue, history and the
/// current track; every state change funnels through its methods, one
/// command at a time.
pub(crate) struct Player<B: AudioBackend> {
    source: Arc<dyn TrackSource>,
    playback: Playback<B>,
    queue: PlaybackQueue,
    history: History,
    current: Option<Track>,
    loop_enabled: bool,
    /// Bumped on every accepted stop or start handoff. Spawned I/O results
    /// and natural-end notifications carry the generation they belong to;
    /// anything stale is discarded.
    generation: u64,
    pending: Option<Pending>,
    last_skip: Option<Instant>,
    settings: Settings,
    cmd_tx: TwoWaySender<Command, PlayerResponse>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl<B: AudioBackend> Player<B> {
    pub(crate) fn new(
        source: Arc<dyn TrackSource>,
        playback: Playback<B>,
        settings: Settings,
        cmd_tx: TwoWaySender<Command, PlayerResponse>,
        event_tx: broadcast::Sender<PlayerEvent>,
    ) -> Self {
        Self {
            source,
            playback,
            queue: PlaybackQueue::new(),
            history: History::new(),
            current: None,
            loop_enabled: false,
            generation: 0,
            pending: None,
            last_skip: None,
            settings,
            cmd_tx,
            event_tx,
        }
    }

    pub(crate) fn state(&self) -> PlayerState {
        PlayerState {
            current: self.current.clone(),
            queue: self.queue.snapshot(usize::MAX),
            status: self.playback.status(),
            loop_enabled: self.loop_enabled,
            history_len: self.history.len(),
        }
    }

    fn emit(&self, event: PlayerEvent) {
        // Best-effort: presenters that lag or disconnect never affect
        // playback.
        self.event_tx.send(event).unwrap_or_default();
    }

    fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn select_folder(&mut self, folder: FolderRef) -> ActionOutcome {
        if self.in_flight() {
            return ActionOutcome::Rejected(Rejection::TransitionInFlight);
        }
        // The new folder replaces whatever is playing, so the current track
        // is displaced to history up front. The generation bump makes any
        // late event from its stream stale.
        self.generation += 1;
        self.playback.stop();
        if let Some(displaced) = self.current.take() {
            self.history.push(displaced);
        }
        let generation = self.generation;
        self.pending = Some(Pending::FolderList { generation });
        info!("Listing folder {folder} (generation {generation})");

        let source = Arc::clone(&self.source);
        let cmd_tx = self.cmd_tx.clone();
        tokio::spawn(async move {
            let result = source.list_tracks(&folder).await;
            cmd_tx
                .send(Command::FolderLoaded { generation, result })
                .tap_err(|e| warn!("Player loop gone, dropping folder listing: {e:?}"))
                .ok();
        });
        ActionOutcome::Accepted
    }

    pub(crate) fn on_folder_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<Track>, SourceError>,
    ) {
        match self.pending {
            Some(Pending::FolderList { generation: g }) if g == generation => {}
            _ => {
                info!("Discarding stale folder listing for generation {generation}");
                return;
            }
        }
        self.pending = None;

        let mut tracks = match result {
            Ok(tracks) => tracks,
            Err(e) => {
                error!("Error listing folder: {e}");
                self.emit(PlayerEvent::PlaybackError {
                    state: self.state(),
                    message: format!("could not list folder: {e}"),
                });
                return;
            }
        };
        if tracks.is_empty() {
            info!("Folder contained no playable tracks");
            self.emit(PlayerEvent::PlaybackError {
                state: self.state(),
                message: "folder contains no playable tracks".to_owned(),
            });
            return;
        }
        tracks.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        self.queue.replace_all(tracks);
        self.emit(PlayerEvent::StartQueue(self.state()));

        if let Some(first) = self.queue.dequeue_front() {
            self.begin_start(first);
        }
    }

    /// Hands the track's stream-open off to the runtime and records it as
    /// the pending transition.
    fn begin_start(&mut self, track: Track) {
        self.generation += 1;
        let generation = self.generation;
        info!(
            "Opening stream for \"{}\" (generation {generation})",
            track.name
        );
        self.pending = Some(Pending::TrackStart {
            generation,
            track: track.clone(),
        });

        let source = Arc::clone(&self.source);
        let cmd_tx = self.cmd_tx.clone();
        let open_timeout = self.settings.stream_open_timeout;
        tokio::spawn(async move {
            let result = match timeout(open_timeout, source.open_stream(&track.id)).await {
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout(open_timeout)),
            };
            cmd_tx
                .send(Command::StreamReady { generation, result })
                .tap_err(|e| warn!("Player loop gone, dropping opened stream: {e:?}"))
                .ok();
        });
    }

    pub(crate) fn on_stream_ready(
        &mut self,
        generation: u64,
        result: Result<AudioStream, SourceError>,
    ) {
        let track = match self.pending.take() {
            Some(Pending::TrackStart {
                generation: g,
                track,
            }) if g == generation => track,
            other => {
                // A stop or newer start superseded this open; the stream,
                // if any, is dropped unused.
                self.pending = other;
                info!("Discarding stale stream result for generation {generation}");
                return;
            }
        };

        let stream = match result {
            Ok(stream) => stream,
            Err(e) => {
                error!("Error opening stream for \"{}\": {e}", track.name);
                self.emit(PlayerEvent::PlaybackError {
                    state: self.state(),
                    message: format!("could not play \"{}\": {e}", track.name),
                });
                return;
            }
        };

        match self.playback.start(stream, generation) {
            Ok(()) => {
                self.current = Some(track);
                self.emit(PlayerEvent::TrackChanged(self.state()));
            }
            Err(e) => {
                error!("Error starting playback of \"{}\": {e}", track.name);
                self.emit(PlayerEvent::PlaybackError {
                    state: self.state(),
                    message: format!("could not play \"{}\": {e}", track.name),
                });
            }
        }
    }

    /// Natural end of the current stream. Notifications from superseded
    /// streams carry an old generation and are ignored.
    pub(crate) fn on_ended(&mut self, generation: u64) {
        if generation != self.generation {
            info!("Ignoring ended event for stale generation {generation}");
            return;
        }
        self.playback.mark_idle();

        if let Some(finished) = self.current.take() {
            if self.loop_enabled {
                self.queue.push_tail(finished);
            } else {
                self.history.push(finished);
            }
        }
        self.advance();
    }

    /// Dequeue-or-idle: only ever entered with no current track.
    fn advance(&mut self) {
        match self.queue.dequeue_front() {
            Some(next) => self.begin_start(next),
            None => {
                info!("Queue exhausted, staying idle");
                self.emit(PlayerEvent::QueueEnded(self.state()));
            }
        }
    }

    pub(crate) fn skip(&mut self) -> ActionOutcome {
        // Cooldown outranks the in-flight guard so rapid double-skips are
        // reported as such even while the first one is still settling.
        if let Some(last) = self.last_skip {
            if last.elapsed() < self.settings.skip_cooldown {
                info!("Rejecting skip inside cooldown window");
                return ActionOutcome::Rejected(Rejection::CooldownActive);
            }
        }
        if self.in_flight() {
            return ActionOutcome::Rejected(Rejection::TransitionInFlight);
        }
        if self.current.is_none() && self.queue.peek_front().is_none() {
            return ActionOutcome::Rejected(Rejection::EmptyQueue);
        }
        self.last_skip = Some(Instant::now());

        self.generation += 1;
        self.playback.stop();
        if let Some(skipped) = self.current.take() {
            self.history.push(skipped);
        }
        self.advance();
        ActionOutcome::Accepted
    }

    pub(crate) fn previous(&mut self) -> ActionOutcome {
        if self.in_flight() {
            return ActionOutcome::Rejected(Rejection::TransitionInFlight);
        }
        let Some(restored) = self.history.pop() else {
            return ActionOutcome::Rejected(Rejection::EmptyHistory);
        };

        self.generation += 1;
        self.playback.stop();
        if let Some(displaced) = self.current.take() {
            self.queue.prepend(displaced);
        }
        self.begin_start(restored);
        ActionOutcome::Accepted
    }

    pub(crate) fn jump_to(&mut self, index: usize) -> ActionOutcome {
        if self.in_flight() {
            return ActionOutcome::Rejected(Rejection::TransitionInFlight);
        }
        let Some(chosen) = self.queue.remove_at(index) else {
            return ActionOutcome::Rejected(Rejection::InvalidIndex {
                index,
                len: self.queue.len(),
            });
        };

        self.generation += 1;
        self.playback.stop();
        if let Some(displaced) = self.current.take() {
            self.history.push(displaced);
        }
        self.begin_start(chosen);
        ActionOutcome::Accepted
    }

    /// Explicit stop. Supersedes a pending transition: the generation bump
    /// invalidates any stream still being opened. History is untouched.
    pub(crate) fn stop(&mut self) -> ActionOutcome {
        if !self.in_flight()
            && self.current.is_none()
            && self.queue.is_empty()
            && self.playback.status() == AudioStatus::Idle
        {
            return ActionOutcome::NoOp;
        }
        self.generation += 1;
        self.pending = None;
        self.queue.clear();
        self.current = None;
        self.playback.stop();
        self.emit(PlayerEvent::Stop(self.state()));
        ActionOutcome::Accepted
    }

    pub(crate) fn pause(&mut self) -> ActionOutcome {
        if self.in_flight() {
            return ActionOutcome::Rejected(Rejection::TransitionInFlight);
        }
        if self.playback.pause() {
            self.emit(PlayerEvent::Pause(self.state()));
            ActionOutcome::Accepted
        } else {
            ActionOutcome::NoOp
        }
    }

    pub(crate) fn resume(&mut self) -> ActionOutcome {
        if self.in_flight() {
            return ActionOutcome::Rejected(Rejection::TransitionInFlight);
        }
        if self.playback.resume() {
            self.emit(PlayerEvent::Resume(self.state()));
            ActionOutcome::Accepted
        } else {
            ActionOutcome::NoOp
        }
    }

    /// Takes effect on the next natural end only; never touches playback.
    pub(crate) fn toggle_loop(&mut self) -> ActionOutcome {
        if self.in_flight() {
            return ActionOutcome::Rejected(Rejection::TransitionInFlight);
        }
        self.loop_enabled = !self.loop_enabled;
        info!("Loop {}", if self.loop_enabled { "on" } else { "off" });
        self.emit(PlayerEvent::LoopChanged(self.state()));
        ActionOutcome::Accepted
    }
}
