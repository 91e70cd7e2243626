mod dto;
mod event_loop;
mod history;
mod mock_output;
mod output;
mod playback;
mod player;
mod presenter;
mod queue;
mod settings;
mod source;
mod two_way_channel;

pub use crate::mock_output::{MockAction, MockBackend, MockOutput};

pub mod cuebot_player {
    use std::sync::Arc;

    use derivative::Derivative;
    use thiserror::Error;
    use tokio::sync::broadcast;
    use tracing::{info, warn};

    pub use crate::dto::action_outcome::{ActionOutcome, Rejection};
    pub use crate::dto::audio_status::AudioStatus;
    use crate::dto::command::Command;
    pub use crate::dto::player_event::PlayerEvent;
    use crate::dto::player_response::PlayerResponse;
    pub use crate::dto::player_state::PlayerState;
    pub use crate::dto::track::Track;
    use crate::event_loop::main_loop;
    pub use crate::output::{AudioBackend, AudioOutput, OutputError, OutputEvent};
    use crate::playback::Playback;
    use crate::player::Player;
    use crate::presenter::drive_presenter;
    pub use crate::presenter::{NowPlayingPresenter, PresenterError};
    pub use crate::settings::Settings;
    pub use crate::source::{AudioStream, FolderRef, SourceError, TrackSource};
    use crate::two_way_channel::{TwoWaySender, two_way_channel};

    #[derive(Clone, Debug, Error)]
    #[error("{0}")]
    pub struct PlayerError(String);

    /// Facade over the playback core. Commands are sent into a single
    /// event loop that owns all queue, history and player state; state
    /// snapshots come back as broadcast [`PlayerEvent`]s.
    #[derive(Derivative)]
    #[derivative(Debug)]
    pub struct CuebotPlayer<B: AudioBackend> {
        cmd_sender: TwoWaySender<Command, PlayerResponse>,
        event_tx: broadcast::Sender<PlayerEvent>,
        #[derivative(Debug = "ignore")]
        backend: B,
    }

    impl<B: AudioBackend> CuebotPlayer<B> {
        pub fn new(
            source: Arc<dyn TrackSource>,
            backend: B,
            settings: Settings,
        ) -> Result<Self, PlayerError> {
            let (event_tx, _) = broadcast::channel(settings.event_channel_size);
            let (cmd_tx, cmd_rx) = two_way_channel();
            let (output_tx, output_rx) = flume::unbounded();

            let playback =
                Playback::new(&backend, output_tx).map_err(|e| PlayerError(e.to_string()))?;
            let player = Player::new(source, playback, settings, cmd_tx.clone(), event_tx.clone());
            tokio::spawn(main_loop(cmd_rx, player));

            // Natural-end notifications from the output feed back into the
            // same loop as every other trigger.
            let ended_tx = cmd_tx.clone();
            tokio::spawn(async move {
                while let Ok(OutputEvent::Finished { generation }) = output_rx.recv_async().await {
                    if ended_tx.send(Command::Ended { generation }).is_err() {
                        info!("Player loop gone, output event forwarder completed");
                        return;
                    }
                }
                info!("Audio output dropped, output event forwarder completed");
            });

            Ok(CuebotPlayer {
                cmd_sender: cmd_tx,
                event_tx,
                backend,
            })
        }

        pub fn backend(&self) -> &B {
            &self.backend
        }

        pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
            self.event_tx.subscribe()
        }

        /// Spawns a forwarder that notifies `presenter` after every
        /// transition. Presenter failures are logged and swallowed.
        pub fn attach_presenter(&self, presenter: Arc<dyn NowPlayingPresenter>) {
            tokio::spawn(drive_presenter(presenter, self.event_tx.subscribe()));
        }

        /// Replaces the queue with the folder's tracks (sorted by name)
        /// and starts playback of the first one.
        pub async fn select_folder(&self, folder: FolderRef) -> Result<ActionOutcome, PlayerError> {
            self.run(Command::SelectFolder(folder)).await
        }

        pub async fn skip(&self) -> Result<ActionOutcome, PlayerError> {
            self.run(Command::Skip).await
        }

        pub async fn previous(&self) -> Result<ActionOutcome, PlayerError> {
            self.run(Command::Previous).await
        }

        pub async fn jump_to(&self, index: usize) -> Result<ActionOutcome, PlayerError> {
            self.run(Command::JumpTo(index)).await
        }

        pub async fn stop(&self) -> Result<ActionOutcome, PlayerError> {
            self.run(Command::Stop).await
        }

        pub async fn pause(&self) -> Result<ActionOutcome, PlayerError> {
            self.run(Command::Pause).await
        }

        pub async fn resume(&self) -> Result<ActionOutcome, PlayerError> {
            self.run(Command::Resume).await
        }

        pub async fn toggle_loop(&self) -> Result<ActionOutcome, PlayerError> {
            self.run(Command::ToggleLoop).await
        }

        pub async fn get_current_state(&self) -> Result<PlayerState, PlayerError> {
            match self.cmd_sender.request(Command::GetCurrentState).await {
                Ok(PlayerResponse::State(state)) => Ok(state),
                Ok(other) => Err(PlayerError(format!("unexpected response {other:?}"))),
                Err(e) => Err(PlayerError(e.to_string())),
            }
        }

        /// Stops playback and shuts the event loop down.
        pub async fn join(self) -> Result<(), PlayerError> {
            info!("Joining player instance");
            if let Err(e) = self.run(Command::Stop).await {
                warn!("Error stopping player during join: {e}");
            }
            self.cmd_sender
                .send_async(Command::Shutdown)
                .await
                .map_err(|e| PlayerError(e.to_string()))
        }

        async fn run(&self, command: Command) -> Result<ActionOutcome, PlayerError> {
            match self.cmd_sender.request(command).await {
                Ok(PlayerResponse::Outcome(outcome)) => Ok(outcome),
                Ok(other) => Err(PlayerError(format!("unexpected response {other:?}"))),
                Err(e) => Err(PlayerError(e.to_string())),
            }
        }
    }
}
