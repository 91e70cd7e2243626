use tracing::{error, info};

use crate::dto::action_outcome::ActionOutcome;
use crate::dto::command::Command;
use crate::dto::player_response::PlayerResponse;
use crate::output::AudioBackend;
use crate::player::Player;
use crate::two_way_channel::TwoWayReceiver;

/// Serializes every transition-causing event: commands are handled one at
/// a time, and all controller I/O is spawned, so the loop itself never
/// blocks and overlapping triggers get an immediate rejection.
pub(crate) async fn main_loop<B: AudioBackend>(
    mut receiver: TwoWayReceiver<Command, PlayerResponse>,
    mut player: Player<B>,
) {
    while let Ok(next_command) = receiver.recv_async().await {
        info!("Got command {:?}", next_command);
        match next_command {
            Command::SelectFolder(folder) => {
                let outcome = player.select_folder(folder);
                respond_outcome(&mut receiver, outcome);
            }
            Command::Skip => {
                let outcome = player.skip();
                respond_outcome(&mut receiver, outcome);
            }
            Command::Previous => {
                let outcome = player.previous();
                respond_outcome(&mut receiver, outcome);
            }
            Command::JumpTo(index) => {
                let outcome = player.jump_to(index);
                respond_outcome(&mut receiver, outcome);
            }
            Command::Stop => {
                let outcome = player.stop();
                respond_outcome(&mut receiver, outcome);
            }
            Command::Pause => {
                let outcome = player.pause();
                respond_outcome(&mut receiver, outcome);
            }
            Command::Resume => {
                let outcome = player.resume();
                respond_outcome(&mut receiver, outcome);
            }
            Command::ToggleLoop => {
                let outcome = player.toggle_loop();
                respond_outcome(&mut receiver, outcome);
            }
            Command::GetCurrentState => {
                if let Err(e) = receiver.respond(PlayerResponse::State(player.state())) {
                    error!("Error sending player state: {e:?}");
                }
            }
            Command::FolderLoaded { generation, result } => {
                player.on_folder_loaded(generation, result);
            }
            Command::StreamReady { generation, result } => {
                player.on_stream_ready(generation, result);
            }
            Command::Ended { generation } => {
                player.on_ended(generation);
            }
            Command::Shutdown => {
                info!("Shutting down player loop");
                return;
            }
        }
        info!("Completed command");
    }
    info!("Command senders dropped, player loop completed");
}

fn respond_outcome(
    receiver: &mut TwoWayReceiver<Command, PlayerResponse>,
    outcome: ActionOutcome,
) {
    if let Err(e) = receiver.respond(PlayerResponse::Outcome(outcome)) {
        error!("Error sending action outcome: {e:?}");
    }
}
