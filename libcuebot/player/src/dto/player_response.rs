use super::action_outcome::ActionOutcome;
use super::player_state::PlayerState;

#[derive(Clone, Debug)]
pub(crate) enum PlayerResponse {
    Outcome(ActionOutcome),
    State(PlayerState),
}
