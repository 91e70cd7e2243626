use thiserror::Error;

/// Result of a user-facing action. `Accepted` means the transition was
/// applied or handed off to the event loop; `NoOp` means the action was
/// valid but had nothing to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Accepted,
    NoOp,
    Rejected(Rejection),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("please wait a few seconds between skips")]
    CooldownActive,
    #[error("no track at queue position {index} (queue length {len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("no previously played tracks")]
    EmptyHistory,
    #[error("nothing to play")]
    EmptyQueue,
    #[error("another transition is in progress, try again shortly")]
    TransitionInFlight,
}
