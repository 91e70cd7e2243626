#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioStatus {
    Idle,
    Playing,
    Paused,
}
