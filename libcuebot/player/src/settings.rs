use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Settings {
    /// Minimum time between accepted skips. Repeated skips inside this
    /// window are rejected, not delayed. Zero disables the cooldown.
    pub skip_cooldown: Duration,
    /// Bound on opening a track's byte stream; expiry is treated the same
    /// as a stream-open failure.
    pub stream_open_timeout: Duration,
    /// Capacity of the player event broadcast channel.
    pub event_channel_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            skip_cooldown: Duration::from_secs(5),
            stream_open_timeout: Duration::from_secs(30),
            event_channel_size: 32,
        }
    }
}
