use std::collections::VecDeque;

use crate::dto::track::Track;

/// Ordered pending tracks. FIFO for normal advancement, with removal at an
/// arbitrary position for queue jumps and prepend for "previous".
#[derive(Debug, Default)]
pub(crate) struct PlaybackQueue {
    tracks: VecDeque<Track>,
}

impl PlaybackQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Discards any pending tracks and replaces them wholesale.
    pub(crate) fn replace_all(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks.into();
    }

    pub(crate) fn dequeue_front(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<Track> {
        self.tracks.remove(index)
    }

    pub(crate) fn prepend(&mut self, track: Track) {
        self.tracks.push_front(track);
    }

    pub(crate) fn push_tail(&mut self, track: Track) {
        self.tracks.push_back(track);
    }

    pub(crate) fn peek_front(&self) -> Option<&Track> {
        self.tracks.front()
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Returns up to `limit` pending tracks without mutating the queue.
    pub(crate) fn snapshot(&self, limit: usize) -> Vec<Track> {
        self.tracks.iter().take(limit).cloned().collect()
    }
}
