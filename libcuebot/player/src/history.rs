use std::collections::VecDeque;

use crate::dto::track::Track;

pub(crate) const HISTORY_CAPACITY: usize = 50;

/// Bounded log of previously played tracks. Pushing past capacity evicts
/// the oldest entry; `pop` removes and returns the most recent.
#[derive(Debug)]
pub(crate) struct History {
    tracks: VecDeque<Track>,
    capacity: usize,
}

impl History {
    pub(crate) fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, track: Track) {
        self.tracks.push_back(track);
        if self.tracks.len() > self.capacity {
            self.tracks.pop_front();
        }
    }

    pub(crate) fn pop(&mut self) -> Option<Track> {
        self.tracks.pop_back()
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }
}
