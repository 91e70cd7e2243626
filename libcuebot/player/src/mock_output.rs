//! Scriptable audio backend for tests. Records every call made to the
//! output and lets tests trigger natural-end notifications by hand.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::output::{AudioBackend, AudioOutput, OutputError, OutputEvent};
use crate::source::AudioStream;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockAction {
    Start { generation: u64 },
    Pause,
    Resume,
    Stop,
}

#[derive(Default)]
struct MockInner {
    actions: Vec<MockAction>,
    events: Option<flume::Sender<OutputEvent>>,
    active_generation: Option<u64>,
    fail_next_start: bool,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<MockInner>>,
}

impl MockBackend {
    fn lock(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().expect("mock backend lock poisoned")
    }

    /// Simulates the active stream exhausting naturally.
    pub fn finish_current(&self) {
        let (generation, events) = {
            let mut inner = self.lock();
            let generation = inner
                .active_generation
                .take()
                .expect("no active stream to finish");
            (generation, inner.events.clone())
        };
        self.emit_finished_with(events, generation);
    }

    /// Emits a `Finished` event for an arbitrary generation, for exercising
    /// stale-notification handling.
    pub fn emit_finished(&self, generation: u64) {
        let events = self.lock().events.clone();
        self.emit_finished_with(events, generation);
    }

    fn emit_finished_with(&self, events: Option<flume::Sender<OutputEvent>>, generation: u64) {
        events
            .expect("backend has no output yet")
            .send(OutputEvent::Finished { generation })
            .expect("output event receiver dropped");
    }

    pub fn actions(&self) -> Vec<MockAction> {
        self.lock().actions.clone()
    }

    pub fn active_generation(&self) -> Option<u64> {
        self.lock().active_generation
    }

    pub fn fail_next_start(&self) {
        self.lock().fail_next_start = true;
    }
}

impl AudioBackend for MockBackend {
    type Output = MockOutput;

    fn new_output(&self, events: flume::Sender<OutputEvent>) -> Result<Self::Output, OutputError> {
        self.lock().events = Some(events);
        Ok(MockOutput {
            inner: Arc::clone(&self.inner),
        })
    }
}

pub struct MockOutput {
    inner: Arc<Mutex<MockInner>>,
}

impl AudioOutput for MockOutput {
    fn start(&mut self, _stream: AudioStream, generation: u64) -> Result<(), OutputError> {
        let mut inner = self.inner.lock().expect("mock backend lock poisoned");
        if inner.fail_next_start {
            inner.fail_next_start = false;
            return Err(OutputError::StartFailed("mock start failure".to_owned()));
        }
        inner.actions.push(MockAction::Start { generation });
        inner.active_generation = Some(generation);
        Ok(())
    }

    fn pause(&mut self) {
        let mut inner = self.inner.lock().expect("mock backend lock poisoned");
        inner.actions.push(MockAction::Pause);
    }

    fn resume(&mut self) {
        let mut inner = self.inner.lock().expect("mock backend lock poisoned");
        inner.actions.push(MockAction::Resume);
    }

    fn stop(&mut self) {
        let mut inner = self.inner.lock().expect("mock backend lock poisoned");
        inner.actions.push(MockAction::Stop);
        inner.active_generation = None;
    }
}
