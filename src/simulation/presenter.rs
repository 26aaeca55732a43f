//! Read-only per-tick view for rendering and input collaborators

use crate::entity::AgentBody;
use crate::world::{Obstacle, ScrollTrack};

use super::report::AgentId;

/// Everything a frame needs, borrowed from the running generation
#[derive(Debug, Clone)]
pub struct Snapshot<'s> {
    pub generation: u64,
    pub tick: u64,
    pub score: u32,
    pub agents: Vec<(AgentId, &'s AgentBody)>,
    pub obstacles: Vec<&'s Obstacle>,
    pub track: &'s ScrollTrack,
}

/// Consumes snapshots and may ask the loop to stop
///
/// The stop request is polled before every tick, so stopping never splits a tick.
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot<'_>);

    fn stop_requested(&self) -> bool {
        false
    }

    /// Whether snapshots should be built at all
    fn wants_frames(&self) -> bool {
        true
    }
}

/// No-op presenter for training runs
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Presenter for Headless {
    fn present(&mut self, _snapshot: &Snapshot<'_>) {}

    fn wants_frames(&self) -> bool {
        false
    }
}

/// Requests a stop once `limit` frames have been presented
#[derive(Debug, Clone, Copy)]
pub struct StopAfter {
    pub limit: u64,
    presented: u64,
}

impl StopAfter {
    pub fn new(limit: u64) -> Self {
        Self { limit, presented: 0 }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Presenter for StopAfter {
    fn present(&mut self, _snapshot: &Snapshot<'_>) {
        self.presented += 1;
    }

    fn stop_requested(&self) -> bool {
        self.presented >= self.limit
    }
}
