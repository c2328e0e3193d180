//! Tick-stamped deferred actions
//!
//! Staggered party jumps are queued here with the tick they fall due, and the
//! orchestrator drains them at the start of that tick. Actions due on the
//! same tick run in the order they were queued.

use serde::{Deserialize, Serialize};

use super::state::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Make one player jump, if it's still alive and the run is in control
    Jump {
        player: EntityId,
        speed: f32,
        push: f32,
        force: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled {
    due: u64,
    seq: u64,
    action: DeferredAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeferredQueue {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due: u64, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due, seq, action });
    }

    /// Remove and return every action due at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Vec<DeferredAction> {
        let (mut due, later): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = later;
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.action).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
