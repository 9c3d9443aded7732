#![forbid(unsafe_code)]

//! Invalidation coalescing and the update cycle.
//!
//! # Invariants
//!
//! 1. At most one [`Task::RunCycle`] is outstanding for a scheduling: the
//!    `scheduled` flag is set when it is queued and cleared when a cycle
//!    starts.
//! 2. A cycle clears the flag *before* draining, so anything invalidated
//!    while it runs lands in the next cycle and is never folded into the
//!    current one.
//! 3. The pending set is empty once a cycle has drained it.
//! 4. Every cycle ends with a layout and a render pass, even if nothing was
//!    pending.
//!
//! A forced cycle (after a resize) services any pending scheduling too; the
//! queued `RunCycle` then finds the flag clear and is skipped.

use tuiloop_backend::{Deferrer, Task};
use tuiloop_core::view::{Invalidate, InvalidationSet, NodeRef};

use crate::window::Window;

pub struct UpdateScheduler {
    pending: InvalidationSet,
    scheduled: bool,
    deferrer: Deferrer,
    cycles: u64,
}

impl UpdateScheduler {
    #[must_use]
    pub fn new(deferrer: Deferrer) -> Self {
        Self {
            pending: InvalidationSet::new(),
            scheduled: false,
            deferrer,
            cycles: 0,
        }
    }

    /// Whether a cycle is queued and has not started.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Nodes waiting for the next cycle.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of cycles run so far.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Handle a queued [`Task::RunCycle`]. Returns `false` for a stale task.
    pub fn run_scheduled(&mut self, window: &mut Window) -> bool {
        if !self.scheduled {
            tracing::trace!("skipping serviced update cycle");
            return false;
        }
        self.run_cycle(window);
        true
    }

    /// Run a cycle now, regardless of scheduling.
    pub fn force_cycle(&mut self, window: &mut Window) {
        self.run_cycle(window);
    }

    fn run_cycle(&mut self, window: &mut Window) {
        self.scheduled = false;
        let nodes = self.pending.drain();
        tracing::trace!(pending = nodes.len(), cycle = self.cycles, "update cycle");
        for node in &nodes {
            if let Err(err) = node.borrow_mut().update(self) {
                tracing::warn!(error = %err, "node update failed");
            }
        }
        window.render();
        self.cycles += 1;
    }
}

impl Invalidate for UpdateScheduler {
    fn invalidate(&mut self, node: &NodeRef) {
        self.pending.insert(node);
        if !self.scheduled {
            self.scheduled = true;
            self.deferrer.defer(Task::RunCycle);
        }
    }
}

impl std::fmt::Debug for UpdateScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateScheduler")
            .field("pending", &self.pending.len())
            .field("scheduled", &self.scheduled)
            .field("cycles", &self.cycles)
            .finish()
    }
}
