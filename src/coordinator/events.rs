//! Platform events and their arrival-order queue

use crate::host::TabId;
use std::collections::VecDeque;

/// Events the coordinator reacts to: install/startup, storage change, and
/// the tab lifecycle callbacks the platform emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Extension installed, updated, or the browser started.
    Startup,
    /// The persisted script list changed, locally or from another device.
    ScriptsChanged,
    /// A tab started loading; any in-flight count for it is now stale.
    TabLoading { tab: TabId },
    /// A tab finished loading with a resolved URL.
    TabComplete { tab: TabId, url: String },
    TabActivated { tab: TabId },
    TabRemoved { tab: TabId },
}

/// FIFO queue with a dispatch guard: handlers run synchronously in arrival
/// order, and an event pushed while one is being handled waits its turn
/// instead of re-entering the handler.
pub struct EventQueue {
    pending: VecDeque<Event>,
    dispatching: bool,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            dispatching: false,
        }
    }

    pub fn push(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    /// Returns true if a dispatch loop is already draining the queue, in
    /// which case the caller must not start another.
    pub fn begin_dispatch(&mut self) -> bool {
        if self.dispatching {
            return true;
        }
        self.dispatching = true;
        false
    }

    pub fn end_dispatch(&mut self) {
        self.dispatching = false;
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    /// Drop queued `ScriptsChanged` events from the front of the queue; a
    /// run that is about to start covers them all.
    pub fn coalesce_scripts_changed(&mut self) {
        while self.pending.front() == Some(&Event::ScriptsChanged) {
            self.pending.pop_front();
        }
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
