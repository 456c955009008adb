//! Background coordination: registration sync, tab counts, status relay

pub mod events;
pub mod synchronizer;
pub mod tracker;
pub mod relay;

pub use events::Event;
pub use synchronizer::SyncError;
pub use tracker::TabMatchTracker;

use crate::host::{TabApi, UserScriptHost};
use crate::models::{ScriptEdit, StatusMessage, UserScript, WorldConfig};
use crate::repository::ScriptRepository;
use crate::storage::KeyValueStore;
use anyhow::Result;
use events::EventQueue;
use std::sync::Arc;

/// Cached result of the startup capability probe.
///
/// Queried once when the coordinator is constructed; the only invalidation
/// point is the next startup (a new coordinator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable(String),
}

/// Explicit holder for all coordinator state: the repository view, the
/// tab-count tracker, the event queue, and the cached capability probe.
/// Handlers receive it by reference; nothing lives in ambient globals.
pub struct Coordinator {
    repository: ScriptRepository,
    host: Arc<dyn UserScriptHost>,
    tabs: Arc<dyn TabApi>,
    tracker: TabMatchTracker,
    capability: Capability,
    queue: EventQueue,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        host: Arc<dyn UserScriptHost>,
        tabs: Arc<dyn TabApi>,
    ) -> Self {
        let capability = match host.capability() {
            Ok(()) => Capability::Available,
            Err(e) => Capability::Unavailable(e.to_string()),
        };
        Self {
            repository: ScriptRepository::new(store),
            host,
            tabs,
            tracker: TabMatchTracker::new(),
            capability,
            queue: EventQueue::new(),
        }
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn repository(&self) -> &ScriptRepository {
        &self.repository
    }

    pub fn tracker(&self) -> &TabMatchTracker {
        &self.tracker
    }

    /// Extension startup: configure the execution world, then load the
    /// persisted scripts and run the first full synchronization.
    pub fn startup(&mut self) -> Result<()> {
        if let Err(e) = self.host.configure_world(&WorldConfig::default()) {
            log::warn!("failed to configure user script world: {}", e);
        }
        self.dispatch(Event::Startup)
    }

    /// Queue an event without draining. Platform bridges use this when
    /// callbacks arrive faster than they are pumped; the next `dispatch`
    /// drains everything in arrival order.
    pub fn enqueue(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Queue an event and, unless a dispatch is already running, drain the
    /// queue in arrival order. Events pushed while draining run after the
    /// current one finishes; handlers for one event type never overlap.
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        self.queue.push(event);
        if self.queue.begin_dispatch() {
            return Ok(());
        }
        let result = self.drain();
        self.queue.end_dispatch();
        result
    }

    fn drain(&mut self) -> Result<()> {
        while let Some(event) = self.queue.pop() {
            self.on_event(event)?;
        }
        Ok(())
    }

    fn on_event(&mut self, event: Event) -> Result<()> {
        log::debug!("handling event: {:?}", event);
        match event {
            Event::Startup | Event::ScriptsChanged => {
                // Back-to-back script changes need only one synchronization.
                self.queue.coalesce_scripts_changed();
                // Re-read the persisted list; the change may have come from
                // another device through the sync-scoped store.
                self.repository.load()?;
                self.synchronize()
            }
            Event::TabLoading { tab } => {
                self.tracker.begin_navigation(tab);
                Ok(())
            }
            Event::TabComplete { tab, url } => {
                let registered = self.host.registered_scripts()?;
                self.tracker
                    .refresh_tab(tab, &url, &registered, self.tabs.as_ref())?;
                Ok(())
            }
            Event::TabActivated { tab } => {
                self.tracker.republish(tab, self.tabs.as_ref())?;
                Ok(())
            }
            Event::TabRemoved { tab } => {
                self.tracker.remove_tab(tab, self.tabs.as_ref())?;
                Ok(())
            }
        }
    }

    /// Full synchronization: replace the host registration set, then refresh
    /// every tab count. Failures are logged, relayed to the active tab, and
    /// propagated; the caller decides whether to retry.
    fn synchronize(&mut self) -> Result<()> {
        let outcome =
            synchronizer::synchronize(&self.capability, &self.repository, self.host.as_ref());
        match outcome {
            Ok(active) => {
                let registered = self.host.registered_scripts()?;
                let tabs = self.tabs.query_tabs()?;
                self.tracker
                    .refresh_all(&tabs, &registered, self.tabs.as_ref())?;
                relay::notify_active_tab(
                    self.tabs.as_ref(),
                    &StatusMessage::success(format!("{} scripts active", active)),
                );
                Ok(())
            }
            Err(e) => {
                log::error!("synchronization failed: {}", e);
                relay::notify_active_tab(
                    self.tabs.as_ref(),
                    &StatusMessage::error(e.to_string()),
                );
                Err(e.into())
            }
        }
    }

    // Repository mutations. Each persists first, then triggers the same
    // scripts-changed path an external storage change would.

    pub fn create_script(&mut self) -> Result<UserScript> {
        let script = self.repository.create()?;
        self.dispatch(Event::ScriptsChanged)?;
        Ok(script)
    }

    pub fn edit_script(&mut self, id: u32, edit: &ScriptEdit) -> Result<()> {
        self.repository.update(id, edit)?;
        self.dispatch(Event::ScriptsChanged)
    }

    pub fn delete_script(&mut self, id: u32) -> Result<()> {
        self.repository.delete(id)?;
        self.dispatch(Event::ScriptsChanged)
    }

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self, id: u32) -> Result<bool> {
        let paused = self.repository.toggle_pause(id)?;
        self.dispatch(Event::ScriptsChanged)?;
        Ok(paused)
    }
}
