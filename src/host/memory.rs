//! In-memory host double with failure injection
//!
//! Models the registration and tab surface as plain state: a live
//! registration set, an open-tab table, badge text per tab, and a record of
//! delivered messages. Backs the test suite and the CLI's sync preview.

use super::{HostError, TabApi, TabId, TabInfo, UserScriptHost};
use crate::models::{RegisteredScript, StatusMessage, WorldConfig};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryHost {
    registered: Mutex<Vec<RegisteredScript>>,
    world: Mutex<Option<WorldConfig>>,
    tabs: Mutex<BTreeMap<TabId, TabInfo>>,
    badges: Mutex<BTreeMap<TabId, String>>,
    delivered: Mutex<Vec<(TabId, StatusMessage)>>,

    capability_disabled: AtomicBool,
    fail_register: AtomicBool,
    fail_unregister: AtomicBool,
    no_listener: AtomicBool,
    registration_calls: AtomicUsize,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the platform's developer-mode toggle being off.
    pub fn set_capability_disabled(&self, disabled: bool) {
        self.capability_disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn set_fail_register(&self, fail: bool) {
        self.fail_register.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_unregister(&self, fail: bool) {
        self.fail_unregister.store(fail, Ordering::SeqCst);
    }

    /// Simulate a tab with no receiving message listener.
    pub fn set_no_listener(&self, no_listener: bool) {
        self.no_listener.store(no_listener, Ordering::SeqCst);
    }

    /// Number of register/unregister calls made so far.
    pub fn registration_calls(&self) -> usize {
        self.registration_calls.load(Ordering::SeqCst)
    }

    pub fn open_tab(&self, id: TabId, url: Option<&str>, title: Option<&str>) {
        let mut tabs = self.tabs.lock().expect("host mutex poisoned");
        tabs.insert(
            id,
            TabInfo {
                id,
                url: url.map(str::to_string),
                title: title.map(str::to_string),
                active: false,
            },
        );
    }

    pub fn navigate_tab(&self, id: TabId, url: &str) {
        let mut tabs = self.tabs.lock().expect("host mutex poisoned");
        if let Some(tab) = tabs.get_mut(&id) {
            tab.url = Some(url.to_string());
        }
    }

    pub fn activate_tab(&self, id: TabId) {
        let mut tabs = self.tabs.lock().expect("host mutex poisoned");
        for tab in tabs.values_mut() {
            tab.active = tab.id == id;
        }
    }

    pub fn close_tab(&self, id: TabId) {
        let mut tabs = self.tabs.lock().expect("host mutex poisoned");
        tabs.remove(&id);
    }

    pub fn badge_text(&self, id: TabId) -> Option<String> {
        let badges = self.badges.lock().expect("host mutex poisoned");
        badges.get(&id).cloned()
    }

    pub fn delivered_messages(&self) -> Vec<(TabId, StatusMessage)> {
        self.delivered.lock().expect("host mutex poisoned").clone()
    }

    pub fn world_config(&self) -> Option<WorldConfig> {
        self.world.lock().expect("host mutex poisoned").clone()
    }
}

impl UserScriptHost for InMemoryHost {
    fn capability(&self) -> Result<(), HostError> {
        if self.capability_disabled.load(Ordering::SeqCst) {
            Err(HostError::CapabilityUnavailable(
                "developer mode is disabled".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn configure_world(&self, config: &WorldConfig) -> Result<(), HostError> {
        let mut world = self.world.lock().expect("host mutex poisoned");
        *world = Some(config.clone());
        Ok(())
    }

    fn registered_scripts(&self) -> Result<Vec<RegisteredScript>, HostError> {
        Ok(self.registered.lock().expect("host mutex poisoned").clone())
    }

    fn register(&self, scripts: &[RegisteredScript]) -> Result<(), HostError> {
        self.registration_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(HostError::Registration("injected register failure".to_string()));
        }
        let mut registered = self.registered.lock().expect("host mutex poisoned");
        registered.extend(scripts.iter().cloned());
        Ok(())
    }

    fn unregister_all(&self) -> Result<(), HostError> {
        self.registration_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_unregister.load(Ordering::SeqCst) {
            return Err(HostError::Registration(
                "injected unregister failure".to_string(),
            ));
        }
        let mut registered = self.registered.lock().expect("host mutex poisoned");
        registered.clear();
        Ok(())
    }
}

impl TabApi for InMemoryHost {
    fn query_tabs(&self) -> Result<Vec<TabInfo>, HostError> {
        let tabs = self.tabs.lock().expect("host mutex poisoned");
        Ok(tabs.values().cloned().collect())
    }

    fn active_tab(&self) -> Result<Option<TabInfo>, HostError> {
        let tabs = self.tabs.lock().expect("host mutex poisoned");
        Ok(tabs.values().find(|t| t.active).cloned())
    }

    fn set_badge_text(&self, tab: TabId, text: &str) -> Result<(), HostError> {
        let mut badges = self.badges.lock().expect("host mutex poisoned");
        if text.is_empty() {
            badges.remove(&tab);
        } else {
            badges.insert(tab, text.to_string());
        }
        Ok(())
    }

    fn send_message(&self, tab: TabId, message: &StatusMessage) -> Result<(), HostError> {
        if self.no_listener.load(Ordering::SeqCst) {
            return Err(HostError::Messaging(format!(
                "tab {} has no receiving listener",
                tab
            )));
        }
        let mut delivered = self.delivered.lock().expect("host mutex poisoned");
        delivered.push((tab, message.clone()));
        Ok(())
    }
}
