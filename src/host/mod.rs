//! Host platform surface consumed by the coordinator
//!
//! The browser's user-script registration and tab APIs are external
//! collaborators; this module pins down exactly the slice of them the
//! coordinator needs, as traits, with an in-memory implementation for tests
//! and registration previews.

pub mod memory;

pub use memory::InMemoryHost;

use crate::models::{RegisteredScript, StatusMessage, WorldConfig};
use thiserror::Error;

pub type TabId = u32;

/// An open tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub id: TabId,
    /// None while the tab has no resolved URL yet.
    pub url: Option<String>,
    pub title: Option<String>,
    pub active: bool,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("user script capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("script registration failed: {0}")]
    Registration(String),

    #[error("tab query failed: {0}")]
    Tabs(String),

    #[error("message delivery failed: {0}")]
    Messaging(String),
}

/// Script registration surface (`chrome.userScripts` on Chromium).
pub trait UserScriptHost: Send + Sync {
    /// Explicit capability probe. Queried once at startup and cached by the
    /// coordinator; re-checked only on the next startup.
    fn capability(&self) -> Result<(), HostError>;

    /// Configure the execution world injected code runs in.
    fn configure_world(&self, config: &WorldConfig) -> Result<(), HostError>;

    /// The currently registered set.
    fn registered_scripts(&self) -> Result<Vec<RegisteredScript>, HostError>;

    /// Register a batch of scripts.
    fn register(&self, scripts: &[RegisteredScript]) -> Result<(), HostError>;

    /// Drop every registration.
    fn unregister_all(&self) -> Result<(), HostError>;
}

/// Tab enumeration, badge, and one-off messaging surface.
pub trait TabApi: Send + Sync {
    fn query_tabs(&self) -> Result<Vec<TabInfo>, HostError>;

    fn active_tab(&self) -> Result<Option<TabInfo>, HostError>;

    /// Set the per-tab badge text; empty text clears the badge.
    fn set_badge_text(&self, tab: TabId, text: &str) -> Result<(), HostError>;

    fn send_message(&self, tab: TabId, message: &StatusMessage) -> Result<(), HostError>;
}
