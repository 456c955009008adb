//! User script records as persisted by the repository

use serde::{Deserialize, Serialize};

/// A user-authored script managed by the extension.
///
/// `body` may embed directive comments (`@match`, `@run-at`) that control
/// where and when the script runs; they are parsed on demand, never stored
/// separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserScript {
    pub id: u32,
    pub name: String,

    /// Free-text requirement the body was generated from. Empty for
    /// hand-written scripts.
    #[serde(default)]
    pub requirement: String,

    pub body: String,

    /// Paused scripts stay in the repository but are never registered.
    #[serde(default)]
    pub is_paused: bool,
}

impl UserScript {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: "New Script".to_string(),
            requirement: String::new(),
            body: "console.log(\"hello\")".to_string(),
            is_paused: false,
        }
    }
}

/// Fields of a [`UserScript`] that an edit may change.
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ScriptEdit {
    pub name: Option<String>,
    pub requirement: Option<String>,
    pub body: Option<String>,
}

impl ScriptEdit {
    pub fn apply(&self, script: &mut UserScript) {
        if let Some(name) = &self.name {
            script.name = name.clone();
        }
        if let Some(requirement) = &self.requirement {
            script.requirement = requirement.clone();
        }
        if let Some(body) = &self.body {
            script.body = body.clone();
        }
    }
}
