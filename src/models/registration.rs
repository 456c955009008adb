//! Host-side registration records and execution parameters

use serde::{Deserialize, Serialize};

/// Page-lifecycle point at which an injected script executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunTiming {
    /// Before the page starts constructing its DOM.
    #[serde(rename = "document_start")]
    DocumentStart,
    /// After the DOM is constructed, before subresources finish loading.
    #[serde(rename = "document_end")]
    DocumentEnd,
    /// After the page is idle. Default for unrecognized or absent directives.
    #[serde(rename = "document_idle")]
    DocumentIdle,
}

impl Default for RunTiming {
    fn default() -> Self {
        RunTiming::DocumentIdle
    }
}

impl RunTiming {
    /// Parse a `@run-at` directive value. Returns `None` for anything other
    /// than the three recognized timings.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "document_start" => Some(RunTiming::DocumentStart),
            "document_end" => Some(RunTiming::DocumentEnd),
            "document_idle" => Some(RunTiming::DocumentIdle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunTiming::DocumentStart => "document_start",
            RunTiming::DocumentEnd => "document_end",
            RunTiming::DocumentIdle => "document_idle",
        }
    }
}

/// Isolated execution context the host provides for injected code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionWorld {
    #[serde(rename = "USER_SCRIPT")]
    UserScript,
    #[serde(rename = "MAIN")]
    Main,
}

/// One entry in the host's registration set.
///
/// The whole set is replaced on every synchronization; individual entries are
/// never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredScript {
    /// Namespaced, stable per source script: `amw-script-<id>`.
    pub id: String,
    pub matches: Vec<String>,
    pub code: String,
    pub world: ExecutionWorld,
    pub run_at: RunTiming,
}

impl RegisteredScript {
    /// The registration id used for a given [`UserScript`] id. Stable across
    /// runs so re-registering is idempotent.
    pub fn id_for(script_id: u32) -> String {
        format!("amw-script-{}", script_id)
    }
}

/// Configuration for the user-script execution world, pushed once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// CSP applied to the world. User scripts are allowed to eval.
    pub csp: String,
    /// Whether injected scripts may message the extension.
    pub messaging: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            csp: "script-src 'self' 'unsafe-eval'".to_string(),
            messaging: true,
        }
    }
}
