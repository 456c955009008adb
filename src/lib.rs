//! All My Web: user script manager core
//!
//! Lets a user author, store, and selectively inject small JavaScript
//! snippets into web pages. The crate covers the coordinator side: parsing
//! `@match`/`@run-at` directives, keeping the host's registration set in
//! sync with the persisted script list, counting matching scripts per tab,
//! and generating script bodies from natural-language requirements via an
//! LLM. The rendering UI and the host platform itself are external.

pub mod models;
pub mod parser;
pub mod matcher;
pub mod storage;
pub mod repository;
pub mod host;
pub mod coordinator;
pub mod llm;

pub use coordinator::{Capability, Coordinator, Event, TabMatchTracker};
pub use models::{
    ExecutionWorld, LlmSettings, PageContext, RegisteredScript, RunTiming, ScriptEdit, UserScript,
};
pub use parser::{extract_match_patterns, extract_run_at, is_valid_match_pattern};
pub use repository::{ScriptRepository, SettingsStore};
