//! Persisted state: the script list and LLM settings

pub mod scripts;
pub mod settings;

pub use scripts::*;
pub use settings::*;
