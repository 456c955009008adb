//! LLM-backed script generation

pub mod prompts;
pub mod client;

pub use client::{LlmClient, LlmError};
pub use prompts::build_prompt;
