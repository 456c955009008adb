//! Core data models for user script management

pub mod script;
pub mod registration;
pub mod settings;
pub mod page;

pub use script::*;
pub use registration::*;
pub use settings::*;
pub use page::*;
