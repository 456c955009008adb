//! Directive parsing for user script bodies

pub mod directives;

pub use directives::*;
