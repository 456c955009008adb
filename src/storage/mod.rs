//! Key-value persistence behind a store trait

pub mod kv;
pub mod memory;
pub mod file;

pub use kv::*;
pub use memory::*;
pub use file::*;
