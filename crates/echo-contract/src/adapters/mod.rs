//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the outbound ports.
//!
//! - `file_log`: the durable timestamp log on local disk
//! - `memory`: in-memory log and reply collector for tests and embedding

pub mod file_log;
mod lock;
pub mod memory;

pub use file_log::*;
pub use memory::*;
