//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the round handler and the host.
//!
//! - **Driving Port (Inbound)**: `RoundHandler`
//! - **Driven Ports (Outbound)**: `TimestampLog`, `ReplySink`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
