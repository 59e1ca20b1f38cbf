//! # Domain Layer (Inner Hexagon)
//!
//! Round entities, wire constants and the pure classification and reply
//! rendering rules. NO I/O.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
