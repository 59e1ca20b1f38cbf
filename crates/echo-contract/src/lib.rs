//! # Echo Contract - Per-Round Transaction Handler
//!
//! ## Purpose
//!
//! Invoked once per consensus round by the host runtime. Records the round
//! timestamp in an append-only log and answers every pending participant
//! input, either with an echo of the payload or with the recorded timestamp
//! history.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Append-only log, records never interleaved | `adapters/file_log.rs` - `write_record()` |
//! | INVARIANT-2 | No durable effect in readonly rounds | `service.rs` - `record_timestamp()` |
//! | INVARIANT-3 | Bounded 2-byte classification | `domain/services.rs` - `classify()` |
//! | INVARIANT-4 | Replies only to the sender | `service.rs` - `dispatch_participant()` |
//! | INVARIANT-5 | Log I/O failures never abort a round | `service.rs` - `handle_input()` |
//!
//! ## Wire Formats
//!
//! | Item | Bytes |
//! |------|-------|
//! | Log record | `ts:` + decimal u64 + `\n` |
//! | Echo reply | `Echoing: ` + verbatim payload |
//! | Query reply | log with `\n`/NUL as space, final byte dropped |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `TimestampLog` | Durable append-only record of round timestamps |
//! | `ReplySink` | Host delivery of replies to participants |
//!
//! ## Usage Example
//!
//! ```ignore
//! use echo_contract::prelude::*;
//!
//! let service = ContractService::from_config(&ContractConfig::default());
//! let stats = service.execute_round(&context, &mut sink);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{ExecutionContext, InputMessage, LedgerRef, Participant};
    pub use crate::domain::services::{classify, echo_segments, render_log_reply};
    pub use crate::domain::value_objects::{
        ParticipantKey, RequestKind, TimestampRecord, DEFAULT_LOG_FILE, ECHO_PREFIX,
    };

    // Ports
    pub use crate::ports::inbound::{RecordOutcome, RoundHandler, RoundStats};
    pub use crate::ports::outbound::{ReplySink, TimestampLog};

    // Errors
    pub use crate::errors::{ContextError, LogError, ReplyError};

    // Adapters
    pub use crate::adapters::{
        CollectingReplySink, FileTimestampLog, InMemoryTimestampLog, Reply,
    };

    // Service
    pub use crate::service::{ContractConfig, ContractService};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
