//! # Error Types
//!
//! All error types for round execution.
//!
//! None of these abort a round on their own: log and delivery failures are
//! caught by the service, logged, and counted in `RoundStats`. Only
//! `ContextError` is fatal, and it is raised before any processing starts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::value_objects::ParticipantKey;

// =============================================================================
// LOG ERRORS
// =============================================================================

/// Errors from timestamp log access.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log could not be opened (permission, missing directory, ...).
    #[error("failed to open timestamp log {path}: {source}")]
    Open {
        /// Log location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The advisory lock around the log could not be taken.
    #[error("failed to lock timestamp log {path}: {source}")]
    Lock {
        /// Log location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading the log contents failed.
    #[error("failed to read timestamp log: {0}")]
    Read(#[source] io::Error),

    /// Writing a record failed (disk full, ...).
    #[error("failed to append timestamp record: {0}")]
    Write(#[source] io::Error),

    /// A record was left incomplete: the writer stalled or failed after
    /// accepting part of it.
    #[error("timestamp record write stalled: {written} of {expected} bytes written")]
    ShortWrite {
        /// Bytes accepted before the stall.
        written: usize,
        /// Full record length.
        expected: usize,
    },

    /// The log is unavailable (in-memory adapter switched off).
    #[error("timestamp log unavailable")]
    Unavailable,
}

impl LogError {
    /// Returns true if the failure happened before any byte reached the log.
    #[must_use]
    pub fn is_before_write(&self) -> bool {
        matches!(
            self,
            Self::Open { .. } | Self::Lock { .. } | Self::Unavailable
        )
    }
}

// =============================================================================
// REPLY ERRORS
// =============================================================================

/// Errors from handing a reply to the host.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// The host does not know this participant.
    #[error("unknown participant: {0}")]
    UnknownParticipant(ParticipantKey),

    /// The host's outbound channel rejected the reply.
    #[error("reply delivery failed: {0}")]
    Delivery(#[from] io::Error),
}

// =============================================================================
// CONTEXT ERRORS
// =============================================================================

/// Errors acquiring the round's execution context. Fatal to the round.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The host context could not be parsed.
    #[error("malformed execution context: {0}")]
    Malformed(String),

    /// An input reference points outside the host's input buffer.
    #[error(
        "input {index} of participant {participant} out of bounds: \
         offset {offset} + size {size} > buffer length {buffer_len}"
    )]
    InputOutOfBounds {
        /// Participant owning the input.
        participant: ParticipantKey,
        /// Position of the input in the participant's list.
        index: usize,
        /// Start of the payload in the input buffer.
        offset: u64,
        /// Payload length.
        size: u64,
        /// Length of the host input buffer.
        buffer_len: usize,
    },

    /// The host input buffer could not be read.
    #[error("failed to read input buffer {path}: {source}")]
    InputBuffer {
        /// Input buffer location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

// =============================================================================
// TESTS
// =============================================================================
