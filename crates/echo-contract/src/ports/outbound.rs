//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the round handler depends on:
//! - The durable timestamp log
//! - The host's reply channel
//!
//! Production: `FileTimestampLog` plus the host adapter's reply sink.
//! Testing: `InMemoryTimestampLog` and `CollectingReplySink`.

use crate::domain::value_objects::{ParticipantKey, TimestampRecord};
use crate::errors::{LogError, ReplyError};

// =============================================================================
// TIMESTAMP LOG
// =============================================================================

/// Append-only store of timestamp records.
///
/// ## Invariants
///
/// - Records are only ever appended, never modified or removed.
/// - Each `append` lands as one whole record or not at all.
/// - Each call is a complete open/access/release sequence; implementations
///   serialize overlapping calls themselves.
pub trait TimestampLog: Send + Sync {
    /// Append one record.
    fn append(&self, record: &TimestampRecord) -> Result<(), LogError>;

    /// Read the complete log contents.
    ///
    /// An absent log reads as empty.
    fn read_all(&self) -> Result<Vec<u8>, LogError>;
}

impl<T: TimestampLog + ?Sized> TimestampLog for &T {
    fn append(&self, record: &TimestampRecord) -> Result<(), LogError> {
        (**self).append(record)
    }

    fn read_all(&self) -> Result<Vec<u8>, LogError> {
        (**self).read_all()
    }
}

impl<T: TimestampLog + ?Sized> TimestampLog for std::sync::Arc<T> {
    fn append(&self, record: &TimestampRecord) -> Result<(), LogError> {
        (**self).append(record)
    }

    fn read_all(&self) -> Result<Vec<u8>, LogError> {
        (**self).read_all()
    }
}

// =============================================================================
// REPLY SINK
// =============================================================================

/// Host reply channel.
///
/// Fire-and-forget from the handler's point of view: the result is logged
/// and counted, never acted upon.
pub trait ReplySink {
    /// Enqueue one reply buffer for `to`.
    fn send(&mut self, to: &ParticipantKey, reply: &[u8]) -> Result<(), ReplyError>;

    /// Enqueue one reply made of several segments, delivered as one message.
    ///
    /// The default concatenates the segments and calls `send`.
    fn send_vectored(&mut self, to: &ParticipantKey, segments: &[&[u8]]) -> Result<(), ReplyError> {
        self.send(to, &segments.concat())
    }
}

impl<T: ReplySink + ?Sized> ReplySink for &mut T {
    fn send(&mut self, to: &ParticipantKey, reply: &[u8]) -> Result<(), ReplyError> {
        (**self).send(to, reply)
    }

    fn send_vectored(&mut self, to: &ParticipantKey, segments: &[&[u8]]) -> Result<(), ReplyError> {
        (**self).send_vectored(to, segments)
    }
}

// =============================================================================
// TESTS
// =============================================================================
