//! # Value Objects
//!
//! Immutable domain primitives for round execution.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// WIRE CONSTANTS
// =============================================================================

/// Prefix of every timestamp log record.
pub const RECORD_PREFIX: &[u8] = b"ts:";

/// Terminator of every timestamp log record.
pub const RECORD_TERMINATOR: u8 = b'\n';

/// Leading bytes that mark an input as a timestamp query.
pub const QUERY_PREFIX: &[u8] = b"ts";

/// Prefix of every echo reply (9 bytes).
pub const ECHO_PREFIX: &[u8] = b"Echoing: ";

/// Default log location, relative to the host working directory.
pub const DEFAULT_LOG_FILE: &str = "exects.txt";

// =============================================================================
// PARTICIPANT KEY
// =============================================================================

/// Opaque participant identity.
///
/// Only used to address replies. The core never inspects its contents.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ParticipantKey(Vec<u8>);

impl ParticipantKey {
    /// Creates a key from raw bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parses a hex-encoded key (as hosts usually print public keys).
    ///
    /// # Errors
    ///
    /// Returns the hex decoding error for malformed input.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(s).map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParticipantKey({})", self.to_hex())
    }
}

impl fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        if hex.len() > 16 {
            write!(f, "{}...{}", &hex[..8], &hex[hex.len() - 8..])
        } else {
            f.write_str(&hex)
        }
    }
}

impl From<&[u8]> for ParticipantKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

// =============================================================================
// REQUEST KIND
// =============================================================================

/// The two request kinds an input can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Return the recorded timestamp history.
    TimestampQuery,
    /// Return the payload prefixed with `Echoing: `.
    Echo,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimestampQuery => f.write_str("timestamp-query"),
            Self::Echo => f.write_str("echo"),
        }
    }
}

// =============================================================================
// TIMESTAMP RECORD
// =============================================================================

/// One `ts:<decimal>\n` log record.
///
/// Held as the two segments that go into a single vectored write: the literal
/// prefix and the decimal digits with the trailing newline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimestampRecord {
    timestamp: u64,
    body: Vec<u8>,
}

impl TimestampRecord {
    /// Builds the record for a round timestamp.
    #[must_use]
    pub fn new(timestamp: u64) -> Self {
        let mut body = timestamp.to_string().into_bytes();
        body.push(RECORD_TERMINATOR);
        Self { timestamp, body }
    }

    /// The round timestamp this record stores.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// The `<decimal>\n` segment.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Both segments, in write order.
    #[must_use]
    pub fn segments(&self) -> [&[u8]; 2] {
        [RECORD_PREFIX, &self.body]
    }

    /// Total record length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        RECORD_PREFIX.len() + self.body.len()
    }

    /// Always false; a record has at least `ts:0\n`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The record as one contiguous buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(RECORD_PREFIX);
        out.extend_from_slice(&self.body);
        out
    }
}

// =============================================================================
// TESTS
// =============================================================================
