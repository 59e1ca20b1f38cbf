//! # Domain Services
//!
//! Pure functions behind the dispatcher: request classification and reply
//! construction. No I/O.

use crate::domain::value_objects::{RequestKind, ECHO_PREFIX, QUERY_PREFIX};

/// Classifies an input payload.
///
/// The two-byte prefix check is bounded by the payload length, so a payload
/// of `t` alone (or an empty one) is an echo request.
#[must_use]
pub fn classify(payload: &[u8]) -> RequestKind {
    if payload.starts_with(QUERY_PREFIX) {
        RequestKind::TimestampQuery
    } else {
        RequestKind::Echo
    }
}

/// Segments of the echo reply for `payload`, in send order.
#[must_use]
pub fn echo_segments(payload: &[u8]) -> [&[u8]; 2] {
    [ECHO_PREFIX, payload]
}

/// Renders raw log contents into a timestamp query reply.
///
/// Every newline and NUL byte becomes a space, then the final byte is dropped.
/// For a well-formed log that byte is the space left by the last record's
/// newline. Returns `None` for an empty log.
#[must_use]
pub fn render_log_reply(mut contents: Vec<u8>) -> Option<Vec<u8>> {
    if contents.is_empty() {
        return None;
    }
    for byte in &mut contents {
        if *byte == b'\n' || *byte == 0 {
            *byte = b' ';
        }
    }
    contents.pop();
    Some(contents)
}

// =============================================================================
// TESTS
// =============================================================================
