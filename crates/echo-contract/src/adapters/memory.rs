//! # In-Memory Adapters
//!
//! Test doubles for the outbound ports. The log can be switched to fail so
//! the absorption paths are observable.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::domain::value_objects::{ParticipantKey, TimestampRecord};
use crate::errors::{LogError, ReplyError};
use crate::ports::outbound::{ReplySink, TimestampLog};

// =============================================================================
// IN-MEMORY TIMESTAMP LOG
// =============================================================================

/// Timestamp log held in a mutex-guarded buffer.
#[derive(Debug, Default)]
pub struct InMemoryTimestampLog {
    contents: Mutex<Vec<u8>>,
    fail_appends: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryTimestampLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log pre-filled with raw bytes.
    #[must_use]
    pub fn with_contents(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Mutex::new(contents.into()),
            ..Self::default()
        }
    }

    /// Makes every subsequent append fail.
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent read fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        self.contents.lock().clone()
    }
}

impl TimestampLog for InMemoryTimestampLog {
    fn append(&self, record: &TimestampRecord) -> Result<(), LogError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(LogError::Unavailable);
        }
        self.contents.lock().extend(record.to_bytes());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<u8>, LogError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LogError::Unavailable);
        }
        Ok(self.contents.lock().clone())
    }
}

// =============================================================================
// COLLECTING REPLY SINK
// =============================================================================

/// A reply as the host would deliver it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    /// Addressee.
    pub to: ParticipantKey,
    /// Reply bytes.
    pub bytes: Vec<u8>,
}

/// Reply sink that keeps every accepted reply in order.
#[derive(Debug, Default)]
pub struct CollectingReplySink {
    replies: Vec<Reply>,
    rejected: HashSet<ParticipantKey>,
}

impl CollectingReplySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every reply addressed to `key`.
    pub fn reject(&mut self, key: ParticipantKey) {
        self.rejected.insert(key);
    }

    /// Replies accepted so far, in send order.
    #[must_use]
    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    /// Replies accepted for one participant, in send order.
    #[must_use]
    pub fn replies_to(&self, key: &ParticipantKey) -> Vec<&[u8]> {
        self.replies
            .iter()
            .filter(|r| &r.to == key)
            .map(|r| r.bytes.as_slice())
            .collect()
    }

    /// Consumes the sink, returning the collected replies.
    #[must_use]
    pub fn into_replies(self) -> Vec<Reply> {
        self.replies
    }
}

impl ReplySink for CollectingReplySink {
    fn send(&mut self, to: &ParticipantKey, reply: &[u8]) -> Result<(), ReplyError> {
        if self.rejected.contains(to) {
            return Err(ReplyError::UnknownParticipant(to.clone()));
        }
        self.replies.push(Reply {
            to: to.clone(),
            bytes: reply.to_vec(),
        });
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_append_and_read() {
        let log = InMemoryTimestampLog::new();
        log.append(&TimestampRecord::new(5)).unwrap();
        log.append(&TimestampRecord::new(6)).unwrap();
        assert_eq!(log.read_all().unwrap(), b"ts:5\nts:6\n");
    }

    #[test]
    fn test_in_memory_failures() {
        let log = InMemoryTimestampLog::with_contents(b"ts:1\n".to_vec());
        log.set_fail_appends(true);
        assert!(matches!(
            log.append(&TimestampRecord::new(2)),
            Err(LogError::Unavailable)
        ));
        assert_eq!(log.snapshot(), b"ts:1\n");

        log.set_fail_reads(true);
        assert!(log.read_all().is_err());
        log.set_fail_reads(false);
        assert_eq!(log.read_all().unwrap(), b"ts:1\n");
    }

    #[test]
    fn test_collecting_sink_rejects() {
        let alice = ParticipantKey::new(vec![0xA1]);
        let bob = ParticipantKey::new(vec![0xB0]);
        let mut sink = CollectingReplySink::new();
        sink.reject(bob.clone());

        sink.send(&alice, b"one").unwrap();
        assert!(sink.send(&bob, b"two").is_err());
        sink.send_vectored(&alice, &[b"thr", b"ee"]).unwrap();

        assert_eq!(sink.replies().len(), 2);
        assert_eq!(sink.replies_to(&alice), vec![&b"one"[..], &b"three"[..]]);
        assert!(sink.replies_to(&bob).is_empty());
    }
}
