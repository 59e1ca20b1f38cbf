//! # Core Domain Entities
//!
//! The round as the host hands it over: execution context, participants and
//! their pending inputs.

use crate::domain::value_objects::ParticipantKey;

// =============================================================================
// INPUT MESSAGE
// =============================================================================

/// One pending input from a participant.
///
/// The payload is immutable for the duration of the round.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct InputMessage(Vec<u8>);

impl InputMessage {
    /// Wraps a payload.
    #[must_use]
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self(payload.into())
    }

    /// The raw payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.0
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for a zero-length payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for InputMessage {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

// =============================================================================
// PARTICIPANT
// =============================================================================

/// An addressable consensus member and the inputs it sent this round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    /// Reply address.
    pub key: ParticipantKey,
    /// Inputs in the order the host received them.
    pub inputs: Vec<InputMessage>,
}

impl Participant {
    /// Creates a participant with no inputs.
    #[must_use]
    pub fn new(key: ParticipantKey) -> Self {
        Self {
            key,
            inputs: Vec::new(),
        }
    }

    /// Builder-style helper that appends an input.
    #[must_use]
    pub fn with_input(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.inputs.push(InputMessage::new(payload));
        self
    }
}

// =============================================================================
// EXECUTION CONTEXT
// =============================================================================

/// Reference to the host's last closed ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerRef {
    /// Sequence number of the last closed ledger.
    pub seq_no: u64,
    /// Hash of the last closed ledger, as the host reports it.
    pub hash: String,
}

/// Execution context for one round.
///
/// Host-owned and read-only. Built once per round and passed explicitly into
/// the service; there is no process-wide context handle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Round timestamp, non-decreasing across rounds.
    pub timestamp: u64,
    /// True when the round must not produce durable side effects.
    pub readonly: bool,
    /// Participants in host-assigned order.
    pub participants: Vec<Participant>,
    /// Contract identifier, if the host supplies one.
    pub contract_id: Option<String>,
    /// This node's own public key, if the host supplies one.
    pub node_key: Option<ParticipantKey>,
    /// Last closed ledger, if the host supplies one.
    pub last_closed_ledger: Option<LedgerRef>,
}

impl ExecutionContext {
    /// Creates a context with no participants and no host metadata.
    #[must_use]
    pub fn new(timestamp: u64, readonly: bool) -> Self {
        Self {
            timestamp,
            readonly,
            ..Self::default()
        }
    }

    /// Builder-style helper that appends a participant.
    #[must_use]
    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participants.push(participant);
        self
    }

    /// Total number of pending inputs across all participants.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.participants.iter().map(|p| p.inputs.len()).sum()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_message_len() {
        let msg = InputMessage::new(b"hello".to_vec());
        assert_eq!(msg.len(), 5);
        assert!(!msg.is_empty());
        assert!(InputMessage::default().is_empty());
    }

    #[test]
    fn test_context_builder() {
        let ctx = ExecutionContext::new(42, true)
            .with_participant(
                Participant::new(ParticipantKey::new(vec![1]))
                    .with_input(b"a".to_vec())
                    .with_input(b"b".to_vec()),
            )
            .with_participant(Participant::new(ParticipantKey::new(vec![2])));

        assert_eq!(ctx.timestamp, 42);
        assert!(ctx.readonly);
        assert_eq!(ctx.participants.len(), 2);
        assert_eq!(ctx.input_count(), 2);
        assert!(ctx.last_closed_ledger.is_none());
    }
}
