//! # Host Adapter
//!
//! Translates between the host process boundary and the contract's ports.
//!
//! ## Context format
//!
//! The host hands over one JSON document per round:
//!
//! ```text
//! {
//!   "timestamp": 1700000000000,
//!   "readonly": false,
//!   "contract_id": "echo",
//!   "pubkey": "ed5b...",
//!   "lcl_seq_no": 12,
//!   "lcl_hash": "4f1c...",
//!   "user_input_path": "inputs.bin",
//!   "users": [
//!     { "pubkey": "ed01...", "inputs": [[0, 5], [5, 2]] }
//!   ]
//! }
//! ```
//!
//! Each input is an `[offset, size]` range in the shared input buffer at
//! `user_input_path`. Users keep the order of the array.
//!
//! ## Reply format
//!
//! One JSON line per reply on the output stream:
//! `{"user":"<hex key>","reply":"<hex bytes>"}`.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use echo_contract::domain::entities::{ExecutionContext, InputMessage, LedgerRef, Participant};
use echo_contract::domain::value_objects::ParticipantKey;
use echo_contract::errors::{ContextError, ReplyError};
use echo_contract::ports::outbound::ReplySink;
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// HOST CONTEXT
// =============================================================================

/// One participant as listed by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct HostUser {
    /// Hex-encoded participant key.
    pub pubkey: String,
    /// `[offset, size]` ranges in the input buffer.
    #[serde(default)]
    pub inputs: Vec<(u64, u64)>,
}

/// Host execution context document.
#[derive(Debug, Clone, Deserialize)]
pub struct HostContext {
    /// Round timestamp.
    pub timestamp: u64,
    /// Readonly round flag.
    #[serde(default)]
    pub readonly: bool,
    /// Contract identifier.
    #[serde(default)]
    pub contract_id: Option<String>,
    /// This node's hex-encoded public key.
    #[serde(default)]
    pub pubkey: Option<String>,
    /// Last closed ledger sequence number.
    #[serde(default)]
    pub lcl_seq_no: Option<u64>,
    /// Last closed ledger hash.
    #[serde(default)]
    pub lcl_hash: Option<String>,
    /// Shared input buffer location.
    #[serde(default)]
    pub user_input_path: Option<PathBuf>,
    /// Participants in host order.
    #[serde(default)]
    pub users: Vec<HostUser>,
}

impl HostContext {
    /// Parses the host's context document.
    pub fn parse(json: &str) -> Result<Self, ContextError> {
        serde_json::from_str(json).map_err(|e| ContextError::Malformed(e.to_string()))
    }

    /// Reads the shared input buffer, relative paths resolved by `resolve`.
    ///
    /// No input buffer path means an empty buffer.
    pub fn load_input_buffer(
        &self,
        resolve: impl Fn(&Path) -> PathBuf,
    ) -> Result<Vec<u8>, ContextError> {
        let Some(path) = &self.user_input_path else {
            return Ok(Vec::new());
        };
        let path = resolve(path);
        fs::read(&path).map_err(|source| ContextError::InputBuffer { path, source })
    }

    /// Builds the round's execution context, slicing every input out of
    /// `input_buffer`.
    ///
    /// Fails on malformed keys or out-of-range inputs; nothing is processed
    /// for a round whose context does not resolve completely.
    pub fn into_execution_context(
        self,
        input_buffer: &[u8],
    ) -> Result<ExecutionContext, ContextError> {
        let node_key = self.pubkey.as_deref().map(parse_key).transpose()?;
        let last_closed_ledger = self.lcl_seq_no.map(|seq_no| LedgerRef {
            seq_no,
            hash: self.lcl_hash.clone().unwrap_or_default(),
        });

        let mut participants = Vec::with_capacity(self.users.len());
        for user in &self.users {
            let key = parse_key(&user.pubkey)?;
            let mut participant = Participant::new(key);
            for (index, &(offset, size)) in user.inputs.iter().enumerate() {
                let payload = slice_input(input_buffer, offset, size).ok_or_else(|| {
                    ContextError::InputOutOfBounds {
                        participant: participant.key.clone(),
                        index,
                        offset,
                        size,
                        buffer_len: input_buffer.len(),
                    }
                })?;
                participant.inputs.push(InputMessage::from(payload));
            }
            debug!(participant = %participant.key, inputs = participant.inputs.len(), "resolved participant");
            participants.push(participant);
        }

        Ok(ExecutionContext {
            timestamp: self.timestamp,
            readonly: self.readonly,
            participants,
            contract_id: self.contract_id,
            node_key,
            last_closed_ledger,
        })
    }
}

fn parse_key(hex: &str) -> Result<ParticipantKey, ContextError> {
    ParticipantKey::from_hex(hex)
        .map_err(|e| ContextError::Malformed(format!("invalid pubkey {hex:?}: {e}")))
}

fn slice_input(buffer: &[u8], offset: u64, size: u64) -> Option<&[u8]> {
    let start = usize::try_from(offset).ok()?;
    let len = usize::try_from(size).ok()?;
    let end = start.checked_add(len)?;
    buffer.get(start..end)
}

// =============================================================================
// REPLY SINK
// =============================================================================

#[derive(Serialize)]
struct ReplyLine {
    user: String,
    reply: String,
}

/// Reply sink writing one JSON line per reply.
pub struct JsonLinesReplySink<W: Write> {
    out: BufWriter<W>,
    written: u64,
}

impl<W: Write> JsonLinesReplySink<W> {
    /// Wraps an output stream.
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
            written: 0,
        }
    }

    /// Replies written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes buffered replies and returns the inner stream.
    pub fn finish(self) -> io::Result<W> {
        self.out.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> ReplySink for JsonLinesReplySink<W> {
    fn send(&mut self, to: &ParticipantKey, reply: &[u8]) -> Result<(), ReplyError> {
        let line = ReplyLine {
            user: to.to_hex(),
            reply: hex::encode(reply),
        };
        serde_json::to_writer(&mut self.out, &line).map_err(io::Error::from)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
