//! # Contract Service
//!
//! Application service implementing `RoundHandler` over a `TimestampLog`.
//!
//! ## Round flow
//!
//! 1. Recorder: append `ts:<timestamp>\n` unless the round is readonly
//! 2. Dispatcher: classify each input of each participant and reply to it
//! 3. Host flushes the replies
//!
//! ## Failure policy
//!
//! Log and delivery errors are logged at `warn` and counted in `RoundStats`.
//! They never stop the round: a failed append leaves the log untouched, a
//! failed query read suppresses only that reply.

use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::adapters::FileTimestampLog;
use crate::domain::entities::{ExecutionContext, InputMessage, Participant};
use crate::domain::services::{classify, echo_segments, render_log_reply};
use crate::domain::value_objects::{
    ParticipantKey, RequestKind, TimestampRecord, DEFAULT_LOG_FILE,
};
use crate::ports::inbound::{RecordOutcome, RoundHandler, RoundStats};
use crate::ports::outbound::{ReplySink, TimestampLog};

/// Contract configuration.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    /// Timestamp log location.
    pub log_path: PathBuf,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// The per-round contract.
pub struct ContractService<L: TimestampLog> {
    log: L,
}

impl ContractService<FileTimestampLog> {
    /// Creates a service backed by the file log named in `config`.
    #[must_use]
    pub fn from_config(config: &ContractConfig) -> Self {
        Self::new(FileTimestampLog::new(&config.log_path))
    }
}

impl<L: TimestampLog> ContractService<L> {
    /// Creates a service over any timestamp log.
    pub fn new(log: L) -> Self {
        Self { log }
    }

    /// The underlying log.
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Handles one input and updates `stats`.
    fn handle_input(
        &self,
        to: &ParticipantKey,
        input: &InputMessage,
        sink: &mut dyn ReplySink,
        stats: &mut RoundStats,
    ) {
        stats.inputs_processed += 1;
        let payload = input.payload();
        let kind = classify(payload);
        debug!(participant = %to, kind = %kind, len = input.len(), "[echo] input");

        let delivered = match kind {
            RequestKind::Echo => {
                stats.echo_replies += 1;
                sink.send_vectored(to, &echo_segments(payload))
            }
            RequestKind::TimestampQuery => {
                let contents = match self.log.read_all() {
                    Ok(contents) => contents,
                    Err(e) => {
                        warn!(participant = %to, error = %e, "[echo] timestamp log unreadable, no reply");
                        stats.log_read_failures += 1;
                        stats.queries_unanswered += 1;
                        return;
                    }
                };
                let Some(reply) = render_log_reply(contents) else {
                    debug!(participant = %to, "[echo] timestamp log empty, no reply");
                    stats.queries_unanswered += 1;
                    return;
                };
                stats.timestamp_replies += 1;
                sink.send(to, &reply)
            }
        };

        if let Err(e) = delivered {
            warn!(participant = %to, error = %e, "[echo] reply not accepted by host");
            stats.delivery_failures += 1;
        }
    }

    fn dispatch_participant(
        &self,
        participant: &Participant,
        sink: &mut dyn ReplySink,
        stats: &mut RoundStats,
    ) {
        for input in &participant.inputs {
            self.handle_input(&participant.key, input, sink, stats);
        }
    }
}

impl<L: TimestampLog> RoundHandler for ContractService<L> {
    fn record_timestamp(&self, readonly: bool, timestamp: u64) -> RecordOutcome {
        if readonly {
            debug!(timestamp, "[echo] readonly round, timestamp not recorded");
            return RecordOutcome::SkippedReadonly;
        }
        match self.log.append(&TimestampRecord::new(timestamp)) {
            Ok(()) => RecordOutcome::Appended,
            Err(e) => {
                warn!(
                    timestamp,
                    error = %e,
                    log_untouched = e.is_before_write(),
                    "[echo] failed to record round timestamp"
                );
                RecordOutcome::Failed
            }
        }
    }

    fn dispatch_messages(
        &self,
        context: &ExecutionContext,
        sink: &mut dyn ReplySink,
    ) -> RoundStats {
        let mut stats = RoundStats::default();
        for participant in &context.participants {
            self.dispatch_participant(participant, sink, &mut stats);
        }
        stats
    }

    #[instrument(
        name = "round",
        skip_all,
        fields(
            timestamp = context.timestamp,
            readonly = context.readonly,
            contract_id = context.contract_id.as_deref(),
            node_key = context.node_key.as_ref().map(tracing::field::display),
            lcl_seq_no = context.last_closed_ledger.as_ref().map(|l| l.seq_no),
            lcl_hash = context.last_closed_ledger.as_ref().map(|l| l.hash.as_str()),
        )
    )]
    fn execute_round(&self, context: &ExecutionContext, sink: &mut dyn ReplySink) -> RoundStats {
        info!(
            participants = context.participants.len(),
            inputs = context.input_count(),
            "[echo] round started"
        );

        let mut stats = RoundStats::default();
        match self.record_timestamp(context.readonly, context.timestamp) {
            RecordOutcome::Appended => stats.records_appended = 1,
            RecordOutcome::Failed => stats.record_failures = 1,
            RecordOutcome::SkippedReadonly => {}
        }
        stats.merge(&self.dispatch_messages(context, sink));

        info!(
            replies = stats.replies(),
            unanswered = stats.queries_unanswered,
            delivery_failures = stats.delivery_failures,
            "[echo] round complete"
        );
        stats
    }
}

// =============================================================================
// TESTS
// =============================================================================
