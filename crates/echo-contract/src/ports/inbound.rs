//! # Driving Ports (API - Inbound)
//!
//! The interface the host runtime drives once per consensus round.

use crate::domain::entities::ExecutionContext;
use crate::ports::outbound::ReplySink;

// =============================================================================
// ROUND STATISTICS
// =============================================================================

/// Outcome counters for one round.
///
/// Log and delivery failures never abort a round; this is where they surface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundStats {
    /// Inputs classified across all participants.
    pub inputs_processed: u64,
    /// Echo replies handed to the host.
    pub echo_replies: u64,
    /// Timestamp query replies handed to the host.
    pub timestamp_replies: u64,
    /// Timestamp queries answered with silence (empty or unreadable log).
    pub queries_unanswered: u64,
    /// Timestamp queries whose log read failed.
    pub log_read_failures: u64,
    /// Replies the host sink rejected.
    pub delivery_failures: u64,
    /// Records appended to the timestamp log (0 or 1).
    pub records_appended: u64,
    /// Record appends that failed (0 or 1).
    pub record_failures: u64,
}

impl RoundStats {
    /// Replies produced, whether or not the host accepted them.
    #[must_use]
    pub fn replies(&self) -> u64 {
        self.echo_replies + self.timestamp_replies
    }

    /// Folds another set of counters into this one.
    pub fn merge(&mut self, other: &RoundStats) {
        self.inputs_processed += other.inputs_processed;
        self.echo_replies += other.echo_replies;
        self.timestamp_replies += other.timestamp_replies;
        self.queries_unanswered += other.queries_unanswered;
        self.log_read_failures += other.log_read_failures;
        self.delivery_failures += other.delivery_failures;
        self.records_appended += other.records_appended;
        self.record_failures += other.record_failures;
    }
}

/// Result of the recorder step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A record was appended.
    Appended,
    /// Readonly round; nothing written.
    SkippedReadonly,
    /// The append failed and was absorbed.
    Failed,
}

// =============================================================================
// ROUND HANDLER (Primary Driving Port)
// =============================================================================

/// Per-round contract entry point.
///
/// ## Usage
///
/// ```ignore
/// let stats = handler.execute_round(&context, &mut sink);
/// ```
pub trait RoundHandler {
    /// Append the round timestamp to the log unless the round is readonly.
    ///
    /// Never fails; an append error is logged and reported as
    /// `RecordOutcome::Failed`.
    fn record_timestamp(&self, readonly: bool, timestamp: u64) -> RecordOutcome;

    /// Classify every pending input and send exactly one reply per input,
    /// except for timestamp queries against an empty or unreadable log.
    fn dispatch_messages(&self, context: &ExecutionContext, sink: &mut dyn ReplySink)
        -> RoundStats;

    /// Recorder then dispatcher, as the host invokes them each round.
    ///
    /// The recorder outcome is folded into the dispatcher's counters.
    fn execute_round(&self, context: &ExecutionContext, sink: &mut dyn ReplySink) -> RoundStats;
}

// =============================================================================
// TESTS
// =============================================================================
