//! # Round Integration Tests
//!
//! Runs whole rounds against the file-backed timestamp log.
//!
//! ## Covered behavior
//!
//! - Echo replies are byte-exact
//! - Non-readonly rounds append one record each, readonly rounds none
//! - Timestamp queries render the log and drop the final byte
//! - Queries before any record are silent
//! - Short payloads never classify as queries
//! - Replies fan out to their originating participant in input order

use echo_contract::prelude::*;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("echo_contract=debug")
        .with_test_writer()
        .try_init();
}

fn setup() -> (TempDir, ContractService<FileTimestampLog>) {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ContractConfig {
        log_path: dir.path().join("exects.txt"),
    };
    let service = ContractService::from_config(&config);
    (dir, service)
}

fn key(name: &str) -> ParticipantKey {
    ParticipantKey::new(name.as_bytes().to_vec())
}

#[test]
fn test_echo_is_byte_exact() {
    let (_dir, service) = setup();
    let payloads: [&[u8]; 5] = [b"hello", b"", b"t", b"\0\xff\n binary", b"Ts upper"];

    for payload in payloads {
        let ctx = ExecutionContext::new(1, true)
            .with_participant(Participant::new(key("alice")).with_input(payload));
        let mut sink = CollectingReplySink::new();

        let stats = service.execute_round(&ctx, &mut sink);

        let mut expected = b"Echoing: ".to_vec();
        expected.extend_from_slice(payload);
        assert_eq!(stats.echo_replies, 1);
        assert_eq!(sink.replies_to(&key("alice")), vec![expected.as_slice()]);
    }
}

#[test]
fn test_append_monotonicity_and_readonly() {
    let (dir, service) = setup();
    let rounds = [(100, false), (150, true), (200, false), (200, false), (300, true)];

    for (timestamp, readonly) in rounds {
        let ctx = ExecutionContext::new(timestamp, readonly);
        let stats = service.execute_round(&ctx, &mut CollectingReplySink::new());
        assert_eq!(stats.records_appended, u64::from(!readonly));
    }

    let contents = std::fs::read(dir.path().join("exects.txt")).unwrap();
    assert_eq!(contents, b"ts:100\nts:200\nts:200\n");
}

#[test]
fn test_readonly_round_creates_no_log() {
    let (dir, service) = setup();
    service.execute_round(&ExecutionContext::new(5, true), &mut CollectingReplySink::new());
    assert!(!dir.path().join("exects.txt").exists());
}

#[test]
fn test_query_transform() {
    let (dir, service) = setup();
    std::fs::write(dir.path().join("exects.txt"), b"ts:100\nts:200\n").unwrap();

    let ctx = ExecutionContext::new(300, true)
        .with_participant(Participant::new(key("bob")).with_input(b"ts".to_vec()));
    let mut sink = CollectingReplySink::new();
    service.execute_round(&ctx, &mut sink);

    let replies = sink.replies_to(&key("bob"));
    assert_eq!(replies, vec![&b"ts:100 ts:200"[..]]);
    assert_eq!(replies[0].len(), 13);
}

#[test]
fn test_query_before_any_record_is_silent() {
    let (_dir, service) = setup();
    let ctx = ExecutionContext::new(1, true)
        .with_participant(Participant::new(key("carol")).with_input(b"ts".to_vec()));
    let mut sink = CollectingReplySink::new();

    let stats = service.execute_round(&ctx, &mut sink);

    assert!(sink.replies().is_empty());
    assert_eq!(stats.queries_unanswered, 1);
}

#[test]
fn test_single_t_is_echo() {
    let (dir, service) = setup();
    std::fs::write(dir.path().join("exects.txt"), b"ts:1\n").unwrap();
    let ctx = ExecutionContext::new(1, true)
        .with_participant(Participant::new(key("dave")).with_input(b"t".to_vec()));
    let mut sink = CollectingReplySink::new();

    service.execute_round(&ctx, &mut sink);

    assert_eq!(sink.replies_to(&key("dave")), vec![&b"Echoing: t"[..]]);
}

#[test]
fn test_multi_participant_fan_out() {
    let (_dir, service) = setup();
    let ctx = ExecutionContext::new(42, false)
        .with_participant(
            Participant::new(key("alice"))
                .with_input(b"hi".to_vec())
                .with_input(b"ts".to_vec()),
        )
        .with_participant(
            Participant::new(key("bob"))
                .with_input(b"ts?".to_vec())
                .with_input(b"yo".to_vec()),
        );
    let mut sink = CollectingReplySink::new();

    let stats = service.execute_round(&ctx, &mut sink);

    assert_eq!(stats.inputs_processed, 4);
    assert_eq!(stats.replies(), 4);

    let replies = sink.into_replies();
    let addressed: Vec<(&[u8], &[u8])> = replies
        .iter()
        .map(|r| (r.to.as_bytes(), r.bytes.as_slice()))
        .collect();
    assert_eq!(
        addressed,
        vec![
            (&b"alice"[..], &b"Echoing: hi"[..]),
            (&b"alice"[..], &b"ts:42"[..]),
            (&b"bob"[..], &b"ts:42"[..]),
            (&b"bob"[..], &b"Echoing: yo"[..]),
        ]
    );
}

#[test]
fn test_unwritable_log_still_replies() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    // The log path is a directory: both append and read fail
    let service = ContractService::new(FileTimestampLog::new(dir.path()));
    let ctx = ExecutionContext::new(9, false).with_participant(
        Participant::new(key("erin"))
            .with_input(b"ts".to_vec())
            .with_input(b"still here".to_vec()),
    );
    let mut sink = CollectingReplySink::new();

    let stats = service.execute_round(&ctx, &mut sink);

    assert_eq!(stats.record_failures, 1);
    assert_eq!(stats.log_read_failures, 1);
    assert_eq!(sink.replies_to(&key("erin")), vec![&b"Echoing: still here"[..]]);
}
