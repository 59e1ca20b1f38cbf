//! # Contract Runtime
//!
//! Host-side driver for one echo contract round.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Read the host context (context file or stdin)
//! 3. Resolve participant inputs from the shared input buffer
//! 4. Execute the round against the file-backed timestamp log
//! 5. Flush replies to the output stream
//!
//! Any failure in steps 2-3 aborts before the round starts. Log I/O failures
//! inside the round are absorbed by the contract.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod host;

use std::io::Write;

use anyhow::{Context, Result};
use echo_contract::prelude::*;
use tracing::info;

use crate::config::RuntimeConfig;
use crate::host::{HostContext, JsonLinesReplySink};

/// Runs one round from a context document, writing replies to `out`.
pub fn run_round<W: Write>(config: &RuntimeConfig, context_json: &str, out: W) -> Result<RoundStats> {
    let host = HostContext::parse(context_json)?;
    let input_buffer = host
        .load_input_buffer(|path| config.resolve(path))
        .context("failed to load participant inputs")?;
    let context = host.into_execution_context(&input_buffer)?;

    let contract = config.contract_config();
    info!(log = %contract.log_path.display(), "[echo] contract log");
    let service = ContractService::from_config(&contract);

    let mut sink = JsonLinesReplySink::new(out);
    let stats = service.execute_round(&context, &mut sink);
    sink.finish().context("failed to flush replies")?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_round_writes_log_and_replies() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("in.bin"), b"hits").unwrap();
        let config = RuntimeConfig {
            workdir: Some(dir.path().to_path_buf()),
            ..RuntimeConfig::default()
        };
        let json = r#"{
            "timestamp": 77,
            "user_input_path": "in.bin",
            "users": [{ "pubkey": "aa", "inputs": [[0, 2], [2, 2]] }]
        }"#;

        let mut out = Vec::new();
        let stats = run_round(&config, json, &mut out).unwrap();

        assert_eq!(stats.records_appended, 1);
        assert_eq!(stats.echo_replies, 1);
        assert_eq!(stats.timestamp_replies, 1);
        assert_eq!(std::fs::read(dir.path().join("exects.txt")).unwrap(), b"ts:77\n");
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_run_round_rejects_bad_context() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuntimeConfig {
            workdir: Some(dir.path().to_path_buf()),
            ..RuntimeConfig::default()
        };
        let json = r#"{"timestamp": 1, "users": [{ "pubkey": "aa", "inputs": [[0, 9]] }]}"#;

        assert!(run_round(&config, json, Vec::new()).is_err());
        assert!(!dir.path().join("exects.txt").exists());
    }
}
