//! # File Timestamp Log
//!
//! Production `TimestampLog`: a flat text file of `ts:<decimal>\n` records,
//! relative to the host working directory unless configured otherwise.
//!
//! Every call is a full open → lock → access → unlock → close sequence, so no
//! handle outlives a round.

use std::fs::{File, OpenOptions};
use std::io::{self, IoSlice, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::lock::LogLock;
use crate::domain::value_objects::{TimestampRecord, DEFAULT_LOG_FILE};
use crate::errors::LogError;
use crate::ports::outbound::TimestampLog;

/// File-backed timestamp log.
#[derive(Debug, Clone)]
pub struct FileTimestampLog {
    path: PathBuf,
}

impl FileTimestampLog {
    /// Creates a log handle for `path`. Nothing is opened until first use.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Log location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_for_append(&self) -> Result<File, LogError> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        options.open(&self.path).map_err(|source| LogError::Open {
            path: self.path.clone(),
            source,
        })
    }
}

impl Default for FileTimestampLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}

impl TimestampLog for FileTimestampLog {
    fn append(&self, record: &TimestampRecord) -> Result<(), LogError> {
        let file = self.open_for_append()?;
        let _lock = LogLock::exclusive(&file, &self.path)?;
        write_record(&file, record)?;
        debug!(
            path = %self.path.display(),
            timestamp = record.timestamp(),
            "[echo] appended timestamp record"
        );
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<u8>, LogError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LogError::Open {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let _lock = LogLock::shared(&file, &self.path)?;
        let mut contents = Vec::new();
        (&file).read_to_end(&mut contents).map_err(LogError::Read)?;
        Ok(contents)
    }
}

/// Writes both record segments with vectored writes.
///
/// Normally a single `write_vectored` call lands the whole record. A short
/// write is continued from where it stopped. A write that accepts nothing, or
/// an error after part of the record landed, is reported as `ShortWrite`: the
/// log then ends in a torn record.
fn write_record<W: Write>(mut out: W, record: &TimestampRecord) -> Result<(), LogError> {
    let [prefix, body] = record.segments();
    let mut slices = [IoSlice::new(prefix), IoSlice::new(body)];
    let mut remaining: &mut [IoSlice<'_>] = &mut slices;
    let expected = record.len();
    let mut written = 0;

    while !remaining.is_empty() {
        match out.write_vectored(remaining) {
            Ok(0) => return Err(LogError::ShortWrite { written, expected }),
            Ok(n) => {
                written += n;
                IoSlice::advance_slices(&mut remaining, n);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) if written == 0 => return Err(LogError::Write(e)),
            Err(e) => {
                debug!(error = %e, written, expected, "[echo] record write failed mid-record");
                return Err(LogError::ShortWrite { written, expected });
            }
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn log_in(dir: &tempfile::TempDir) -> FileTimestampLog {
        FileTimestampLog::new(dir.path().join("exects.txt"))
    }

    #[test]
    fn test_append_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        assert!(!log.path().exists());

        log.append(&TimestampRecord::new(100)).unwrap();

        assert!(log.path().exists());
        assert_eq!(std::fs::read(log.path()).unwrap(), b"ts:100\n");
    }

    #[test]
    fn test_append_is_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        std::fs::write(log.path(), b"ts:1\n").unwrap();

        log.append(&TimestampRecord::new(2)).unwrap();
        log.append(&TimestampRecord::new(3)).unwrap();

        assert_eq!(log.read_all().unwrap(), b"ts:1\nts:2\nts:3\n");
    }

    #[test]
    fn test_read_absent_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        assert!(log.read_all().unwrap().is_empty());
        // Reading never creates the file
        assert!(!log.path().exists());
    }

    #[test]
    fn test_append_to_directory_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileTimestampLog::new(dir.path());

        let err = log.append(&TimestampRecord::new(1)).unwrap_err();
        assert!(matches!(err, LogError::Open { .. }));
        assert!(err.is_before_write());
    }

    #[test]
    fn test_append_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileTimestampLog::new(dir.path().join("missing").join("exects.txt"));
        assert!(matches!(
            log.append(&TimestampRecord::new(1)),
            Err(LogError::Open { .. })
        ));
    }

    #[test]
    fn test_read_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileTimestampLog::new(dir.path());
        assert!(log.read_all().is_err());
    }

    #[test]
    fn test_default_path() {
        assert_eq!(FileTimestampLog::default().path(), Path::new("exects.txt"));
    }

    #[test]
    fn test_concurrent_appends_keep_records_whole() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(log_in(&dir));

        let handles: Vec<_> = (0..8u64)
            .map(|worker| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..50u64 {
                        log.append(&TimestampRecord::new(worker * 1_000 + i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = String::from_utf8(log.read_all().unwrap()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 400);
        for line in lines {
            let digits = line.strip_prefix("ts:").expect("record prefix");
            assert!(digits.parse::<u64>().is_ok(), "malformed record {line:?}");
        }
    }

    /// Writer that accepts at most `chunk` bytes per call.
    struct Trickle {
        out: Vec<u8>,
        chunk: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk);
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_short_writes_are_continued() {
        let mut out = Trickle {
            out: Vec::new(),
            chunk: 2,
        };
        write_record(&mut out, &TimestampRecord::new(123_456)).unwrap();
        assert_eq!(out.out, b"ts:123456\n");
    }

    #[test]
    fn test_stalled_write_reported() {
        let mut out = Trickle {
            out: Vec::new(),
            chunk: 0,
        };
        let err = write_record(&mut out, &TimestampRecord::new(7)).unwrap_err();
        assert!(matches!(
            err,
            LogError::ShortWrite {
                written: 0,
                expected: 5
            }
        ));
    }

    /// Writer that accepts `budget` bytes in total, then fails.
    struct FailsAfter {
        out: Vec<u8>,
        budget: usize,
    }

    impl Write for FailsAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::other("device full"));
            }
            let n = buf.len().min(self.budget);
            self.out.extend_from_slice(&buf[..n]);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failure_mid_record_reports_bytes_written() {
        let mut out = FailsAfter {
            out: Vec::new(),
            budget: 4,
        };
        let err = write_record(&mut out, &TimestampRecord::new(99)).unwrap_err();
        assert!(matches!(
            err,
            LogError::ShortWrite {
                written: 4,
                expected: 6
            }
        ));
        assert_eq!(out.out, b"ts:9");
    }

    #[test]
    fn test_failure_before_any_byte_is_write_error() {
        let mut out = FailsAfter {
            out: Vec::new(),
            budget: 0,
        };
        let err = write_record(&mut out, &TimestampRecord::new(99)).unwrap_err();
        assert!(matches!(err, LogError::Write(_)));
        assert!(out.out.is_empty());
    }
}
