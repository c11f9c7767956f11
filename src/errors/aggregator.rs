use tracing::warn;

use crate::errors::kinds::{ErrorKind, LogPersistenceFailed, RunError};
use crate::logfile::{LogConfig, LogWriter};

/// Per-run collector of error records, keyed by kind.
///
/// Holds at most one record per kind. Container-shaped kinds merge on
/// repeated occurrence; single-instance kinds are replaced (last write
/// wins). Backed by a `Vec` rather than a map so that cross-kind ordering
/// is exactly first-insertion order, never incidental hash order.
#[derive(Debug, Default)]
pub struct ExceptionAggregator {
    entries: Vec<RunError>,
}

impl ExceptionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. If a record of the same kind is already present, the
    /// two are merged (containers union their entries, single-instance
    /// kinds keep only the newcomer); the kind keeps its original position.
    pub fn add(&mut self, record: impl Into<RunError>) {
        let record = record.into();
        let kind = record.kind();
        match self.entries.iter_mut().find(|entry| entry.kind() == kind) {
            Some(existing) => {
                // Same kind on both sides, so the merge cannot mismatch.
                if let Err(err) = existing.merge(record) {
                    warn!(kind = kind.name(), %err, "dropped unmergeable record");
                }
            }
            None => self.entries.push(record),
        }
    }

    /// Fold another aggregator into this one, record by record.
    pub fn merge(&mut self, other: ExceptionAggregator) {
        for record in other.entries {
            self.add(record);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of distinct kinds stored, not total sub-items.
    pub fn error_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, kind: ErrorKind) -> Option<&RunError> {
        self.entries.iter().find(|entry| entry.kind() == kind)
    }

    pub fn records(&self) -> impl Iterator<Item = &RunError> {
        self.entries.iter()
    }

    /// Concise message of every stored kind, newline-joined, in the order
    /// the kinds were first inserted.
    pub fn stdout_message(&self) -> String {
        let mut message = String::new();
        for record in &self.entries {
            message.push_str(&record.message(false));
            message.push('\n');
        }
        message
    }

    /// Print the concise end-of-run summary to stdout.
    pub fn print_exception_screen(&self) {
        if self.has_errors() {
            println!("The following issues have occurred: ");
            println!("{}", self.stdout_message());
        }
    }

    /// Persist every stored record to the error log, then discard the
    /// aggregator. Consuming `self` makes the drained state final: nothing
    /// can be added after the report step.
    ///
    /// No file I/O happens at all when there are no errors or the caller
    /// suppressed logging. A write failure is returned as a
    /// `LogPersistenceFailed` record for direct console reporting; it is
    /// not re-inserted, since the log write itself already failed.
    pub fn generate_log_file(
        self,
        config: &LogConfig,
        suppress: bool,
    ) -> Option<LogPersistenceFailed> {
        if !self.has_errors() || suppress {
            return None;
        }
        let mut writer = match LogWriter::create(config) {
            Ok(writer) => writer,
            Err(err) => {
                return Some(LogPersistenceFailed::new(
                    "ExceptionAggregator::generate_log_file",
                    config.path.clone(),
                    err.to_string(),
                ))
            }
        };
        let attempted = writer.path().to_path_buf();
        for record in self.entries {
            writer.append(record);
        }
        if let Err(err) = writer.write() {
            return Some(LogPersistenceFailed::new(
                "ExceptionAggregator::generate_log_file",
                attempted,
                err.to_string(),
            ));
        }
        None
    }
}
