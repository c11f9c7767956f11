use chrono::{Local, NaiveDateTime};

/// Two-tier severity model: fatal errors abort the run immediately,
/// non-fatal errors are collected and reported at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    NonFatal,
}

/// Attributes shared by every error record: where it was raised, the
/// free-text detail that came with the underlying failure, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    calling_context: String,
    detail: String,
    timestamp: NaiveDateTime,
}

impl ErrorContext {
    /// Create a context stamped with the current local time.
    pub fn new(calling_context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::at(calling_context, detail, Local::now().naive_local())
    }

    /// Create a context with an explicit timestamp.
    pub fn at(
        calling_context: impl Into<String>,
        detail: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            calling_context: calling_context.into(),
            detail: detail.into(),
            timestamp,
        }
    }

    pub fn calling_context(&self) -> &str {
        &self.calling_context
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Render the timestamp in the log file's `MM/DD/YYYY HH:MM:SS` form.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format("%m/%d/%Y %H:%M:%S").to_string()
    }

    /// Construction-time override for failures observed earlier than they
    /// were recorded. Not exposed after construction.
    pub(crate) fn set_timestamp(&mut self, timestamp: NaiveDateTime) {
        self.timestamp = timestamp;
    }

    /// Lower the timestamp to the earlier of the two. Merges keep the
    /// earliest occurrence; the timestamp is never raised.
    pub fn lower_timestamp(&mut self, other: NaiveDateTime) {
        if other < self.timestamp {
            self.timestamp = other;
        }
    }
}
