use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::errors::kinds::RunError;
use crate::errors::record::Severity;

/// Widest chunk of message text placed in one row of the Message column.
pub const MESSAGE_BUFFER_LEN: usize = 105;

/// Log files larger than this are left alone and a duplicate path is used.
pub const DEFAULT_MAX_BYTES: u64 = 10_000_000;

const SEPARATOR_LEN: usize = 250;

/// Everything the writer needs from the outside: the target path, the user
/// name to stamp on each row, and the rotation threshold. Injected rather
/// than read from ambient process state.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub path: PathBuf,
    pub user: String,
    pub max_bytes: u64,
}

impl LogConfig {
    pub fn new(path: impl Into<PathBuf>, user: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            user: user.into(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// Serializes one run's error records into the durable log file.
///
/// The file is rewritten whole on every run: a two-line header, this run's
/// rows, then the previous contents minus their header. New entries sit
/// ahead of old ones, so the body reads in reverse chronological order.
#[derive(Debug)]
pub struct LogWriter {
    path: PathBuf,
    user: String,
    fatal: Vec<RunError>,
    non_fatal: Vec<RunError>,
}

impl LogWriter {
    /// Resolve the target path (rotating past oversized files) and prepare
    /// a writer. Creates the parent directory if it does not exist.
    pub fn create(config: &LogConfig) -> Result<Self> {
        let path = resolve_rotated_path(&config.path, config.max_bytes);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            user: config.user.clone(),
            fatal: Vec::new(),
            non_fatal: Vec::new(),
        })
    }

    /// The path the writer will actually write to, after rotation.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue a record, grouped by severity. Within each group the rows
    /// keep the order records were appended in.
    pub fn append(&mut self, record: RunError) {
        match record.severity() {
            Severity::Fatal => self.fatal.push(record),
            Severity::NonFatal => self.non_fatal.push(record),
        }
    }

    pub fn error_count(&self) -> usize {
        self.fatal.len() + self.non_fatal.len()
    }

    /// Write the log file. A writer with no records performs no I/O and
    /// leaves any existing file untouched.
    pub fn write(&self) -> Result<()> {
        if self.error_count() == 0 {
            return Ok(());
        }

        // Prior runs' rows, minus their header and separator lines.
        let mut preserved = Vec::new();
        if self.path.exists() {
            let existing = fs::read_to_string(&self.path)?;
            preserved = existing
                .lines()
                .skip(2)
                .map(str::to_string)
                .collect::<Vec<_>>();
        }

        let mut lines = header_lines();
        for record in self.fatal.iter().chain(self.non_fatal.iter()) {
            lines.extend(self.formatted_rows(record));
        }
        lines.extend(preserved);

        let mut body = lines.join("\n");
        body.push('\n');
        debug!(path = %self.path.display(), rows = lines.len(), "writing error log");
        fs::write(&self.path, body)?;
        Ok(())
    }

    /// One row per chunk of the granular message, repeating the user,
    /// calling context, and timestamp columns on every row.
    fn formatted_rows(&self, record: &RunError) -> Vec<String> {
        let context = record.context();
        message_chunks(&record.message(true))
            .into_iter()
            .map(|chunk| {
                format_row(
                    &self.user,
                    &chunk,
                    context.calling_context(),
                    &context.timestamp_string(),
                )
            })
            .collect()
    }
}

fn header_lines() -> Vec<String> {
    vec![
        format_row("Username:", "Message:", "Calling Function:", "TimeStamp:"),
        "-".repeat(SEPARATOR_LEN),
    ]
}

fn format_row(user: &str, message: &str, calling: &str, timestamp: &str) -> String {
    format!(
        "{:<20}{:<width$}{:<60}{:<20}",
        user,
        message,
        calling,
        timestamp,
        width = MESSAGE_BUFFER_LEN + 5
    )
}

/// Split a message into rows for the fixed-width Message column: strip
/// tabs, break on embedded newlines, then re-chunk each piece into
/// segments of at most `MESSAGE_BUFFER_LEN` characters. Concatenating the
/// chunks in order loses no content beyond the stripped characters.
pub fn message_chunks(message: &str) -> Vec<String> {
    let cleaned = message.replace('\t', "");
    let mut chunks = Vec::new();
    for line in cleaned.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        for segment in chars.chunks(MESSAGE_BUFFER_LEN) {
            let chunk: String = segment.iter().collect();
            if !chunk.is_empty() {
                chunks.push(chunk);
            }
        }
    }
    chunks
}

/// Walk `path`, `path_2`, `path_3`, … and return the first whose existing
/// size does not exceed the threshold. Oversized predecessors are never
/// touched again; their contents stay intact.
fn resolve_rotated_path(path: &Path, max_bytes: u64) -> PathBuf {
    let mut candidate = path.to_path_buf();
    let mut counter = 2;
    loop {
        let oversized = fs::metadata(&candidate)
            .map(|meta| meta.len() > max_bytes)
            .unwrap_or(false);
        if !oversized {
            return candidate;
        }
        debug!(path = %candidate.display(), "log file over size threshold, rotating");
        candidate = duplicate_path(path, counter);
        counter += 1;
    }
}

/// Insert `_<n>` between the file stem and its extension.
fn duplicate_path(path: &Path, counter: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, counter, ext.to_string_lossy()),
        None => format!("{}_{}", stem, counter),
    };
    path.with_file_name(name)
}
