use std::path::{Path, PathBuf};
use std::process;

use chrono::NaiveDateTime;

use crate::error::{EngineError, Result};
use crate::errors::entries::{Entry, EntrySet};
use crate::errors::record::{ErrorContext, Severity};

/// Closed enumeration of every error kind the run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    CommandLine,
    ConfigMissing,
    ImageGeneration,
    PdfGeneration,
    CurvesMissing,
    PlotWithoutCurves,
    MailDispatch,
    LogPersistence,
}

impl ErrorKind {
    pub fn severity(self) -> Severity {
        match self {
            ErrorKind::CommandLine | ErrorKind::ConfigMissing => Severity::Fatal,
            _ => Severity::NonFatal,
        }
    }

    /// Container-shaped kinds hold a deduplicated set of sub-items and merge
    /// on repeated occurrence; the rest are single-instance, last write wins.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ErrorKind::CommandLine
                | ErrorKind::ConfigMissing
                | ErrorKind::ImageGeneration
                | ErrorKind::CurvesMissing
                | ErrorKind::PlotWithoutCurves
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::CommandLine => "CommandLineErrors",
            ErrorKind::ConfigMissing => "ConfigFilesMissing",
            ErrorKind::ImageGeneration => "ImageGenerationFailed",
            ErrorKind::PdfGeneration => "PdfGenerationFailed",
            ErrorKind::CurvesMissing => "SourceCurvesMissing",
            ErrorKind::PlotWithoutCurves => "PlotHasNoCurves",
            ErrorKind::MailDispatch => "MailDispatchFailed",
            ErrorKind::LogPersistence => "LogPersistenceFailed",
        }
    }
}

/// Fatal: one or more command-line arguments were malformed or unrecognized.
///
/// Malformed arguments collect as `(argument, reason)` pairs; tokens the
/// parser does not recognize at all collect in a separate name list. The
/// record reports errors when either list is non-empty.
#[derive(Debug, Clone)]
pub struct CommandLineErrors {
    ctx: ErrorContext,
    invalid: EntrySet,
    unrecognized: EntrySet,
}

impl CommandLineErrors {
    pub fn new(calling_context: impl Into<String>) -> Self {
        Self {
            ctx: ErrorContext::new(calling_context, ""),
            invalid: EntrySet::pairs(),
            unrecognized: EntrySet::names(),
        }
    }

    /// Record a recognized argument that carried a bad value.
    pub fn add_invalid(&mut self, argument: impl Into<String>, reason: impl Into<String>) {
        self.invalid.insert(Entry::pair(argument, reason));
    }

    /// Record a token the parser did not recognize.
    pub fn add_unrecognized(&mut self, token: impl Into<String>) {
        self.unrecognized.insert(Entry::Name(token.into()));
    }

    pub fn invalid(&self) -> &EntrySet {
        &self.invalid
    }

    pub fn unrecognized(&self) -> &EntrySet {
        &self.unrecognized
    }

    pub fn has_errors(&self) -> bool {
        !self.invalid.is_empty() || !self.unrecognized.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.invalid.len()
    }

    pub fn merge(&mut self, other: &CommandLineErrors) {
        self.invalid.union(&other.invalid);
        self.unrecognized.union(&other.unrecognized);
        self.ctx.lower_timestamp(other.ctx.timestamp());
    }

    /// Construction-time timestamp override, for failures observed earlier.
    pub fn timestamped(mut self, timestamp: NaiveDateTime) -> Self {
        self.ctx.set_timestamp(timestamp);
        self
    }

    pub fn message(&self, granular: bool) -> String {
        if !granular {
            return format!(
                "{} command line errors were improperly passed.",
                self.error_count()
            );
        }
        let mut message = String::new();
        if !self.invalid.is_empty() {
            let pairs = self
                .invalid
                .iter()
                .map(Entry::render)
                .collect::<Vec<_>>()
                .join(",\n");
            message.push_str(&format!(
                "The following command line errors were improperly set: \n{{ {} }}",
                pairs
            ));
        }
        if !self.unrecognized.is_empty() {
            if !message.is_empty() {
                message.push('\n');
            }
            message.push_str(&format!(
                "The following arguments are invalid: \n{{ {} }}",
                self.unrecognized.render()
            ));
        }
        message
    }
}

/// Fatal: one or more configuration files could not be loaded.
/// Collects `(config name, path)` pairs, unique by name.
#[derive(Debug, Clone)]
pub struct ConfigFilesMissing {
    ctx: ErrorContext,
    missing: EntrySet,
}

impl ConfigFilesMissing {
    pub fn new(
        calling_context: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let mut record = Self::empty(calling_context);
        record.add_missing(name, path);
        record
    }

    pub fn empty(calling_context: impl Into<String>) -> Self {
        Self {
            ctx: ErrorContext::new(calling_context, ""),
            missing: EntrySet::pairs(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.ctx = ErrorContext::at(
            self.ctx.calling_context().to_string(),
            detail,
            self.ctx.timestamp(),
        );
        self
    }

    pub fn add_missing(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.missing.insert(Entry::pair(name, path));
    }

    pub fn missing(&self) -> &EntrySet {
        &self.missing
    }

    pub fn has_errors(&self) -> bool {
        !self.missing.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.missing.len()
    }

    pub fn merge(&mut self, other: &ConfigFilesMissing) {
        self.missing.union(&other.missing);
        self.ctx.lower_timestamp(other.ctx.timestamp());
    }

    /// Construction-time timestamp override, for failures observed earlier.
    pub fn timestamped(mut self, timestamp: NaiveDateTime) -> Self {
        self.ctx.set_timestamp(timestamp);
        self
    }

    pub fn message(&self, granular: bool) -> String {
        if granular {
            let pairs = self
                .missing
                .iter()
                .map(Entry::render)
                .collect::<Vec<_>>()
                .join(",\n");
            format!(
                "The following configuration files could not be loaded: \n{{ {} }}",
                pairs
            )
        } else {
            format!(
                "{} configuration files could not be loaded.",
                self.error_count()
            )
        }
    }
}

/// NonFatal: one or more PNG charts failed to render.
/// Collects the titles of the failed plots, unique.
#[derive(Debug, Clone)]
pub struct ImageGenerationFailed {
    ctx: ErrorContext,
    titles: EntrySet,
}

impl ImageGenerationFailed {
    pub fn new(calling_context: impl Into<String>, plot_title: impl Into<String>) -> Self {
        let mut record = Self {
            ctx: ErrorContext::new(calling_context, ""),
            titles: EntrySet::names(),
        };
        record.add_title(plot_title);
        record
    }

    pub fn add_title(&mut self, plot_title: impl Into<String>) {
        self.titles.insert(Entry::Name(plot_title.into()));
    }

    pub fn titles(&self) -> &EntrySet {
        &self.titles
    }

    pub fn error_count(&self) -> usize {
        self.titles.len()
    }

    pub fn merge(&mut self, other: &ImageGenerationFailed) {
        self.titles.union(&other.titles);
        self.ctx.lower_timestamp(other.ctx.timestamp());
    }

    /// Construction-time timestamp override, for failures observed earlier.
    pub fn timestamped(mut self, timestamp: NaiveDateTime) -> Self {
        self.ctx.set_timestamp(timestamp);
        self
    }

    pub fn message(&self, granular: bool) -> String {
        if granular {
            format!(
                "Failed to generate the following PNG charts: \n{{{}}}",
                self.titles.render()
            )
        } else {
            format!("Failed to generate {} PNGs.", self.error_count())
        }
    }
}

/// NonFatal: the PDF report could not be produced. Single-instance; a
/// repeated occurrence replaces the previous one.
#[derive(Debug, Clone)]
pub struct PdfGenerationFailed {
    ctx: ErrorContext,
    path: PathBuf,
}

impl PdfGenerationFailed {
    pub fn new(
        calling_context: impl Into<String>,
        path: impl Into<PathBuf>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            ctx: ErrorContext::new(calling_context, detail),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Construction-time timestamp override, for failures observed earlier.
    pub fn timestamped(mut self, timestamp: NaiveDateTime) -> Self {
        self.ctx.set_timestamp(timestamp);
        self
    }

    pub fn message(&self, granular: bool) -> String {
        if granular {
            format!("Failed to generate PDF at path: \n{{{}}}", self.path.display())
        } else {
            "Failed to generate PDF.".to_string()
        }
    }
}

/// NonFatal: source curves referenced by the configuration could not be
/// found. Collects curve names, unique across every plot that wanted them.
#[derive(Debug, Clone)]
pub struct SourceCurvesMissing {
    ctx: ErrorContext,
    curves: EntrySet,
}

impl SourceCurvesMissing {
    pub fn new(calling_context: impl Into<String>, curve: impl Into<String>) -> Self {
        let mut record = Self {
            ctx: ErrorContext::new(calling_context, ""),
            curves: EntrySet::names(),
        };
        record.add_curve(curve);
        record
    }

    pub fn add_curve(&mut self, curve: impl Into<String>) {
        self.curves.insert(Entry::Name(curve.into()));
    }

    pub fn curves(&self) -> &EntrySet {
        &self.curves
    }

    pub fn error_count(&self) -> usize {
        self.curves.len()
    }

    pub fn merge(&mut self, other: &SourceCurvesMissing) {
        self.curves.union(&other.curves);
        self.ctx.lower_timestamp(other.ctx.timestamp());
    }

    /// Construction-time timestamp override, for failures observed earlier.
    pub fn timestamped(mut self, timestamp: NaiveDateTime) -> Self {
        self.ctx.set_timestamp(timestamp);
        self
    }

    pub fn message(&self, granular: bool) -> String {
        if granular {
            format!(
                "The following source curves are missing from production: {{ {} }}",
                self.curves.render()
            )
        } else {
            format!(
                "{} source curves could not be found in production locations.",
                self.error_count()
            )
        }
    }
}

/// NonFatal: a configured plot had no curves attached to it at all.
#[derive(Debug, Clone)]
pub struct PlotHasNoCurves {
    ctx: ErrorContext,
    titles: EntrySet,
}

impl PlotHasNoCurves {
    pub fn new(calling_context: impl Into<String>, plot_title: impl Into<String>) -> Self {
        let mut record = Self {
            ctx: ErrorContext::new(calling_context, ""),
            titles: EntrySet::names(),
        };
        record.add_title(plot_title);
        record
    }

    pub fn add_title(&mut self, plot_title: impl Into<String>) {
        self.titles.insert(Entry::Name(plot_title.into()));
    }

    pub fn titles(&self) -> &EntrySet {
        &self.titles
    }

    pub fn error_count(&self) -> usize {
        self.titles.len()
    }

    pub fn merge(&mut self, other: &PlotHasNoCurves) {
        self.titles.union(&other.titles);
        self.ctx.lower_timestamp(other.ctx.timestamp());
    }

    /// Construction-time timestamp override, for failures observed earlier.
    pub fn timestamped(mut self, timestamp: NaiveDateTime) -> Self {
        self.ctx.set_timestamp(timestamp);
        self
    }

    pub fn message(&self, granular: bool) -> String {
        if granular {
            format!(
                "The following plots had no curves in the configuration: \n{{{}}}",
                self.titles.render()
            )
        } else {
            format!(
                "{} plots had no curves added to configuration.",
                self.error_count()
            )
        }
    }
}

/// NonFatal: the report email could not be dispatched. Single-instance.
#[derive(Debug, Clone)]
pub struct MailDispatchFailed {
    ctx: ErrorContext,
}

impl MailDispatchFailed {
    pub fn new(calling_context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            ctx: ErrorContext::new(calling_context, detail),
        }
    }

    /// Construction-time timestamp override, for failures observed earlier.
    pub fn timestamped(mut self, timestamp: NaiveDateTime) -> Self {
        self.ctx.set_timestamp(timestamp);
        self
    }

    pub fn message(&self, granular: bool) -> String {
        if granular {
            format!("Mail error: {}", self.ctx.detail())
        } else {
            "The report email failed to send.".to_string()
        }
    }
}

/// NonFatal: the error log itself could not be written. Single-instance;
/// reported straight to the console since it cannot be re-logged.
#[derive(Debug, Clone)]
pub struct LogPersistenceFailed {
    ctx: ErrorContext,
    path: PathBuf,
}

impl LogPersistenceFailed {
    pub fn new(
        calling_context: impl Into<String>,
        path: impl Into<PathBuf>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            ctx: ErrorContext::new(calling_context, detail),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Construction-time timestamp override, for failures observed earlier.
    pub fn timestamped(mut self, timestamp: NaiveDateTime) -> Self {
        self.ctx.set_timestamp(timestamp);
        self
    }

    pub fn message(&self, granular: bool) -> String {
        if granular {
            let mut message = format!("Log file could not be generated at \n{}", self.path.display());
            if !self.ctx.detail().is_empty() {
                message.push_str(&format!("\nreason: {}", self.ctx.detail()));
            }
            message
        } else {
            "The log file could not be generated.".to_string()
        }
    }
}

/// Tagged union over every concrete error record. Severity and container
/// shape are derived from the kind rather than an inheritance hierarchy.
#[derive(Debug, Clone)]
pub enum RunError {
    CommandLine(CommandLineErrors),
    ConfigMissing(ConfigFilesMissing),
    ImageGeneration(ImageGenerationFailed),
    PdfGeneration(PdfGenerationFailed),
    CurvesMissing(SourceCurvesMissing),
    PlotWithoutCurves(PlotHasNoCurves),
    MailDispatch(MailDispatchFailed),
    LogPersistence(LogPersistenceFailed),
}

impl RunError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::CommandLine(_) => ErrorKind::CommandLine,
            RunError::ConfigMissing(_) => ErrorKind::ConfigMissing,
            RunError::ImageGeneration(_) => ErrorKind::ImageGeneration,
            RunError::PdfGeneration(_) => ErrorKind::PdfGeneration,
            RunError::CurvesMissing(_) => ErrorKind::CurvesMissing,
            RunError::PlotWithoutCurves(_) => ErrorKind::PlotWithoutCurves,
            RunError::MailDispatch(_) => ErrorKind::MailDispatch,
            RunError::LogPersistence(_) => ErrorKind::LogPersistence,
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind().severity()
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            RunError::CommandLine(record) => &record.ctx,
            RunError::ConfigMissing(record) => &record.ctx,
            RunError::ImageGeneration(record) => &record.ctx,
            RunError::PdfGeneration(record) => &record.ctx,
            RunError::CurvesMissing(record) => &record.ctx,
            RunError::PlotWithoutCurves(record) => &record.ctx,
            RunError::MailDispatch(record) => &record.ctx,
            RunError::LogPersistence(record) => &record.ctx,
        }
    }

    pub fn has_errors(&self) -> bool {
        match self {
            RunError::CommandLine(record) => record.has_errors(),
            RunError::ConfigMissing(record) => record.has_errors(),
            RunError::ImageGeneration(record) => record.error_count() > 0,
            RunError::CurvesMissing(record) => record.error_count() > 0,
            RunError::PlotWithoutCurves(record) => record.error_count() > 0,
            RunError::PdfGeneration(_) | RunError::MailDispatch(_) | RunError::LogPersistence(_) => {
                true
            }
        }
    }

    /// Concise (count-based, one line) or granular (full itemized) message.
    pub fn message(&self, granular: bool) -> String {
        match self {
            RunError::CommandLine(record) => record.message(granular),
            RunError::ConfigMissing(record) => record.message(granular),
            RunError::ImageGeneration(record) => record.message(granular),
            RunError::PdfGeneration(record) => record.message(granular),
            RunError::CurvesMissing(record) => record.message(granular),
            RunError::PlotWithoutCurves(record) => record.message(granular),
            RunError::MailDispatch(record) => record.message(granular),
            RunError::LogPersistence(record) => record.message(granular),
        }
    }

    /// Merge a same-kind record into this one. Container kinds union their
    /// entries and keep the earlier timestamp; single-instance kinds are
    /// replaced wholesale, last write wins. Mismatched kinds are rejected.
    pub fn merge(&mut self, other: RunError) -> Result<()> {
        match (self, other) {
            (RunError::CommandLine(this), RunError::CommandLine(other)) => this.merge(&other),
            (RunError::ConfigMissing(this), RunError::ConfigMissing(other)) => this.merge(&other),
            (RunError::ImageGeneration(this), RunError::ImageGeneration(other)) => {
                this.merge(&other)
            }
            (RunError::CurvesMissing(this), RunError::CurvesMissing(other)) => this.merge(&other),
            (RunError::PlotWithoutCurves(this), RunError::PlotWithoutCurves(other)) => {
                this.merge(&other)
            }
            (this @ RunError::PdfGeneration(_), other @ RunError::PdfGeneration(_))
            | (this @ RunError::MailDispatch(_), other @ RunError::MailDispatch(_))
            | (this @ RunError::LogPersistence(_), other @ RunError::LogPersistence(_)) => {
                *this = other;
            }
            (this, other) => {
                return Err(EngineError::TypeMismatch {
                    expected: this.kind().name(),
                    found: other.kind().name(),
                })
            }
        }
        Ok(())
    }
}

impl From<CommandLineErrors> for RunError {
    fn from(record: CommandLineErrors) -> Self {
        RunError::CommandLine(record)
    }
}

impl From<ConfigFilesMissing> for RunError {
    fn from(record: ConfigFilesMissing) -> Self {
        RunError::ConfigMissing(record)
    }
}

impl From<ImageGenerationFailed> for RunError {
    fn from(record: ImageGenerationFailed) -> Self {
        RunError::ImageGeneration(record)
    }
}

impl From<PdfGenerationFailed> for RunError {
    fn from(record: PdfGenerationFailed) -> Self {
        RunError::PdfGeneration(record)
    }
}

impl From<SourceCurvesMissing> for RunError {
    fn from(record: SourceCurvesMissing) -> Self {
        RunError::CurvesMissing(record)
    }
}

impl From<PlotHasNoCurves> for RunError {
    fn from(record: PlotHasNoCurves) -> Self {
        RunError::PlotWithoutCurves(record)
    }
}

impl From<MailDispatchFailed> for RunError {
    fn from(record: MailDispatchFailed) -> Self {
        RunError::MailDispatch(record)
    }
}

impl From<LogPersistenceFailed> for RunError {
    fn from(record: LogPersistenceFailed) -> Self {
        RunError::LogPersistence(record)
    }
}

/// The fatal subset. Raised at the orchestration boundary and handled by the
/// binary; `handle_and_exit` is the only path that terminates the process.
#[derive(Debug, Clone)]
pub enum FatalError {
    CommandLine(CommandLineErrors),
    ConfigMissing(ConfigFilesMissing),
}

impl FatalError {
    pub fn message(&self, granular: bool) -> String {
        match self {
            FatalError::CommandLine(record) => record.message(granular),
            FatalError::ConfigMissing(record) => record.message(granular),
        }
    }

    /// The fixed banner printed ahead of every fatal message.
    pub fn banner() -> String {
        let rule = "#".repeat(68);
        format!("{}\n# Fatal Error: \n{}", rule, rule)
    }

    /// Print the banner and message to stdout, then terminate the process.
    pub fn handle_and_exit(&self, granular: bool) -> ! {
        println!("{}", Self::banner());
        println!("{}", self.message(granular));
        println!("Exiting application.");
        process::exit(1)
    }
}

impl From<FatalError> for RunError {
    fn from(fatal: FatalError) -> Self {
        match fatal {
            FatalError::CommandLine(record) => RunError::CommandLine(record),
            FatalError::ConfigMissing(record) => RunError::ConfigMissing(record),
        }
    }
}
