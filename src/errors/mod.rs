//! Error taxonomy and aggregation for the plotting run.
//!
//! Every failure in the run becomes a typed record with a `Severity`.
//! Fatal records propagate to `main` and abort; non-fatal records flow
//! into one `ExceptionAggregator` per run and are reported at the end.

pub mod aggregator;
pub mod entries;
pub mod kinds;
pub mod record;

pub use aggregator::ExceptionAggregator;
pub use entries::{Entry, EntrySet};
pub use kinds::{
    CommandLineErrors, ConfigFilesMissing, ErrorKind, FatalError, ImageGenerationFailed,
    LogPersistenceFailed, MailDispatchFailed, PdfGenerationFailed, PlotHasNoCurves, RunError,
    SourceCurvesMissing,
};
pub use record::{ErrorContext, Severity};
