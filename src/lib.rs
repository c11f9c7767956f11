pub mod config;
pub mod error;
pub mod errors;
pub mod logfile;
pub mod plotter;

pub use config::{CommandLineArgs, PlotConfig, PlottingConfig};
pub use error::{EngineError, Result};
pub use errors::{ExceptionAggregator, FatalError, RunError, Severity};
pub use logfile::{LogConfig, LogWriter};
pub use plotter::PlotRunner;
