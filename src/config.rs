use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::errors::kinds::{CommandLineErrors, ConfigFilesMissing, FatalError};

const DATE_FORMAT: &str = "%m/%d/%Y";
const CONFIG_FILE_NAME: &str = "Plotting Configuration";

/// Parsed command-line inputs for one run.
///
/// Parsing is done by hand rather than with a derive-style parser so that
/// every bad argument is collected into one fatal `CommandLineErrors`
/// record instead of failing on the first.
#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    /// Value date the curves are plotted for.
    pub value_date: NaiveDate,
    pub config_path: PathBuf,
    pub curve_dir: PathBuf,
    pub output_dir: PathBuf,
    pub no_pdf: bool,
    pub no_email: bool,
    pub no_log: bool,
    pub uat_mode: bool,
}

impl CommandLineArgs {
    /// Parse arguments (program name already stripped). Accumulates every
    /// malformed value and unrecognized token before failing.
    pub fn parse<I>(args: I) -> Result<Self, FatalError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut errors = CommandLineErrors::new("CommandLineArgs::parse()");
        let mut value_date = None;
        let mut config_path = PathBuf::from("config/plotting_config.csv");
        let mut curve_dir = PathBuf::from("curves");
        let mut output_dir = PathBuf::from("output");
        let mut no_pdf = false;
        let mut no_email = false;
        let mut no_log = false;
        let mut uat_mode = false;

        let mut args = args.into_iter().peekable();
        while let Some(token) = args.next() {
            match token.as_str() {
                "--nopdf" => no_pdf = true,
                "--noemail" => no_email = true,
                "--nolog" => no_log = true,
                "--uat" => uat_mode = true,
                "--config" => match next_value(&mut args) {
                    Some(value) => config_path = PathBuf::from(value),
                    None => errors.add_invalid("--config", "expected a file path value"),
                },
                "--curvedir" => match next_value(&mut args) {
                    Some(value) => curve_dir = PathBuf::from(value),
                    None => errors.add_invalid("--curvedir", "expected a directory value"),
                },
                "--outdir" => match next_value(&mut args) {
                    Some(value) => output_dir = PathBuf::from(value),
                    None => errors.add_invalid("--outdir", "expected a directory value"),
                },
                flag if flag.starts_with("--") => errors.add_unrecognized(token.clone()),
                _ if value_date.is_none() => {
                    match NaiveDate::parse_from_str(&token, DATE_FORMAT) {
                        Ok(date) => value_date = Some(date),
                        Err(_) => errors.add_invalid(
                            "VALUE_DATE",
                            format!("'{}' is not a MM/DD/YYYY date", token),
                        ),
                    }
                }
                _ => errors.add_unrecognized(token.clone()),
            }
        }

        let value_date = match value_date {
            Some(date) => date,
            None => {
                if !errors.invalid().contains_key("VALUE_DATE") {
                    errors.add_invalid("VALUE_DATE", "required argument missing");
                }
                return Err(FatalError::CommandLine(errors));
            }
        };

        if errors.has_errors() {
            return Err(FatalError::CommandLine(errors));
        }

        Ok(Self {
            value_date,
            config_path,
            curve_dir,
            output_dir,
            no_pdf,
            no_email,
            no_log,
            uat_mode,
        })
    }

    /// Human-readable description of the run mode for the start screen.
    pub fn mode_string(&self) -> String {
        let mut modes = Vec::new();
        if self.uat_mode {
            modes.push("UAT");
        }
        if self.no_pdf {
            modes.push("no PDF");
        }
        if self.no_email {
            modes.push("no email");
        }
        if self.no_log {
            modes.push("no log file");
        }
        if modes.is_empty() {
            "production".to_string()
        } else {
            modes.join(", ")
        }
    }
}

/// Take the next token as an option value, unless it looks like another
/// option (so `--config --nopdf` reports a missing value, not a path).
fn next_value<I>(args: &mut std::iter::Peekable<I>) -> Option<String>
where
    I: Iterator<Item = String>,
{
    match args.peek() {
        Some(token) if !token.starts_with("--") => args.next(),
        _ => None,
    }
}

/// One row of the plotting configuration CSV.
#[derive(Debug, Deserialize)]
struct ConfigRow {
    plot_title: String,
    curve: String,
    run_time: String,
    fwd_rate_convention: String,
}

/// One curve requested by a plot.
#[derive(Debug, Clone)]
pub struct CurveSpec {
    pub name: String,
    pub run_time: String,
    pub fwd_rate_convention: String,
}

/// One configured plot: a title and the curves it draws.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub title: String,
    pub curves: Vec<CurveSpec>,
}

/// The full plotting configuration, plots in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct PlottingConfig {
    plots: Vec<PlotConfig>,
}

impl PlottingConfig {
    /// Load the configuration CSV. A missing or unreadable file is fatal:
    /// nothing can be plotted without the configuration.
    pub fn load(path: &Path) -> Result<Self, FatalError> {
        if !path.exists() {
            return Err(FatalError::ConfigMissing(ConfigFilesMissing::new(
                "PlottingConfig::load()",
                CONFIG_FILE_NAME,
                path.display().to_string(),
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|err| Self::unreadable(path, err))?;

        let mut config = Self::default();
        for result in reader.deserialize::<ConfigRow>() {
            let row = result.map_err(|err| Self::unreadable(path, err))?;
            if row.plot_title.is_empty() {
                warn!("skipping configuration row with no plot title");
                continue;
            }
            config.add_row(row);
        }
        Ok(config)
    }

    fn unreadable(path: &Path, err: csv::Error) -> FatalError {
        FatalError::ConfigMissing(
            ConfigFilesMissing::new(
                "PlottingConfig::load()",
                CONFIG_FILE_NAME,
                path.display().to_string(),
            )
            .with_detail(err.to_string()),
        )
    }

    /// Group a row under its plot, registering the plot on first sight so
    /// plot order follows the file. A row with a blank curve still
    /// registers the plot; the run reports it as a plot with no curves.
    fn add_row(&mut self, row: ConfigRow) {
        let index = match self.plots.iter().position(|plot| plot.title == row.plot_title) {
            Some(index) => index,
            None => {
                self.plots.push(PlotConfig {
                    title: row.plot_title.clone(),
                    curves: Vec::new(),
                });
                self.plots.len() - 1
            }
        };
        let plot = &mut self.plots[index];
        if row.curve.is_empty() {
            return;
        }
        if plot.curves.iter().any(|spec| spec.name == row.curve) {
            return;
        }
        plot.curves.push(CurveSpec {
            name: row.curve,
            run_time: row.run_time,
            fwd_rate_convention: row.fwd_rate_convention,
        });
    }

    pub fn plots(&self) -> &[PlotConfig] {
        &self.plots
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }
}
