use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{CommandLineArgs, PlotConfig, PlottingConfig};
use crate::error::Result;
use crate::errors::aggregator::ExceptionAggregator;
use crate::errors::kinds::{
    ImageGenerationFailed, MailDispatchFailed, PdfGenerationFailed, PlotHasNoCurves,
    SourceCurvesMissing,
};

const CONTEXT: &str = "PlotRunner::run()";

/// A loaded source curve: tenors (in years) against forward rates.
#[derive(Debug, Clone)]
pub struct Curve {
    pub name: String,
    pub tenors: Vec<f64>,
    pub rates: Vec<f64>,
}

/// Source of named curves for the value date being plotted.
pub trait CurveStore {
    /// Fetch a curve by name, or `None` when it is missing from production.
    fn load_curve(&self, name: &str) -> Option<Curve>;
}

/// Renders one plot's curves into a PNG chart.
pub trait ChartRenderer {
    /// Render the chart and return the path of the image produced.
    fn render(&mut self, plot: &PlotConfig, curves: &[Curve], output: &Path) -> Result<PathBuf>;
}

/// Lays rendered chart images out into the PDF report.
pub trait PdfComposer {
    fn compose(&mut self, images: &[PathBuf], output: &Path) -> Result<()>;
}

/// Sends the finished report to its recipients.
pub trait MailDispatcher {
    fn dispatch(&mut self, report: &Path) -> Result<()>;
}

/// Drives one run end to end: every configured plot, then the PDF, then
/// the email. Nothing in the loop aborts; every failure becomes a typed
/// record in the returned aggregator.
pub struct PlotRunner<'a> {
    args: &'a CommandLineArgs,
    config: &'a PlottingConfig,
}

impl<'a> PlotRunner<'a> {
    pub fn new(args: &'a CommandLineArgs, config: &'a PlottingConfig) -> Self {
        Self { args, config }
    }

    /// Print the run-mode banner before execution starts.
    pub fn print_start_screen(&self) {
        println!("Generating curve plots for {}.", self.args.value_date.format("%m/%d/%Y"));
        println!("Run mode: {}.", self.args.mode_string());
        println!("{} plots configured.", self.config.plots().len());
    }

    pub fn print_end_screen(&self) {
        println!("Run completed with no issues.");
    }

    pub fn run(
        &self,
        store: &dyn CurveStore,
        renderer: &mut dyn ChartRenderer,
        composer: &mut dyn PdfComposer,
        mailer: &mut dyn MailDispatcher,
    ) -> ExceptionAggregator {
        let mut aggregator = ExceptionAggregator::new();
        let mut images = Vec::new();

        for plot in self.config.plots() {
            if plot.curves.is_empty() {
                aggregator.add(PlotHasNoCurves::new(CONTEXT, &plot.title));
                continue;
            }

            let mut curves = Vec::new();
            for spec in &plot.curves {
                match store.load_curve(&spec.name) {
                    Some(curve) => curves.push(curve),
                    None => aggregator.add(SourceCurvesMissing::new(CONTEXT, &spec.name)),
                }
            }
            if curves.is_empty() {
                // Every curve was missing; already reported above.
                continue;
            }

            let output = self.args.output_dir.join(format!("{}.png", plot.title));
            match renderer.render(plot, &curves, &output) {
                Ok(image) => {
                    info!(plot = %plot.title, "rendered chart");
                    images.push(image);
                }
                Err(err) => {
                    warn!(plot = %plot.title, %err, "chart render failed");
                    aggregator.add(ImageGenerationFailed::new(CONTEXT, &plot.title));
                }
            }
        }

        if !self.args.no_pdf && !images.is_empty() {
            let report = self.args.output_dir.join("curve_report.pdf");
            match composer.compose(&images, &report) {
                Ok(()) => {
                    // Only a finished report gets mailed.
                    if !self.args.no_email {
                        if let Err(err) = mailer.dispatch(&report) {
                            warn!(%err, "mail dispatch failed");
                            aggregator.add(MailDispatchFailed::new(CONTEXT, err.to_string()));
                        }
                    }
                }
                Err(err) => {
                    warn!(%err, "PDF composition failed");
                    aggregator.add(PdfGenerationFailed::new(CONTEXT, report, err.to_string()));
                }
            }
        }

        aggregator
    }
}

/// In-memory curve store for wiring and tests.
#[derive(Debug, Default)]
pub struct StubCurveStore {
    curves: HashMap<String, Curve>,
}

impl StubCurveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, curve: Curve) {
        self.curves.insert(curve.name.clone(), curve);
    }
}

impl CurveStore for StubCurveStore {
    fn load_curve(&self, name: &str) -> Option<Curve> {
        self.curves.get(name).cloned()
    }
}

/// Renderer stand-in: records what would have been rendered and succeeds.
#[derive(Debug, Default)]
pub struct StubRenderer {
    rendered: Vec<String>,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> &[String] {
        &self.rendered
    }
}

impl ChartRenderer for StubRenderer {
    fn render(&mut self, plot: &PlotConfig, _curves: &[Curve], output: &Path) -> Result<PathBuf> {
        self.rendered.push(plot.title.clone());
        Ok(output.to_path_buf())
    }
}

/// Composer stand-in: counts pages and succeeds.
#[derive(Debug, Default)]
pub struct StubComposer {
    composed: usize,
}

impl StubComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn composed(&self) -> usize {
        self.composed
    }
}

impl PdfComposer for StubComposer {
    fn compose(&mut self, images: &[PathBuf], _output: &Path) -> Result<()> {
        self.composed = images.len();
        Ok(())
    }
}

/// Mailer stand-in: records the dispatch and succeeds.
#[derive(Debug, Default)]
pub struct StubMailer {
    dispatched: Vec<PathBuf>,
}

impl StubMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> &[PathBuf] {
        &self.dispatched
    }
}

impl MailDispatcher for StubMailer {
    fn dispatch(&mut self, report: &Path) -> Result<()> {
        self.dispatched.push(report.to_path_buf());
        Ok(())
    }
}
