use std::env;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use plotting_engine::config::{CommandLineArgs, PlottingConfig};
use plotting_engine::logfile::LogConfig;
use plotting_engine::plotter::{PlotRunner, StubComposer, StubCurveStore, StubMailer, StubRenderer};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))?;

    let args = match CommandLineArgs::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(fatal) => fatal.handle_and_exit(true),
    };

    let config = match PlottingConfig::load(&args.config_path) {
        Ok(config) => config,
        Err(fatal) => fatal.handle_and_exit(true),
    };

    let runner = PlotRunner::new(&args, &config);
    runner.print_start_screen();

    // Rendering, PDF layout, mail, and curve retrieval are external
    // collaborators; the stubs stand in until they are wired up.
    let store = StubCurveStore::new();
    let mut renderer = StubRenderer::new();
    let mut composer = StubComposer::new();
    let mut mailer = StubMailer::new();

    let aggregator = runner.run(&store, &mut renderer, &mut composer, &mut mailer);

    if aggregator.has_errors() {
        aggregator.print_exception_screen();
        let log_config = LogConfig::new("LogFile/PlottingEngine LogFile.txt", current_user());
        if let Some(failure) = aggregator.generate_log_file(&log_config, args.no_log) {
            // The log write itself failed, so this goes straight to the console.
            eprintln!("{}", failure.message(true));
        }
    } else {
        runner.print_end_screen();
    }

    Ok(())
}

/// Resolve the user once here; the log writer takes it as configuration.
fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
