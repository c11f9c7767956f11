mod common;

use common::{load_config, parse_args, write_config};
use plotting_engine::config::{CommandLineArgs, PlottingConfig};
use plotting_engine::errors::FatalError;
use tempfile::tempdir;

#[test]
fn test_parse_full_argument_set() {
    let args = parse_args(&[
        "03/02/2026",
        "--config",
        "cfg/plots.csv",
        "--curvedir",
        "data/curves",
        "--outdir",
        "out",
        "--nopdf",
        "--noemail",
        "--nolog",
        "--uat",
    ]);

    assert_eq!(args.value_date.format("%m/%d/%Y").to_string(), "03/02/2026");
    assert_eq!(args.config_path.to_string_lossy(), "cfg/plots.csv");
    assert_eq!(args.curve_dir.to_string_lossy(), "data/curves");
    assert_eq!(args.output_dir.to_string_lossy(), "out");
    assert!(args.no_pdf && args.no_email && args.no_log && args.uat_mode);
    assert_eq!(args.mode_string(), "UAT, no PDF, no email, no log file");
}

#[test]
fn test_parse_defaults() {
    let args = parse_args(&["03/02/2026"]);
    assert!(!args.no_pdf && !args.no_email && !args.no_log && !args.uat_mode);
    assert_eq!(args.mode_string(), "production");
}

#[test]
fn test_bad_arguments_all_collected_into_one_fatal() {
    let tokens = ["tomorrow", "--config", "--frobnicate"]
        .iter()
        .map(|token| token.to_string());

    match CommandLineArgs::parse(tokens) {
        Err(FatalError::CommandLine(errors)) => {
            assert!(errors.has_errors());
            // Bad date and missing --config value are both pair entries;
            // the unknown flag lands in the unrecognized list.
            assert_eq!(errors.invalid().len(), 2);
            assert!(errors.invalid().contains_key("VALUE_DATE"));
            assert!(errors.invalid().contains_key("--config"));
            assert_eq!(errors.unrecognized().render(), "--frobnicate");
        }
        other => panic!("expected CommandLine fatal, got {:?}", other),
    }
}

#[test]
fn test_missing_value_date_is_fatal() {
    match CommandLineArgs::parse(["--nopdf".to_string()]) {
        Err(FatalError::CommandLine(errors)) => {
            assert!(errors.invalid().contains_key("VALUE_DATE"));
        }
        other => panic!("expected CommandLine fatal, got {:?}", other),
    }
}

#[test]
fn test_config_rows_group_by_plot_in_file_order() {
    let dir = tempdir().unwrap();
    let config = load_config(
        dir.path(),
        &[
            ("GBP Forwards", "GBP 3M"),
            ("USD Forwards", "USD 3M"),
            ("GBP Forwards", "GBP 6M"),
        ],
    );

    let plots = config.plots();
    assert_eq!(plots.len(), 2);
    assert_eq!(plots[0].title, "GBP Forwards");
    assert_eq!(plots[0].curves.len(), 2);
    assert_eq!(plots[1].title, "USD Forwards");
}

#[test]
fn test_duplicate_curve_rows_kept_once() {
    let dir = tempdir().unwrap();
    let config = load_config(
        dir.path(),
        &[("GBP Forwards", "GBP 3M"), ("GBP Forwards", "GBP 3M")],
    );
    assert_eq!(config.plots()[0].curves.len(), 1);
}

#[test]
fn test_blank_curve_registers_plot_with_no_curves() {
    let dir = tempdir().unwrap();
    let config = load_config(dir.path(), &[("Empty Plot", "")]);
    assert_eq!(config.plots().len(), 1);
    assert!(config.plots()[0].curves.is_empty());
}

#[test]
fn test_missing_config_file_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nowhere.csv");

    match PlottingConfig::load(&path) {
        Err(FatalError::ConfigMissing(record)) => {
            assert!(record.has_errors());
            assert!(record.message(true).contains("nowhere.csv"));
        }
        other => panic!("expected ConfigMissing fatal, got {:?}", other),
    }
}

#[test]
fn test_unreadable_config_is_fatal_with_detail() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plotting_config.csv");
    // Header promises four columns; the row has two.
    std::fs::write(
        &path,
        "plot_title,curve,run_time,fwd_rate_convention\nGBP Forwards,GBP 3M\n",
    )
    .unwrap();

    match PlottingConfig::load(&path) {
        Err(FatalError::ConfigMissing(record)) => {
            assert!(record.message(true).contains("plotting_config.csv"));
        }
        other => panic!("expected ConfigMissing fatal, got {:?}", other),
    }
}

#[test]
fn test_write_config_helper_round_trips() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), &[("GBP Forwards", "GBP 3M")]);
    let config = PlottingConfig::load(&path).unwrap();
    assert!(!config.is_empty());
}
