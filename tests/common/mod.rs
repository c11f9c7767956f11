use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use plotting_engine::config::{CommandLineArgs, PlottingConfig};

/// Fixed timestamp on a known date, offset by `hour` for ordering tests.
pub fn ts(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Write a plotting configuration CSV into `dir` and return its path.
/// Rows are `(plot_title, curve)` pairs; run time and convention are fixed.
pub fn write_config(dir: &Path, rows: &[(&str, &str)]) -> PathBuf {
    let mut contents = String::from("plot_title,curve,run_time,fwd_rate_convention\n");
    for (title, curve) in rows {
        contents.push_str(&format!("{},{},EOD,3M\n", title, curve));
    }
    let path = dir.join("plotting_config.csv");
    fs::write(&path, contents).unwrap();
    path
}

/// Parse a full argument list the way the binary would.
pub fn parse_args(args: &[&str]) -> CommandLineArgs {
    CommandLineArgs::parse(args.iter().map(|arg| arg.to_string())).unwrap()
}

/// Load a config built from `(plot_title, curve)` rows.
pub fn load_config(dir: &Path, rows: &[(&str, &str)]) -> PlottingConfig {
    let path = write_config(dir, rows);
    PlottingConfig::load(&path).unwrap()
}
