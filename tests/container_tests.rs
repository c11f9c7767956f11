mod common;

use common::ts;
use plotting_engine::error::EngineError;
use plotting_engine::errors::{
    CommandLineErrors, Entry, EntrySet, ImageGenerationFailed, PdfGenerationFailed, RunError,
    SourceCurvesMissing,
};

#[test]
fn test_add_same_name_twice_keeps_one() {
    let mut set = EntrySet::names();
    assert!(set.add_name("GBP 6M").unwrap());
    assert!(!set.add_name("GBP 6M").unwrap());
    assert_eq!(set.len(), 1);
}

#[test]
fn test_empty_name_is_noop() {
    let mut set = EntrySet::names();
    assert!(!set.add_name("").unwrap());
    assert!(set.is_empty());
}

#[test]
fn test_pair_key_uniqueness_first_wins() {
    let mut set = EntrySet::pairs();
    assert!(set.add_pair("Filepaths", "N:/config/paths.csv").unwrap());
    assert!(!set.add_pair("Filepaths", "C:/other/paths.csv").unwrap());
    assert_eq!(set.len(), 1);
    assert_eq!(set.render(), "Filepaths : N:/config/paths.csv");
}

#[test]
fn test_entries_kept_in_sorted_order() {
    let mut set = EntrySet::names();
    set.add_name("USD 3M").unwrap();
    set.add_name("EUR 6M").unwrap();
    set.add_name("GBP 1Y").unwrap();
    assert_eq!(set.render(), "EUR 6M, GBP 1Y, USD 3M");
}

#[test]
fn test_merge_is_set_union() {
    let mut left = EntrySet::names();
    left.add_name("a").unwrap();
    left.add_name("b").unwrap();
    let mut right = EntrySet::names();
    right.add_name("b").unwrap();
    right.add_name("c").unwrap();

    left.merge(&right).unwrap();
    assert_eq!(left.len(), 3);
    assert_eq!(left.render(), "a, b, c");
}

#[test]
fn test_wrong_shape_entry_rejected() {
    let mut set = EntrySet::names();
    let result = set.add(Entry::pair("key", "value"));
    assert!(matches!(result, Err(EngineError::TypeMismatch { .. })));
    assert!(set.is_empty());
}

#[test]
fn test_merge_wrong_shape_rejected() {
    let mut names = EntrySet::names();
    let pairs = EntrySet::pairs();
    assert!(matches!(
        names.merge(&pairs),
        Err(EngineError::TypeMismatch { .. })
    ));
}

#[test]
fn test_container_merge_keeps_earlier_timestamp() {
    let older = ImageGenerationFailed::new("test", "Plot A").timestamped(ts(9));
    let mut newer = ImageGenerationFailed::new("test", "Plot B").timestamped(ts(15));

    newer.merge(&older);
    let record = RunError::from(newer);
    assert_eq!(record.context().timestamp(), ts(9));
}

#[test]
fn test_container_merge_never_raises_timestamp() {
    let newer = ImageGenerationFailed::new("test", "Plot A").timestamped(ts(15));
    let mut older = ImageGenerationFailed::new("test", "Plot B").timestamped(ts(9));

    older.merge(&newer);
    let record = RunError::from(older);
    assert_eq!(record.context().timestamp(), ts(9));
}

#[test]
fn test_run_error_merge_rejects_different_kinds() {
    let mut image = RunError::from(ImageGenerationFailed::new("test", "Plot A"));
    let curves = RunError::from(SourceCurvesMissing::new("test", "USD 3M"));
    assert!(matches!(
        image.merge(curves),
        Err(EngineError::TypeMismatch { .. })
    ));
}

#[test]
fn test_command_line_errors_report_unrecognized_tokens_alone() {
    // No malformed (argument, reason) pairs, only an unknown token:
    // the record must still count as having errors.
    let mut errors = CommandLineErrors::new("test");
    errors.add_unrecognized("--frobnicate");
    assert!(errors.has_errors());
    assert_eq!(errors.error_count(), 0);
}

#[test]
fn test_command_line_granular_message_lists_both_groups() {
    let mut errors = CommandLineErrors::new("test");
    errors.add_invalid("VALUE_DATE", "'tomorrow' is not a MM/DD/YYYY date");
    errors.add_unrecognized("--frobnicate");

    let granular = errors.message(true);
    assert!(granular.contains("The following command line errors were improperly set:"));
    assert!(granular.contains("VALUE_DATE : 'tomorrow' is not a MM/DD/YYYY date"));
    assert!(granular.contains("The following arguments are invalid:"));
    assert!(granular.contains("--frobnicate"));

    assert_eq!(
        errors.message(false),
        "1 command line errors were improperly passed."
    );
}

#[test]
fn test_concise_messages_are_count_based() {
    let mut curves = SourceCurvesMissing::new("test", "USD 3M");
    curves.add_curve("EUR 6M");
    assert_eq!(
        curves.message(false),
        "2 source curves could not be found in production locations."
    );

    let pdf = PdfGenerationFailed::new("test", "output/report.pdf", "disk full");
    assert_eq!(pdf.message(false), "Failed to generate PDF.");
    assert!(pdf.message(true).contains("output/report.pdf"));
}

#[test]
fn test_granular_message_itemizes_entries() {
    let mut images = ImageGenerationFailed::new("test", "Plot B");
    images.add_title("Plot A");
    assert_eq!(
        images.message(true),
        "Failed to generate the following PNG charts: \n{Plot A, Plot B}"
    );
}
