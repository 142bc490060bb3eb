mod common;

use common::{Fixture, Row};
use regex::Regex;
use std::path::Path;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_steerstat"))
        .args(args)
        .output()
        .expect("failed to launch steerstat")
}

fn permute(input: &Path, extra: &[&str]) -> Output {
    let mut args = vec![
        "permute",
        "--input",
        input.to_str().unwrap(),
        "--permutations",
        "200",
        "--seed",
        "42",
    ];
    args.extend_from_slice(extra);
    run(&args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn missing_input_exits_non_zero() {
    let output = run(&["permute", "--input", "/no/such/trials.csv"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Input file not found"), "stderr: {}", stderr);
}

#[test]
fn permute_reports_every_statistic() {
    let fixture = Fixture::new(&common::sample_rows());
    let output = permute(&fixture.path, &["--danger"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    let row = Regex::new(r"\|\s*(Raw correctness – first-order|Raw correctness – second-order|Valid generalization \(subj-mean\)|Danger alignment – updown|Danger alignment – leftright)\s*\|\s*(\S+)\s*\|\s*(\S+)\s*\|").unwrap();
    let captures: Vec<_> = row.captures_iter(&text).collect();
    assert_eq!(captures.len(), 5, "{}", text);

    let observed = Regex::new(r"^-?\d+\.\d{3}$").unwrap();
    let p_value = Regex::new(r"^[01]\.\d{4}$").unwrap();
    for cap in &captures[..3] {
        assert!(observed.is_match(&cap[2]), "observed {:?}", &cap[2]);
        assert!(p_value.is_match(&cap[3]), "p {:?}", &cap[3]);
        let p: f64 = cap[3].parse().unwrap();
        assert!(p >= 1.0 / 201.0 - 1e-4 && p <= 1.0);
    }
    assert!(text.contains("<- observed") || text.contains("outside the null range"));
}

#[test]
fn seeded_runs_print_identical_reports() {
    let fixture = Fixture::new(&common::sample_rows());
    let a = stdout(&permute(&fixture.path, &["--threads", "1"]));
    let b = stdout(&permute(&fixture.path, &["--threads", "4"]));
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn export_writes_one_row_per_iteration() {
    let fixture = Fixture::new(&common::sample_rows());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nulls.csv");
    let output = permute(&fixture.path, &["--export-null", out.to_str().unwrap()]);
    assert!(output.status.success());

    let text = std::fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("iteration,first_order_correct,second_order_correct,subject_valid")
    );
    assert_eq!(lines.count(), 200);
}

#[test]
fn analyze_prints_skip_notices_for_small_samples() {
    let fixture = Fixture::new(&[Row::new("p1", "small_car", "wad")]);
    let output = run(&["analyze", "--input", fixture.path.to_str().unwrap()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("=== MEAN proportion-correct ==="));
    assert!(text.contains("t-test skipped"));
    assert!(text.contains("Correlation skipped"));
    assert!(text.contains("OLS skipped"));
}

#[test]
fn analyze_runs_tests_with_enough_data() {
    let fixture = Fixture::new(&common::sample_rows());
    let output = run(&["analyze", "--input", fixture.path.to_str().unwrap()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("=== Participant-level correlations ==="));
    assert!(text.contains("=== Danger-aligned mistakes: updown ==="));
}

#[test]
fn unknown_scheme_is_rejected() {
    let fixture = Fixture::new(&common::sample_rows());
    let output = run(&["permute", "--input", fixture.path.to_str().unwrap(), "--scheme", "v9"]);
    assert!(!output.status.success());
}

#[test]
fn zero_histogram_bins_is_a_config_error() {
    let fixture = Fixture::new(&common::sample_rows());
    let output = permute(&fixture.path, &["--histogram-bins", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--histogram-bins"), "stderr: {}", stderr);
}
