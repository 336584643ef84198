mod common;

use std::fs;

use assert_cmd::Command;
use common::{SAMPLE_EXPORT, TestWorkspace};
use predicates::str::contains;

#[test]
fn run_produces_cleaned_output_and_summaries() {
    let ws = TestWorkspace::new();
    let input = ws.write("raw_retail.csv", SAMPLE_EXPORT);
    let out_dir = ws.path().join("outputs");

    Command::cargo_bin("retail-clean")
        .expect("binary exists")
        .args([
            "-i",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--no-charts",
        ])
        .assert()
        .success();

    let cleaned = fs::read_to_string(out_dir.join("retail_cleaned.csv")).expect("cleaned output");
    let header = cleaned.lines().next().expect("header row");
    assert!(header.contains("invoice_no"));
    assert!(header.contains("total_value"));
    assert!(header.contains("is_outlier_unit_price"));
    assert!(cleaned.contains("Ireland"));
    assert!(cleaned.contains("Unknown"));

    assert!(out_dir.join("duplicates_logged.csv").exists());
    assert!(out_dir.join("outliers_logged.csv").exists());
    assert!(out_dir.join("revenue_by_month.csv").exists());
    assert!(out_dir.join("top10_products_by_sales.csv").exists());
    assert!(out_dir.join("overall_metrics.csv").exists());
}

#[test]
fn remove_outliers_flag_shrinks_cleaned_output() {
    let ws = TestWorkspace::new();
    let input = ws.write("raw_retail.csv", SAMPLE_EXPORT);
    let kept_dir = ws.path().join("kept");
    let removed_dir = ws.path().join("removed");

    for (dir, extra) in [(&kept_dir, None), (&removed_dir, Some("--remove-outliers"))] {
        let mut args = vec![
            "-i",
            input.to_str().unwrap(),
            "-o",
            dir.to_str().unwrap(),
            "--no-charts",
        ];
        if let Some(flag) = extra {
            args.push(flag);
        }
        Command::cargo_bin("retail-clean")
            .expect("binary exists")
            .args(&args)
            .assert()
            .success();
    }

    let kept = fs::read_to_string(kept_dir.join("retail_cleaned.csv")).unwrap();
    let removed = fs::read_to_string(removed_dir.join("retail_cleaned.csv")).unwrap();
    assert_eq!(kept.lines().count(), removed.lines().count() + 1);
    assert!(removed_dir.join("outliers_logged.csv").exists());
}

#[test]
fn missing_input_fails_before_any_processing() {
    let ws = TestWorkspace::new();
    let out_dir = ws.path().join("outputs");

    Command::cargo_bin("retail-clean")
        .expect("binary exists")
        .args([
            "-i",
            ws.path().join("absent.csv").to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Input file not found"));

    assert!(!out_dir.exists());
}

#[test]
fn unknown_input_encoding_is_rejected() {
    let ws = TestWorkspace::new();
    let input = ws.write("raw_retail.csv", SAMPLE_EXPORT);

    Command::cargo_bin("retail-clean")
        .expect("binary exists")
        .args([
            "-i",
            input.to_str().unwrap(),
            "-o",
            ws.path().join("outputs").to_str().unwrap(),
            "--input-encoding",
            "klingon",
        ])
        .assert()
        .failure()
        .stderr(contains("Unknown encoding"));
}

#[test]
fn tab_delimited_input_is_supported() {
    let ws = TestWorkspace::new();
    let input = ws.write(
        "raw.tsv",
        "InvoiceNo\tInvoiceDate\tQuantity\tUnitPrice\n1\t2011-01-05\t2\t1.5\n",
    );
    let out_dir = ws.path().join("outputs");

    Command::cargo_bin("retail-clean")
        .expect("binary exists")
        .args([
            "-i",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--no-charts",
        ])
        .assert()
        .success();

    let cleaned = fs::read_to_string(out_dir.join("retail_cleaned.csv")).unwrap();
    assert!(cleaned.lines().next().unwrap().contains("total_value"));
    assert!(cleaned.contains("\"3\"")); // 2 * 1.5
}
