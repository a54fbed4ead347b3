use assert_cmd::Command;
use polars::prelude::{ParquetReader, SerReader};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes a short chromosome and a two-motif table of width 8
fn create_inputs(dir: &TempDir) -> (PathBuf, PathBuf) {
    let chr = dir.path().join("chrT.fasta");
    fs::write(&chr, ">chrT test\nAAAAAAAAGG\n").unwrap();
    let table = dir.path().join("P0.txt");
    fs::write(&table, "AAAAAAAA 10.0\nTTTTTTTT 5.0\n").unwrap();
    (chr, table)
}

const EXPECTED: &str = "seqname\tstart\tend\tscore\tstrand\nchrT\t1\t8\t1.00\t+\nchrT\t1\t8\t1.00\t-\n";

#[test]
fn test_report_to_stdout() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, table) = create_inputs(&tmpdir);

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn test_single_dash_flags() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, table) = create_inputs(&tmpdir);

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("-chr")
        .arg(&chr)
        .arg("-table")
        .arg(&table)
        .arg("-threads")
        .arg("2")
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn test_report_to_file() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, table) = create_inputs(&tmpdir);
    let output = tmpdir.path().join("hits.tsv");

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .arg("--output")
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(&output).unwrap(), EXPECTED);
}

#[test]
fn test_missing_table_flag_fails() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, _) = create_inputs(&tmpdir);

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--table"));
}

#[test]
fn test_malformed_table_fails() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, table) = create_inputs(&tmpdir);
    fs::write(&table, "AAAAAAAA 10.0\nTTTTTTTT five\n").unwrap();

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_missing_fasta_fails() {
    let tmpdir = TempDir::new().unwrap();
    let (_, table) = create_inputs(&tmpdir);

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(tmpdir.path().join("absent.fasta"))
        .arg("--table")
        .arg(&table)
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.fasta"));
}

#[test]
fn test_invalid_threshold_fails() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, table) = create_inputs(&tmpdir);

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .arg("--threshold")
        .arg("2")
        .assert()
        .failure();
}

#[test]
fn test_parquet_output() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, table) = create_inputs(&tmpdir);
    let output = tmpdir.path().join("hits.parquet");

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let df = ParquetReader::new(fs::File::open(&output).unwrap())
        .finish()
        .unwrap();
    assert_eq!(df.height(), 2);
    let strands = df.column("strand").unwrap().str().unwrap();
    assert_eq!(strands.get(0), Some("+"));
    assert_eq!(strands.get(1), Some("-"));
    let starts = df.column("start").unwrap().u64().unwrap();
    assert_eq!(starts.get(1), Some(1));
}

#[test]
fn test_sort_table_accepts_unsorted_input() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, table) = create_inputs(&tmpdir);
    fs::write(&table, "TTTTTTTT 5.0\nAAAAAAAA 10.0\n").unwrap();

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .arg("--sort-table")
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn test_seqname_selects_record() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, table) = create_inputs(&tmpdir);
    fs::write(&chr, ">chr1\nCCCCCCCCCC\n>chr2 second\nAAAAAAAAGG\n").unwrap();

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .arg("--seqname")
        .arg("chr2")
        .assert()
        .success()
        .stdout("seqname\tstart\tend\tscore\tstrand\nchr2\t1\t8\t1.00\t+\nchr2\t1\t8\t1.00\t-\n");

    // first record has no site
    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .assert()
        .success()
        .stdout("seqname\tstart\tend\tscore\tstrand\n");

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .arg("--seqname")
        .arg("chr9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("chr9"));
}

#[test]
fn test_receptor_label_is_logged() {
    let tmpdir = TempDir::new().unwrap();
    let (chr, table) = create_inputs(&tmpdir);

    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .env("RUST_LOG", "info")
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .arg("--receptor")
        .arg("P10589")
        .assert()
        .success()
        .stdout(EXPECTED)
        .stderr(predicate::str::contains("receptor P10589"));

    // defaults to the table file stem
    Command::cargo_bin("tfbs-scanner")
        .unwrap()
        .env("RUST_LOG", "info")
        .arg("--chr")
        .arg(&chr)
        .arg("--table")
        .arg(&table)
        .assert()
        .success()
        .stderr(predicate::str::contains("receptor P0"));
}
