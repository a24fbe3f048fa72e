//! Tests for the `legal-segmenter` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn segmenter() -> Command {
    Command::cargo_bin("legal-segmenter").unwrap()
}

#[test]
fn test_segment_json_to_stdout() {
    let output = segmenter()
        .args(["segment", "--doc-type", "LAW", "--format", "json"])
        .arg(fixture("statute.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["splitter"], "legal");
    assert_eq!(report["total_segments"], 8);
    assert_eq!(
        report["segments"][1]["metadata"]["hierarchy_path"],
        "第一编 > 第一章 > 第一条"
    );
    assert_eq!(report["segments"][1]["metadata"]["original_filename"], "statute.txt");
    assert!(report["segments"][1]["metadata"]["indexed_at"].is_string());
}

#[test]
fn test_segment_summary() {
    segmenter()
        .arg("segment")
        .arg(fixture("contract.txt"))
        .args(["--doc-type", "contract"])
        .assert()
        .success()
        .stdout(predicate::str::contains("contract splitter"))
        .stdout(predicate::str::contains("contract_structured: 11"))
        .stdout(predicate::str::contains("第二章 > 第四条 > 第一款"));
}

#[test]
fn test_segment_flat_yaml() {
    segmenter()
        .args(["segment", "--doc-type", "law", "--flat", "--format", "yaml"])
        .arg(fixture("statute.txt"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("split_type: article"))
        .stdout(predicate::str::contains("article_hierarchical").not());
}

#[test]
fn test_segment_writes_reports() {
    let temp_dir = tempdir().unwrap();
    let out = temp_dir.path().join("reports");

    segmenter()
        .arg("segment")
        .arg(fixture("statute.txt"))
        .arg(fixture("unstructured.txt"))
        .args(["--doc-type", "LAW", "--format", "yaml", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to:"));

    let statute = fs::read_to_string(out.join("statute.segments.yaml")).unwrap();
    assert!(statute.starts_with("---\n"));
    assert!(statute.contains("splitter: legal"));
    assert!(out.join("unstructured.segments.yaml").exists());
}

#[test]
fn test_reports_with_same_stem_do_not_overwrite() {
    let temp_dir = tempdir().unwrap();
    let out = temp_dir.path().join("reports");
    for dir in ["a", "b"] {
        fs::create_dir(temp_dir.path().join(dir)).unwrap();
    }
    let first = temp_dir.path().join("a").join("民法典.txt");
    let second = temp_dir.path().join("b").join("民法典.txt");
    fs::write(&first, "第一条 甲\n第二条 乙").unwrap();
    fs::write(&second, "第一条 丙").unwrap();

    segmenter()
        .args(["segment", "-t", "LAW", "-f", "json", "-o"])
        .arg(&out)
        .arg(&first)
        .arg(&second)
        .assert()
        .success();

    let first_report = fs::read_to_string(out.join("民法典.segments.json")).unwrap();
    let second_report = fs::read_to_string(out.join("民法典-2.segments.json")).unwrap();
    let first_report: serde_json::Value = serde_json::from_str(&first_report).unwrap();
    let second_report: serde_json::Value = serde_json::from_str(&second_report).unwrap();
    assert_eq!(first_report["total_segments"], 2);
    assert_eq!(second_report["total_segments"], 1);
    assert_eq!(second_report["segments"][0]["text"], "第一条 丙");
}

#[test]
fn test_failure_on_later_file_keeps_earlier_reports() {
    let temp_dir = tempdir().unwrap();
    let out = temp_dir.path().join("reports");

    segmenter()
        .args(["segment", "-f", "yaml", "-o"])
        .arg(&out)
        .arg(fixture("statute.txt"))
        .arg(temp_dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Saved to:"))
        .stderr(predicate::str::contains("Error:"));

    assert!(out.join("statute.segments.yaml").exists());
    assert!(!out.join("missing.segments.yaml").exists());
}

#[test]
fn test_segment_with_settings_file() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("segmenter.yaml");
    fs::write(&config, "legal:\n  max_tokens: 12\n  overlap: 0\n").unwrap();

    let output = segmenter()
        .args(["segment", "-t", "LAW", "-f", "json", "--config"])
        .arg(&config)
        .arg(fixture("statute.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let segments = report["segments"].as_array().unwrap();
    assert!(segments.len() > 8);
    assert!(segments
        .iter()
        .any(|s| s["metadata"]["split_type"] == "article_part"));
}

#[test]
fn test_invalid_overlap_is_rejected() {
    segmenter()
        .args(["segment", "--max-tokens", "4", "--overlap", "100"])
        .arg(fixture("statute.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_non_utf8_input_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("latin1.txt");
    fs::write(&path, [0xC4, 0xE3, 0xBA, 0xC3, 0xFF]).unwrap();

    segmenter()
        .arg("segment")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn test_missing_file_fails() {
    segmenter()
        .args(["segment", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_unknown_doc_type_is_a_usage_error() {
    segmenter()
        .args(["segment", "--doc-type", "novel", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown document type"));
}

#[test]
fn test_detect() {
    segmenter()
        .args(["detect", "中华人民共和国民法典.pdf", "房屋租赁合同.docx", "会议纪要.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("中华人民共和国民法典.pdf\tlegal"))
        .stdout(predicate::str::contains("房屋租赁合同.docx\tcontract"))
        .stdout(predicate::str::contains("会议纪要.txt\tgeneric"));
}
