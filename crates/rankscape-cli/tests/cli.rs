//! End-to-end tests driving the `rankscape` binary.

#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn rankscape(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rankscape"))
        .args(args)
        .env_remove("RANKSCAPE_CONFIG")
        .env_remove("RANKSCAPE_OUTPUT_DIR")
        .env_remove("RANKSCAPE_RESOLUTION")
        .env_remove("RANKSCAPE_COLORMAP")
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn small_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            r#"
output_dir = "{}"
resolution = 8
reference_date = "2024-06-01T00:00:00Z"
scenarios = ["EmbedTopAsc", "EmbedDateCreatedDesc"]

[render.layout]
panel_width = 32
panel_height = 24
margin = 4
colorbar_width = 4
colorbar_gap = 2
"#,
            dir.join("plots").display()
        ),
    )
    .unwrap();
    path
}

// ----------------------------------------------------------------------------
// plot
// ----------------------------------------------------------------------------

#[test]
fn test_plot_writes_configured_scenarios() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = small_config(dir.path());

    let output = rankscape(&["--config", config.to_str().unwrap(), "plot", "--csv"]);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("Plots generated successfully!"));

    let plots = dir.path().join("plots");
    for name in [
        "EmbedTopAsc_combined.png",
        "EmbedTopAsc_combined.json",
        "EmbedTopAsc_xs-range.csv",
        "EmbedDateCreatedDesc_combined.png",
        "EmbedDateCreatedDesc_years-range.csv",
    ] {
        assert!(plots.join(name).exists(), "missing {name}");
    }
    assert!(!plots.join("EmbedTopDesc_combined.png").exists());

    let manifest: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(plots.join("EmbedDateCreatedDesc_combined.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["title"], "Scenario: EmbedDateCreatedDesc");
    assert_eq!(manifest["panels"].as_array().unwrap().len(), 6);
    assert_eq!(manifest["reference_date"], "2024-06-01T00:00:00Z");
}

#[test]
fn test_plot_scenario_flag_overrides_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = small_config(dir.path());
    let out = dir.path().join("other");

    let output = rankscape(&[
        "-c",
        config.to_str().unwrap(),
        "plot",
        "--scenario",
        "embed-top-desc",
        "--output-dir",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{output:?}");
    assert!(out.join("EmbedTopDesc_combined.png").exists());
    assert!(!dir.path().join("plots").exists());
}

#[test]
fn test_plot_missing_config_fails() {
    let output = rankscape(&["--config", "/no/such/rankscape.toml", "plot"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

// ----------------------------------------------------------------------------
// score / rank / sql
// ----------------------------------------------------------------------------

#[test]
fn test_score_prints_number() {
    let output = rankscape(&[
        "score",
        "--sort",
        "EmbedTopAsc",
        "--distance",
        "0",
        "--bookmarks",
        "0",
    ]);
    assert!(output.status.success(), "{output:?}");
    let score: f64 = stdout(&output).trim().parse().unwrap();
    assert!((score - 10_020.0).abs() < 1e-6);
}

#[test]
fn test_rank_table() {
    let candidates = fixture("candidates.toml");
    let output = rankscape(&[
        "rank",
        "--sort",
        "EmbedTopDesc",
        "--candidates",
        candidates.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    let ids: Vec<&str> = text
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(1))
        .collect();
    assert_eq!(ids, vec!["faq", "guide", "tutorial"]);
}

#[test]
fn test_rank_json() {
    let candidates = fixture("candidates.toml");
    let output = rankscape(&[
        "rank",
        "--sort",
        "EmbedDateCreatedDesc",
        "--candidates",
        candidates.to_str().unwrap(),
        "--json",
    ]);
    assert!(output.status.success(), "{output:?}");
    let ranking: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let ranking = ranking.as_array().unwrap();
    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking[0]["rank"], 1);
}

#[test]
fn test_sql_expression() {
    let output = rankscape(&["sql", "--sort", "EmbedDateCreatedAsc"]);
    assert!(output.status.success(), "{output:?}");
    let sql = stdout(&output);
    assert!(sql.starts_with("(1 / ((distance) + 0.01))"));
    assert!(sql.contains("EXTRACT(EPOCH FROM created_at - NOW())"));
}

// ----------------------------------------------------------------------------
// eval
// ----------------------------------------------------------------------------

#[test]
fn test_eval_passing_suite() {
    let cases = fixture("cases.toml");
    let output = rankscape(&["eval", cases.to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert_eq!(text.lines().filter(|l| l.starts_with("PASS")).count(), 4);
    assert!(text.contains("4 passed, 0 failed"));
}

#[test]
fn test_eval_failing_suite_exits_non_zero() {
    let cases = fixture("failing_cases.toml");
    let output = rankscape(&["eval", cases.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("FAIL ascending top does not favour popular items"));
    assert!(text.contains("actual:   obscure, popular"));
}

#[test]
fn test_eval_json_report() {
    let cases = fixture("cases.toml");
    let output = rankscape(&["eval", cases.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["passed"], 4);
    assert_eq!(report["failed"], 0);
    assert_eq!(report["cases"][2]["sort"], "EmbedDateCreatedDesc");
}

// ----------------------------------------------------------------------------
// config
// ----------------------------------------------------------------------------

#[test]
fn test_config_init_set_get() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let path_str = path.to_str().unwrap();

    let init = rankscape(&["--config", path_str, "config", "init"]);
    assert!(init.status.success(), "{init:?}");
    assert!(path.exists());

    let set = rankscape(&["--config", path_str, "config", "set", "render.colormap", "magma"]);
    assert!(set.status.success(), "{set:?}");

    let get = rankscape(&["--config", path_str, "config", "get", "render.colormap"]);
    assert!(get.status.success(), "{get:?}");
    assert_eq!(stdout(&get).trim(), "magma");

    let export = rankscape(&["--config", path_str, "config", "export"]);
    assert!(stdout(&export).contains("RANKSCAPE_COLORMAP=magma"));
}

#[test]
fn test_config_set_rejects_bad_value() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let path_str = path.to_str().unwrap();

    assert!(rankscape(&["-c", path_str, "config", "init"]).status.success());
    let set = rankscape(&["-c", path_str, "config", "set", "render.colormap", "jet"]);
    assert!(!set.status.success());
}
