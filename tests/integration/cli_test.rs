//! Integration tests for the strokecast CLI

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::helpers::fixtures_dir;

/// strokecast with an isolated config location
fn strokecast(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("strokecast").expect("binary built");
    cmd.env("STROKECAST_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).display().to_string()
}

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("play"));
}

#[test]
fn version_includes_package_version() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// inspect / render
// ============================================================================

#[test]
fn inspect_prints_summary() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["inspect", &fixture("lecture.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:     Linear maps, part 2"))
        .stdout(predicate::str::contains("Pages:     3"))
        .stdout(predicate::str::contains("Duration:  0:06.000"));
}

#[test]
fn inspect_rejects_recording_without_audio() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["inspect", &fixture("missing_audio.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Recording has no audio track"));
}

#[test]
fn render_lists_visible_actions() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["render", &fixture("lecture.json"), "--at", "2300"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0:02.300 page 2\n"))
        .stdout(predicate::str::contains("page change -> 2"))
        .stdout(predicate::str::contains("volatile  stroke blue w=3"));
}

#[test]
fn render_after_clear_shows_nothing_on_page() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["render", &fixture("lecture.json"), "--at", "3100"])
        .assert()
        .success()
        .stdout("0:03.100 page 2\n");
}

#[test]
fn render_fails_on_undrawable_action() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["render", &fixture("text_without_font.json"), "--at", "500"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("has no font"))
        .stderr(predicate::str::contains("could not be drawn"));
}

#[test]
fn play_runs_to_the_end() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args([
            "play",
            &fixture("lecture.json"),
            "--speed",
            "1000",
            "--tick-ms",
            "100",
            "--from",
            "5000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[permanent] show page 1 (slides/p1.png)"))
        .stdout(predicate::str::contains("[permanent] released"))
        .stderr(predicate::str::contains("Stopped at 0:06.000"));
}

#[test]
fn play_rejects_zero_speed() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["play", &fixture("lecture.json"), "--speed", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Speed must be a positive number"));
}

#[test]
fn play_rejects_speed_too_small_for_a_sleep() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["play", &fixture("lecture.json"), "--speed", "1e-300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too long at speed"));
}

// ============================================================================
// config / completions
// ============================================================================

#[test]
fn config_show_prints_defaults() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[playback]"))
        .stdout(predicate::str::contains("stop_policy = \"finalize\""))
        .stdout(predicate::str::contains("level = \"warn\""));
}

#[test]
fn config_show_reads_override_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[playback]\nstop_policy = \"clear\"\n",
    )
    .unwrap();
    strokecast(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stop_policy = \"clear\""))
        .stdout(predicate::str::contains("tick_ms = 40"));
}

#[test]
fn config_path_honors_env_override() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml (not created, using defaults)"));
}

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().unwrap();
    strokecast(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_strokecast"));
}
