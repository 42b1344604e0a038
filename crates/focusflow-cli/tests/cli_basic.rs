//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};

use tempfile::TempDir;

struct Cli {
    dir: TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp data dir"),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_focusflow"));
        cmd.args(args)
            .env("FOCUSFLOW_DATA_DIR", self.dir.path())
            .env_remove("FOCUSFLOW_LOG");
        cmd
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = self
            .command(args)
            .output()
            .expect("Failed to execute CLI command");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        stdout
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> (String, i32) {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn CLI");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
        let output = child.wait_with_output().expect("wait for CLI");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }
}

impl Cli {
    fn config_path(&self) -> std::path::PathBuf {
        self.dir.path().join("config.toml")
    }
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_config_defaults_and_set() {
    let cli = Cli::new();
    assert_eq!(cli.run_ok(&["config", "get", "timer.study_duration"]).trim(), "60");

    cli.run_ok(&["config", "set", "timer.study_duration", "25"]);
    assert_eq!(cli.run_ok(&["config", "get", "timer.study_duration"]).trim(), "25");

    let listed = json(&cli.run_ok(&["config", "list"]));
    assert_eq!(listed["timer"]["study_duration"], 25);
    assert_eq!(listed["timer"]["cycles_per_super_block"], 4);

    cli.run_ok(&["config", "reset"]);
    assert_eq!(cli.run_ok(&["config", "get", "timer.study_duration"]).trim(), "60");
}

#[test]
fn test_config_rejects_bad_values() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["config", "set", "timer.short_break_duration", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));

    let (_, _, code) = cli.run(&["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_activity_lifecycle() {
    let cli = Cli::new();
    let added = json(&cli.run_ok(&["activity", "add", "Stretch", "--category", "Quick Exercise"]));
    let id = added["id"].as_str().expect("id").to_string();
    assert_eq!(added["name"], "Stretch");

    let listed = json(&cli.run_ok(&["activity", "list"]));
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    cli.run_ok(&["activity", "remove", &id]);
    let (_, _, code) = cli.run(&["activity", "remove", &id]);
    assert_eq!(code, 1);

    let (_, _, code) = cli.run(&["activity", "add", "  "]);
    assert_eq!(code, 1);
}

#[test]
fn test_empty_stats() {
    let cli = Cli::new();
    let today = json(&cli.run_ok(&["stats", "today"]));
    assert_eq!(today["completed_blocks_today"], 0);

    let week = json(&cli.run_ok(&["stats", "week"]));
    assert_eq!(week["days"].as_array().map(Vec::len), Some(7));
    assert_eq!(week["total_minutes"], 0);

    let goal = json(&cli.run_ok(&["stats", "goal"]));
    assert_eq!(goal["goal_type"], "blocks");
    assert_eq!(goal["percent"], 0.0);

    let streaks = json(&cli.run_ok(&["stats", "streaks"]));
    assert_eq!(streaks["blocks"], 0);
    assert_eq!(streaks["next_milestone"], 3);
    assert_eq!(streaks["current_days"], 0);
}

#[test]
fn test_streak_show_and_reset() {
    let cli = Cli::new();
    assert_eq!(json(&cli.run_ok(&["streak", "show"]))["streak"], 0);
    cli.run_ok(&["streak", "reset"]);
    assert_eq!(json(&cli.run_ok(&["streak", "show"]))["streak"], 0);
}

#[test]
fn test_timer_run_skip_logs_once() {
    let cli = Cli::new();
    let (_, code) = cli.run_with_stdin(&["timer", "run", "--json"], "s\nk\nq\n");
    assert_eq!(code, 0);

    // The skipped study block, then the break it ran into, closed on quit.
    let log = json(&cli.run_ok(&["log", "list"]));
    let entries = log.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["type"], "study");
    assert_eq!(entries[0]["completed"], false);
    assert_eq!(entries[0]["duration_minutes"], 0);
    assert_eq!(entries[1]["type"], "short_break");
    assert_eq!(entries[1]["completed"], false);

    assert_eq!(json(&cli.run_ok(&["log", "list", "--limit", "5"])), log);
}

#[test]
fn test_timer_run_quit_logs_running_segment() {
    let cli = Cli::new();
    let (_, code) = cli.run_with_stdin(&["timer", "run", "--start"], "q\n");
    assert_eq!(code, 0);

    let log = json(&cli.run_ok(&["log", "list"]));
    let entries = log.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], "study");
    assert_eq!(entries[0]["completed"], false);
}

#[test]
fn test_timer_run_survives_broken_config_reload() {
    let cli = Cli::new();
    cli.run_ok(&["config", "set", "timer.study_duration", "1"]);

    let mut child = cli
        .command(&["timer", "run", "--start", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn CLI");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout"));

    // First event line means the config has been read and the timer is up.
    let mut first = String::new();
    stdout.read_line(&mut first).expect("read first event");
    assert!(first.contains("\"type\""), "unexpected output: {first}");

    std::fs::write(cli.config_path(), "[timer]\nstudy_duration = [\n").expect("corrupt config");
    {
        let mut stdin = child.stdin.take().expect("stdin");
        stdin.write_all(b"c\ns\nq\n").expect("write stdin");
    }
    let mut rest = String::new();
    stdout.read_to_string(&mut rest).expect("read remaining output");
    let status = child.wait().expect("wait for CLI");
    assert!(status.success(), "timer run failed after reload: {rest}");

    std::fs::remove_file(cli.config_path()).expect("remove broken config");
    let log = json(&cli.run_ok(&["log", "list"]));
    let entries = log.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], "study");
    assert_eq!(entries[0]["completed"], false);
}

#[test]
fn test_timer_run_quits_on_eof() {
    let cli = Cli::new();
    let (_, code) = cli.run_with_stdin(&["timer", "run"], "");
    assert_eq!(code, 0);
    assert_eq!(json(&cli.run_ok(&["log", "list"])), serde_json::json!([]));
}

#[test]
fn test_timer_status() {
    let cli = Cli::new();
    cli.run_ok(&["config", "set", "timer.study_duration", "30"]);
    let stdout = cli.run_ok(&["timer", "status"]);
    let snapshot: serde_json::Value = serde_json::Deserializer::from_str(&stdout)
        .into_iter()
        .next()
        .expect("snapshot")
        .expect("valid JSON");
    assert_eq!(snapshot["type"], "state_snapshot");
    assert_eq!(snapshot["mode"], "study");
    assert_eq!(snapshot["time_left_secs"], 1800);
    assert_eq!(snapshot["block_label"], "Block 1 of 4");
}

#[test]
fn test_timer_status_falls_back_to_defaults() {
    let cli = Cli::new();
    std::fs::write(cli.config_path(), "timer = 3 = 4").expect("write broken config");
    let stdout = cli.run_ok(&["timer", "status"]);
    let snapshot: serde_json::Value = serde_json::Deserializer::from_str(&stdout)
        .into_iter()
        .next()
        .expect("snapshot")
        .expect("valid JSON");
    assert_eq!(snapshot["time_left_secs"], 3600);
}

#[test]
fn test_completions() {
    let cli = Cli::new();
    let stdout = cli.run_ok(&["completions", "bash"]);
    assert!(stdout.contains("focusflow"));
}
