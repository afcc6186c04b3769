use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;

fn playground(dir: &Path, script: &str) -> Command {
    let path = dir.join("tour.txt");
    fs::write(&path, script).unwrap();

    let mut cmd = cargo_bin_cmd!("tuner-playground");
    cmd.current_dir(dir)
        .env_remove("TUNER_CONFIG_PATH")
        .env_remove("TUNER_CONFIG_JSON")
        .args(["--channels", "10", "--programs", "8", "--latency-ms", "50"])
        .arg("--script")
        .arg(&path);
    cmd
}

#[test]
fn script_prints_events_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let output = playground(dir.path(), "wait:100\ndown\ndown\nwait:600\nup\nquit\nup\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);

    let lines = text.lines().collect::<Vec<_>>();
    let loaded = lines
        .iter()
        .position(|l| l.contains("program-bar ItemsChanged 8 items"))
        .expect("programs loaded");
    let down = lines.iter().position(|l| l.ends_with("key Down")).unwrap();
    assert!(loaded < down);
    assert!(
        lines[down..]
            .iter()
            .any(|l| l.contains("channel-stack VisibilityChanged"))
    );
    // Nothing after quit is replayed.
    assert_eq!(lines.iter().filter(|l| l.ends_with("key Up")).count(), 1);
}

#[test]
fn bad_script_fails_with_line_number() {
    let dir = tempfile::tempdir().unwrap();
    let output = playground(dir.path(), "down\nsideways\n")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("line 2"), "stderr: {text}");
}

#[test]
fn rejected_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.toml");
    fs::write(&config, "auto_hide_ms = 0\n").unwrap();
    let output = playground(dir.path(), "quit\n")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("rejected settings"), "stderr: {text}");
}

#[test]
fn lineup_file_sets_the_channel_stack() {
    let dir = tempfile::tempdir().unwrap();
    let lineup = dir.path().join("lineup.json");
    fs::write(
        &lineup,
        r#"[
            { "id": "bbc-one", "number": 1, "is_playing": true },
            { "id": "bbc-two", "number": 2 },
            { "id": "itv", "number": 3 }
        ]"#,
    )
    .unwrap();
    let output = playground(dir.path(), "quit\n")
        .arg("--lineup")
        .arg(&lineup)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(
        text.contains("channel-stack ItemsChanged 3 items"),
        "stdout: {text}"
    );
}
