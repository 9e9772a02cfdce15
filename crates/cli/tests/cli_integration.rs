use std::process::Command;

fn argent() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argent"))
}

#[test]
fn help_flag_renders_the_schema() {
    let out = argent()
        .arg("--help")
        .output()
        .expect("failed to run argent --help");
    assert!(
        out.status.success(),
        "argent --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("argent")
            && stdout.contains("Available commands:")
            && stdout.contains("greet, g")
            && stdout.contains("--repeat, -n"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn no_arguments_prints_help() {
    let out = argent().output().expect("failed to run argent");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Usage:"), "unexpected output:\n{stdout}");
}

#[test]
fn greet_repeats_by_flag_value() {
    let out = argent()
        .args(["greet", "rust", "-n", "2"])
        .output()
        .expect("failed to run argent greet");
    assert!(
        out.status.success(),
        "argent greet failed:\nstderr:\n{}",
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.matches("Hello, rust!").count(), 2, "output:\n{stdout}");
}

#[test]
fn command_alias_matches_like_the_name() {
    let out = argent()
        .args(["f", "rust"])
        .output()
        .expect("failed to run argent f");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Goodbye, rust!"), "output:\n{stdout}");
}

#[test]
fn quiet_suppresses_output() {
    let out = argent()
        .args(["greet", "rust", "--quiet"])
        .output()
        .expect("failed to run argent greet --quiet");
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn json_output_reports_resolved_values() {
    let out = argent()
        .args(["greet", "rust", "--json", "-n", "3"])
        .output()
        .expect("failed to run argent --json");
    assert!(out.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout is not valid JSON");
    assert_eq!(report["command"], "greet");
    assert_eq!(report["argument"], "rust");
    assert_eq!(report["flags"]["repeat"], 3);
    assert_eq!(report["flags"]["quiet"], false);
}

#[test]
fn unknown_flag_exits_with_usage_error() {
    let out = argent()
        .arg("--nonexistent")
        .output()
        .expect("failed to run argent --nonexistent");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Unknown flag") && stderr.contains("--nonexistent"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn missing_command_argument_exits_with_usage_error() {
    // `greet` is a string command; with nothing after it the parser reports
    // the command token itself.
    let out = argent()
        .arg("greet")
        .output()
        .expect("failed to run argent greet");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Expected a value"), "unexpected stderr:\n{stderr}");
}

#[test]
fn type_mismatch_exits_with_usage_error() {
    let out = argent()
        .args(["greet", "rust", "-n", "lots"])
        .output()
        .expect("failed to run argent greet -n lots");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Type mismatch") && stderr.contains("lots"),
        "unexpected stderr:\n{stderr}"
    );
}
