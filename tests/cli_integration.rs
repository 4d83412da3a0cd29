//! Integration tests that run the CLI binary.

use std::path::Path;

fn bin(home: &Path) -> std::process::Command {
    // CARGO_BIN_EXE_<name> uses the binary target name; hyphens require concat! for env!()
    let bin = env!(concat!("CARGO_BIN_EXE_gemini", "-", "studio"));
    let mut cmd = std::process::Command::new(bin);
    cmd.env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("GEMINI_MODEL")
        // Keep the user's stored key and custom templates out of the run.
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        // Run from the temp dir so dotenv() won't load .env from the project root
        .current_dir(home);
    cmd
}

fn run(args: &[&str]) -> std::process::Output {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    bin(tmp.path())
        .args(args)
        .output()
        .expect("binary not found - run cargo build first")
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let output = run(&["--help"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("compose"), "expected subcommands in usage");
    assert!(stdout.contains("gemini-studio"));
}

#[test]
fn cli_version_succeeds() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("gemini-studio"));
}

#[test]
fn cli_prompt_without_api_key_exits_with_error() {
    let output = run(&["-p", "hello"]);
    assert!(
        !output.status.success(),
        "expected failure when GEMINI_API_KEY is not set"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GEMINI_API_KEY"), "stderr: {}", stderr);
}

#[test]
fn failed_request_prints_a_readable_error_and_exits_1() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    // Nothing listens on the discard port, so the request fails fast.
    let output = bin(tmp.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_OPENAI_BASE", "http://127.0.0.1:9")
        .env("GEMINI_TIMEOUT_SECS", "10")
        .args(["-m", "gemini-1.5-flash", "--no-stream", "-p", "hello"])
        .output()
        .expect("binary not found - run cargo build first");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.lines().any(|l| l.starts_with("Error: ")), "stderr: {}", stderr);
    for debug_form in ["Other(", "ApiMessage(", "RateLimited(", "Reqwest"] {
        assert!(!stderr.contains(debug_form), "stderr: {}", stderr);
    }
}

#[test]
fn cli_models_without_api_key_exits_with_error() {
    let output = run(&["models"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("GEMINI_API_KEY"));
}

#[test]
fn compose_dry_run_prints_sections_without_a_key() {
    let output = run(&[
        "compose",
        "--task",
        "Plan a weekend trip",
        "--tag",
        "Stay under 200 words",
        "--format",
        "bullets",
        "--dry-run",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## Task"));
    assert!(stdout.contains("Plan a weekend trip"));
    assert!(stdout.contains("## Constraints"));
    assert!(stdout.contains("Stay under 200 words"));
    assert!(stdout.contains("## Output format"));
    assert!(
        stdout.find("## Task").unwrap() < stdout.find("## Constraints").unwrap(),
        "sections out of order:\n{}",
        stdout
    );
}

#[test]
fn compose_dry_run_dual_language_includes_marker() {
    let output = run(&[
        "compose",
        "-t",
        "translator",
        "--context",
        "Bonjour tout le monde",
        "--lang",
        "dual",
        "--source-lang",
        "French",
        "--target-lang",
        "Japanese",
        "--dry-run",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<<<===LANG-SPLIT===>>>"));
    assert!(stdout.contains("French"));
    assert!(stdout.contains("Japanese"));
    assert!(stdout.contains("Bonjour tout le monde"));
}

#[test]
fn compose_with_unknown_template_fails() {
    let output = run(&["compose", "-t", "no-such-template", "--dry-run"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no-such-template"));
}

#[test]
fn templates_lists_builtins() {
    let output = run(&["templates"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("translator"));
    assert!(stdout.contains("built-in"));
}

#[test]
fn templates_show_prints_defaults() {
    let output = run(&["templates", "show", "email"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Name:        email"));
    assert!(stdout.contains("Persona:"));
}

#[test]
fn templates_show_unknown_fails() {
    let output = run(&["templates", "show", "nope"]);
    assert!(!output.status.success());
}

#[test]
fn completions_generate_script() {
    let output = run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("gemini-studio"));
}
