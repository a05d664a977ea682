//! Integration tests that run the llmbox binary.

use std::process::Command;

fn bin(workdir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_llmbox"));
    // Run from a temp dir so dotenv() won't pick up a project .env
    cmd.current_dir(workdir)
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("LLMBOX_UPSTREAM_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn models_listing_on_stdout_diagnostics_on_stderr() {
    let tmp = tempfile::tempdir().unwrap();
    let output = bin(tmp.path())
        .args(["models", "--log-level", "minimal", "--config"])
        .arg(tmp.path().join("missing.toml"))
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "llama-4-maverick\nmistral-small-3.1-24b-instruct\n");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Using fallback catalog"), "stderr: {}", stderr);
}

#[cfg(target_os = "linux")]
#[test]
fn config_init_creates_default_file() {
    let tmp = tempfile::tempdir().unwrap();
    let output = bin(tmp.path())
        .args(["config", "--init"])
        .env("XDG_CONFIG_HOME", tmp.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let written = std::fs::read_to_string(tmp.path().join("llmbox").join("config.toml")).unwrap();
    assert!(written.contains("[server]"));
    assert!(written.contains("port = 8000"));
}
