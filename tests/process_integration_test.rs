//! 以真實子行程驗證：用 `sh` 扮演直譯器
#![cfg(unix)]

mod common;

use anyhow::Result;
use common::{args, RecordingConsole};
use pycraft_launcher::{LaunchManifest, LaunchSupervisor, SystemRunner};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const ENTRY_SCRIPT: &str = "printf '%s\\n' \"$@\" > forwarded.txt\nexit \"${ENTRY_EXIT_CODE:-3}\"\n";

fn write_project(root: &Path, probe_exit: i32, install_exit: i32, candidate: &str) -> Result<String> {
    std::fs::write(root.join("entry.sh"), ENTRY_SCRIPT)?;
    std::fs::write(root.join("requirements.txt"), "numpy\n")?;

    let normalized = root.to_string_lossy().replace('\\', "/");
    let manifest = format!(
        r#"
version = 1

[project]
name = "PyCraft"
root = "{root}"

[runtime]
candidates = ["{candidate}"]
min_version = "3.7"
version_args = ["-c", "echo Python 3.11.4"]

[dependencies]
packages = [{{ module = "numpy" }}]
probe_args = ["-c", "exit {probe_exit}"]
install_args = ["-c", "exit {install_exit}"]

[entry]
script = "entry.sh"

[report]
pause_on_error = false
"#,
        root = normalized,
        candidate = candidate,
        probe_exit = probe_exit,
        install_exit = install_exit,
    );

    let manifest_path = root.join("launcher.toml");
    std::fs::write(&manifest_path, manifest)?;
    Ok(manifest_path.to_string_lossy().into_owned())
}

fn read_forwarded(root: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(root.join("forwarded.txt"))?;
    Ok(content.lines().map(str::to_string).collect())
}

#[tokio::test]
async fn test_real_entry_point_exit_code_and_arguments() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manifest_path = write_project(temp_dir.path(), 0, 0, "sh")?;
    let manifest = LaunchManifest::from_file(&manifest_path)?;

    let supervisor = LaunchSupervisor::new(SystemRunner::new(), RecordingConsole::new(), manifest);
    let forwarded = args(&["--debug", "--resolution=1280x720", "--project=with space"]);

    let report = supervisor.run(&forwarded).await;

    assert_eq!(report.exit_code(), 3);
    assert_eq!(read_forwarded(temp_dir.path())?, forwarded);
    assert!(supervisor
        .console()
        .errors()
        .iter()
        .any(|m| m.contains("錯誤碼: 3")));

    Ok(())
}

#[tokio::test]
async fn test_real_install_pass_then_launch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manifest_path = write_project(temp_dir.path(), 1, 0, "sh")?;
    let manifest = LaunchManifest::from_file(&manifest_path)?;

    let supervisor = LaunchSupervisor::new(SystemRunner::new(), RecordingConsole::new(), manifest);
    let report = supervisor.run(&args(&["--debug"])).await;

    assert_eq!(report.exit_code(), 3);
    assert_eq!(read_forwarded(temp_dir.path())?, vec!["--debug"]);

    Ok(())
}

#[test]
fn test_binary_propagates_entry_exit_code() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manifest_path = write_project(temp_dir.path(), 0, 0, "sh")?;

    let output = Command::new(env!("CARGO_BIN_EXE_pycraft-launcher"))
        .args(["--manifest", &manifest_path, "--debug", "--scene=intro.scene"])
        .env("ENTRY_EXIT_CODE", "42")
        .output()?;

    assert_eq!(output.status.code(), Some(42));
    assert_eq!(
        read_forwarded(temp_dir.path())?,
        vec!["--debug", "--scene=intro.scene"]
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("42"));

    Ok(())
}

#[test]
fn test_binary_success_exits_zero() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manifest_path = write_project(temp_dir.path(), 0, 0, "sh")?;

    let status = Command::new(env!("CARGO_BIN_EXE_pycraft-launcher"))
        .args(["--manifest", &manifest_path])
        .env("ENTRY_EXIT_CODE", "0")
        .status()?;

    assert_eq!(status.code(), Some(0));
    Ok(())
}

#[test]
fn test_binary_failed_install_exits_one_without_launch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manifest_path = write_project(temp_dir.path(), 1, 7, "sh")?;

    let output = Command::new(env!("CARGO_BIN_EXE_pycraft-launcher"))
        .args(["--manifest", &manifest_path, "--debug"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!temp_dir.path().join("forwarded.txt").exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("-c \"exit 7\""));

    Ok(())
}

#[test]
fn test_binary_missing_runtime_exits_one() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manifest_path = write_project(temp_dir.path(), 0, 0, "pycraft-no-such-python")?;

    let output = Command::new(env!("CARGO_BIN_EXE_pycraft-launcher"))
        .args(["--manifest", &manifest_path, "--debug"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!temp_dir.path().join("forwarded.txt").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("3.7"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("正在安裝"));

    Ok(())
}

#[test]
fn test_binary_dry_run_executes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manifest_path = write_project(temp_dir.path(), 0, 0, "sh")?;

    let output = Command::new(env!("CARGO_BIN_EXE_pycraft-launcher"))
        .args(["--manifest", &manifest_path, "--dry-run", "--debug"])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(!temp_dir.path().join("forwarded.txt").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("entry.sh --debug"));

    Ok(())
}

#[test]
fn test_binary_resolves_relative_interpreter_from_project_root() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new()?;
    let venv = temp_dir.path().join("venv");
    std::fs::create_dir(&venv)?;
    let interpreter = venv.join("py");
    std::fs::write(&interpreter, "#!/bin/sh\nexec sh \"$@\"\n")?;
    std::fs::set_permissions(&interpreter, std::fs::Permissions::from_mode(0o755))?;

    let manifest_path = write_project(temp_dir.path(), 0, 0, "venv/py")?;
    let elsewhere = TempDir::new()?;

    let output = Command::new(env!("CARGO_BIN_EXE_pycraft-launcher"))
        .args(["--manifest", &manifest_path, "--debug"])
        .current_dir(elsewhere.path())
        .env("ENTRY_EXIT_CODE", "0")
        .output()?;

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(read_forwarded(temp_dir.path())?, vec!["--debug"]);

    Ok(())
}
