use clap::Parser;
use std::path::PathBuf;

/// 啟動器自身的選項只在轉發參數之前才會被解析，
/// 第一個無法識別的參數（例如 `--debug`）起全部原樣轉發給入口點
#[derive(Debug, Clone, Parser)]
#[command(name = "pycraft-launcher")]
#[command(about = "Checks the Python environment and launches the PyCraft editor")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct CliConfig {
    /// Path to the launcher manifest (defaults to ./launcher.toml, then built-in settings)
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Enable verbose launcher logging
    #[arg(long)]
    pub verbose: bool,

    /// Show the launch plan without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log launcher CPU/memory usage per stage
    #[arg(long)]
    pub monitor: bool,

    /// Emit launcher logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Arguments forwarded verbatim to the entry point
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub forwarded: Vec<String>,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "pycraft-doctor")]
#[command(about = "Reports on the PyCraft Python environment and runs a smoke launch")]
#[command(version)]
pub struct DoctorCli {
    /// Path to the launcher manifest (defaults to ./launcher.toml, then built-in settings)
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only report on packages, do not launch the entry point
    #[arg(long)]
    pub skip_launch: bool,
}
