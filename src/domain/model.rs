use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// 要執行的外部命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub hide_console: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            hide_console: false,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn hide_console(mut self, hide: bool) -> Self {
        self.hide_console = hide;
        self
    }

    /// 給使用者照抄的命令列
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote_arg)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_command())
    }
}

fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        arg.to_string()
    } else {
        format!("\"{}\"", arg.replace('"', "\\\""))
    }
}

/// 捕獲輸出的命令結果
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Python 2 把版本寫到 stderr，兩邊一起看
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// 直譯器版本 `major.minor[.patch]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl RuntimeVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for RuntimeVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(format!("expected MAJOR.MINOR[.PATCH], got '{}'", s));
        }

        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| format!("'{}' is not a version number", part))
        };

        Ok(Self {
            major: parse(parts[0])?,
            minor: parse(parts[1])?,
            patch: match parts.get(2) {
                Some(part) => parse(part)?,
                None => 0,
            },
        })
    }
}

/// 啟動序列中的狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchState {
    Start,
    CheckRuntime,
    CheckDeps,
    InstallDeps,
    RunEntrypoint,
    ReportStatus,
    End,
}

impl LaunchState {
    pub fn label(&self) -> &'static str {
        match self {
            LaunchState::Start => "start",
            LaunchState::CheckRuntime => "check_runtime",
            LaunchState::CheckDeps => "check_deps",
            LaunchState::InstallDeps => "install_deps",
            LaunchState::RunEntrypoint => "run_entrypoint",
            LaunchState::ReportStatus => "report_status",
            LaunchState::End => "end",
        }
    }
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 第一步的結果：選中的直譯器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeReport {
    pub program: String,
    pub version: RuntimeVersion,
}

/// 第二步的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStatus {
    Satisfied,
    Installed,
}

/// 第三步的結果：入口點的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointExit {
    pub code: i32,
}

impl EntryPointExit {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_version_parsing_and_order() {
        let v37: RuntimeVersion = "3.7".parse().unwrap();
        let v3114: RuntimeVersion = "3.11.4".parse().unwrap();

        assert_eq!(v37, RuntimeVersion::new(3, 7, 0));
        assert_eq!(v3114, RuntimeVersion::new(3, 11, 4));
        assert!(v3114 > v37);
        assert!(RuntimeVersion::new(2, 7, 18) < v37);
        assert!("3".parse::<RuntimeVersion>().is_err());
        assert!("3.x".parse::<RuntimeVersion>().is_err());
        assert!("3.7.1.2".parse::<RuntimeVersion>().is_err());
    }

    #[test]
    fn test_display_command_quotes_whitespace() {
        let invocation = Invocation::new("python3")
            .args(["-c", "import numpy, pygame"]);

        assert_eq!(
            invocation.display_command(),
            "python3 -c \"import numpy, pygame\""
        );
    }
}
