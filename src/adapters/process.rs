use crate::domain::model::{CommandOutput, Invocation};
use crate::domain::ports::ProcessRunner;
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// 以 tokio 行程執行命令
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);

        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        #[cfg(windows)]
        {
            if invocation.hide_console {
                command.creation_flags(CREATE_NO_WINDOW);
            }
        }

        command
    }
}

/// 被信號終止的子行程比照 shell 的慣例回傳 128 + signal
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn output(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        tracing::debug!("🔧 Running (captured): {}", invocation);

        let output = Self::command(invocation)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(CommandOutput {
            exit_code: exit_code_of(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn status(&self, invocation: &Invocation) -> std::io::Result<i32> {
        tracing::debug!("🔧 Running: {}", invocation);

        let status = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(exit_code_of(status))
    }
}
