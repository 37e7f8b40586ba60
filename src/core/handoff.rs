use crate::config::LaunchManifest;
use crate::domain::model::{EntryPointExit, Invocation, RuntimeReport};
use crate::domain::ports::{Console, ProcessRunner};
use crate::utils::error::{LaunchError, Result};

/// `<interpreter> <script> <entry.args...> <forwarded...>`，轉發參數原樣附在最後
pub fn entry_invocation(
    runtime: &RuntimeReport,
    manifest: &LaunchManifest,
    extra_args: &[String],
) -> Invocation {
    Invocation::new(runtime.program.as_str())
        .args([manifest.entry_script().to_string()])
        .args(manifest.entry_args())
        .args(extra_args.iter().cloned())
        .current_dir(manifest.entry_working_dir())
        .hide_console(manifest.hide_console())
}

pub async fn run_entry_point<R: ProcessRunner + ?Sized>(
    runner: &R,
    invocation: &Invocation,
) -> Result<EntryPointExit> {
    tracing::info!("🚀 Handing off to: {}", invocation);

    let code = runner
        .status(invocation)
        .await
        .map_err(|source| LaunchError::EntryPointSpawnError {
            program: invocation.program.clone(),
            source,
        })?;

    tracing::info!("🏁 Entry point exited with code {}", code);
    Ok(EntryPointExit { code })
}

/// 回報入口點結果，回傳啟動器應使用的退出碼
pub async fn report_status<C: Console + ?Sized>(
    console: &C,
    manifest: &LaunchManifest,
    exit: EntryPointExit,
) -> i32 {
    if exit.success() {
        return 0;
    }

    let log_dir = manifest.log_dir();
    tracing::error!(
        "❌ {} exited with code {} (logs: {})",
        manifest.entry_script(),
        exit.code,
        log_dir.display()
    );
    console.error(&format!(
        "{} 異常退出，錯誤碼: {}。請查看日誌目錄 {} 了解詳情。",
        manifest.project_name(),
        exit.code,
        log_dir.display()
    ));

    if manifest.pause_on_error() {
        console.pause("按 Enter 鍵繼續...").await;
    }

    exit.code
}
