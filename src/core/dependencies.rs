use crate::config::{InstallMode, LaunchManifest, PackageSpec};
use crate::domain::model::{Invocation, RuntimeReport};
use crate::domain::ports::{Console, ProcessRunner};
use crate::utils::error::{LaunchError, Result};

/// 一次匯入所有依賴的探測命令
pub fn probe_invocation(runtime: &RuntimeReport, manifest: &LaunchManifest) -> Invocation {
    Invocation::new(runtime.program.as_str())
        .args(manifest.probe_args())
        .current_dir(manifest.project_root())
}

/// 依照依賴清單安裝的命令
pub fn install_invocation(runtime: &RuntimeReport, manifest: &LaunchManifest) -> Invocation {
    Invocation::new(runtime.program.as_str())
        .args(manifest.install_args())
        .current_dir(manifest.project_root())
}

/// 單一原子探測，任何一個模組缺少即為 false
pub async fn probe_dependencies<R: ProcessRunner + ?Sized>(
    runner: &R,
    runtime: &RuntimeReport,
    manifest: &LaunchManifest,
) -> bool {
    let invocation = probe_invocation(runtime, manifest);

    match runner.output(&invocation).await {
        Ok(output) if output.success() => true,
        Ok(output) => {
            tracing::warn!("📦 Dependency probe failed: {}", output.stderr.trim());
            false
        }
        Err(e) => {
            tracing::warn!("📦 Dependency probe could not run: {}", e);
            false
        }
    }
}

/// 單一套件探測，只用於診斷報告
pub async fn check_package<R: ProcessRunner + ?Sized>(
    runner: &R,
    runtime: &RuntimeReport,
    manifest: &LaunchManifest,
    package: &PackageSpec,
) -> bool {
    let invocation = Invocation::new(runtime.program.as_str())
        .args(manifest.probe_args_for(&package.module))
        .current_dir(manifest.project_root());

    matches!(runner.output(&invocation).await, Ok(output) if output.success())
}

/// 唯一的補救步驟：依清單安裝一次，不重試
pub async fn install_dependencies<R, C>(
    runner: &R,
    console: &C,
    runtime: &RuntimeReport,
    manifest: &LaunchManifest,
) -> Result<()>
where
    R: ProcessRunner + ?Sized,
    C: Console + ?Sized,
{
    let invocation = install_invocation(runtime, manifest);
    let command = invocation.display_command();

    match manifest.install_mode() {
        InstallMode::Auto => {}
        InstallMode::Prompt => {
            if !console.confirm("是否要自動安裝依賴項？").await {
                return Err(LaunchError::DependencyInstallDeclined { command });
            }
        }
        InstallMode::Never => {
            return Err(LaunchError::DependencyInstallDeclined { command });
        }
    }

    let manifest_path = manifest.dependency_manifest_path();
    if !manifest_path.is_file() {
        return Err(LaunchError::DependencyInstallFailed {
            command,
            reason: format!("dependency manifest '{}' not found", manifest_path.display()),
        });
    }

    console.info("正在安裝依賴項...");
    tracing::info!("📦 Installing dependencies: {}", command);

    match runner.status(&invocation).await {
        Ok(0) => {
            tracing::info!("✅ Dependencies installed");
            Ok(())
        }
        Ok(code) => Err(LaunchError::DependencyInstallFailed {
            command,
            reason: format!("installer exited with code {}", code),
        }),
        Err(e) => Err(LaunchError::DependencyInstallFailed {
            command,
            reason: format!("installer could not be started: {}", e),
        }),
    }
}
