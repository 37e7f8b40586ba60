use crate::config::{LaunchManifest, PackageSpec};
use crate::core::{dependencies, handoff, runtime};
use crate::domain::model::{EntryPointExit, RuntimeReport};
use crate::domain::ports::{Console, ProcessRunner};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct PackageCheck {
    pub spec: PackageSpec,
    pub installed: bool,
}

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub runtime: Option<RuntimeReport>,
    pub packages: Vec<PackageCheck>,
    pub launch: Option<EntryPointExit>,
    pub passed: bool,
}

impl DoctorReport {
    pub fn missing(&self) -> Vec<&PackageSpec> {
        self.packages
            .iter()
            .filter(|c| !c.installed)
            .map(|c| &c.spec)
            .collect()
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

/// 環境診斷：逐一檢查套件，再以除錯參數試跑入口點
pub struct Doctor<R: ProcessRunner, C: Console> {
    runner: R,
    console: C,
    manifest: LaunchManifest,
}

impl<R: ProcessRunner, C: Console> Doctor<R, C> {
    pub fn new(runner: R, console: C, manifest: LaunchManifest) -> Self {
        Self {
            runner,
            console,
            manifest,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub async fn run(&self, skip_launch: bool) -> DoctorReport {
        let mut report = DoctorReport::default();

        let runtime = match self.check_runtime().await {
            Ok(runtime) => runtime,
            Err(e) => {
                self.console.error(&format!("❌ {}", e.user_friendly_message()));
                return report;
            }
        };
        report.runtime = Some(runtime.clone());

        self.console.info("檢查依賴項...");
        for spec in self.manifest.packages() {
            let installed =
                dependencies::check_package(&self.runner, &runtime, &self.manifest, &spec).await;
            if installed {
                self.console.info(&format!("✓ {} 已安裝", spec.module));
            } else {
                self.console.info(&format!("✗ {} 未安裝", spec.module));
            }
            report.packages.push(PackageCheck { spec, installed });
        }

        let names: Vec<String> = report
            .missing()
            .iter()
            .map(|p| p.package_name().to_string())
            .collect();
        if !names.is_empty() {
            let command = dependencies::install_invocation(&runtime, &self.manifest);
            self.console.error("缺少以下依賴項，請先安裝：");
            self.console.error(&names.join(", "));
            self.console.error("可以使用以下命令安裝：");
            self.console.error(&command.display_command());
            return report;
        }

        if skip_launch {
            report.passed = true;
            return report;
        }

        self.console.info("開始運行編輯器啟動測試...");
        let invocation =
            handoff::entry_invocation(&runtime, &self.manifest, &self.manifest.smoke_args());

        match handoff::run_entry_point(&self.runner, &invocation).await {
            Ok(exit) if exit.success() => {
                report.launch = Some(exit);
                report.passed = true;
                self.console.info("測試成功：編輯器正常啟動並退出");
            }
            Ok(exit) => {
                report.launch = Some(exit);
                self.console
                    .error(&format!("測試失敗：編輯器返回錯誤代碼 {}", exit.code));
            }
            Err(e) => {
                self.console.error(&format!("測試異常：{}", e));
            }
        }

        report
    }

    async fn check_runtime(&self) -> Result<RuntimeReport> {
        let report = runtime::check_runtime(&self.runner, &self.manifest).await?;
        self.console
            .info(&format!("✓ Python {} ({})", report.version, report.program));
        Ok(report)
    }
}
