use crate::config::LaunchManifest;
use crate::core::{dependencies, handoff, runtime};
use crate::domain::model::{
    DependencyStatus, EntryPointExit, LaunchState, RuntimeReport,
};
use crate::domain::ports::{Console, ProcessRunner};
use crate::utils::error::{LaunchError, Result};
use crate::utils::monitor::LaunchMonitor;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// 單一狀態的執行紀錄
#[derive(Debug, Clone)]
pub struct StageRecord {
    pub state: LaunchState,
    pub duration: Duration,
}

/// 啟動結束的方式
#[derive(Debug)]
pub enum LaunchOutcome {
    /// 入口點有被執行，退出碼原樣傳遞
    Completed(EntryPointExit),
    /// 某個關卡失敗，入口點未執行（或無法啟動）
    Aborted(LaunchError),
}

#[derive(Debug)]
pub struct LaunchReport {
    pub started_at: DateTime<Local>,
    pub stages: Vec<StageRecord>,
    pub runtime: Option<RuntimeReport>,
    pub dependencies: Option<DependencyStatus>,
    pub outcome: LaunchOutcome,
    exit_code: i32,
}

impl LaunchReport {
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn visited(&self) -> Vec<LaunchState> {
        self.stages.iter().map(|s| s.state).collect()
    }

    pub fn visited_state(&self, state: LaunchState) -> bool {
        self.stages.iter().any(|s| s.state == state)
    }

    pub fn error(&self) -> Option<&LaunchError> {
        match &self.outcome {
            LaunchOutcome::Aborted(e) => Some(e),
            LaunchOutcome::Completed(_) => None,
        }
    }

    /// 執行摘要，用於日誌
    pub fn summary(&self) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let total_duration: Duration = self.stages.iter().map(|s| s.duration).sum();
        summary.insert(
            "started_at".to_string(),
            serde_json::Value::String(self.started_at.to_rfc3339()),
        );
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((total_duration.as_millis() as u64).into()),
        );
        summary.insert(
            "exit_code".to_string(),
            serde_json::Value::Number(self.exit_code.into()),
        );

        let stages: Vec<serde_json::Value> = self
            .stages
            .iter()
            .map(|s| serde_json::Value::String(s.state.label().to_string()))
            .collect();
        summary.insert("visited_states".to_string(), serde_json::Value::Array(stages));

        if let Some(runtime) = &self.runtime {
            summary.insert(
                "interpreter".to_string(),
                serde_json::json!({
                    "program": runtime.program,
                    "version": runtime.version.to_string(),
                }),
            );
        }

        if let Some(status) = self.dependencies {
            let label = match status {
                DependencyStatus::Satisfied => "satisfied",
                DependencyStatus::Installed => "installed",
            };
            summary.insert(
                "dependencies".to_string(),
                serde_json::Value::String(label.to_string()),
            );
        }

        summary
    }
}

/// 帶資料的狀態：每一步的型別化結果推進到下一步
enum Step {
    Start,
    CheckRuntime,
    CheckDeps(RuntimeReport),
    InstallDeps(RuntimeReport),
    RunEntrypoint(RuntimeReport, DependencyStatus),
    ReportStatus(EntryPointExit),
    End(EntryPointExit),
}

impl Step {
    fn state(&self) -> LaunchState {
        match self {
            Step::Start => LaunchState::Start,
            Step::CheckRuntime => LaunchState::CheckRuntime,
            Step::CheckDeps(_) => LaunchState::CheckDeps,
            Step::InstallDeps(_) => LaunchState::InstallDeps,
            Step::RunEntrypoint(..) => LaunchState::RunEntrypoint,
            Step::ReportStatus(_) => LaunchState::ReportStatus,
            Step::End(_) => LaunchState::End,
        }
    }
}

/// 啟動監督器：START → CHECK_RUNTIME → CHECK_DEPS → (INSTALL_DEPS)? →
/// RUN_ENTRYPOINT → REPORT_STATUS → END，任何關卡失敗即終止
pub struct LaunchSupervisor<R: ProcessRunner, C: Console> {
    runner: R,
    console: C,
    manifest: LaunchManifest,
    monitor: Option<LaunchMonitor>,
}

impl<R: ProcessRunner, C: Console> LaunchSupervisor<R, C> {
    pub fn new(runner: R, console: C, manifest: LaunchManifest) -> Self {
        Self {
            runner,
            console,
            manifest,
            monitor: None,
        }
    }

    /// 啟用或停用資源監控
    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = if enabled {
            Some(LaunchMonitor::new(true))
        } else {
            None
        };
        self
    }

    pub fn manifest(&self) -> &LaunchManifest {
        &self.manifest
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// 執行整個啟動序列；`forwarded` 原樣轉發給入口點
    pub async fn run(&self, forwarded: &[String]) -> LaunchReport {
        let started_at = Local::now();
        let mut stages = Vec::new();
        let mut runtime_report = None;
        let mut dependency_status = None;
        let mut step = Step::Start;

        self.console
            .info(&format!("正在啟動 {} 編輯器...", self.manifest.project_name()));

        let outcome = loop {
            let state = step.state();
            let stage_start = Instant::now();
            tracing::debug!("➡️ Entering state: {}", state);

            let next = match step {
                Step::Start => Ok(Step::CheckRuntime),
                Step::CheckRuntime => self.check_runtime().await.map(|report| {
                    runtime_report = Some(report.clone());
                    Step::CheckDeps(report)
                }),
                Step::CheckDeps(runtime) => Ok(self.check_dependencies(runtime).await),
                Step::InstallDeps(runtime) => self
                    .install_dependencies(&runtime)
                    .await
                    .map(|()| Step::RunEntrypoint(runtime, DependencyStatus::Installed)),
                Step::RunEntrypoint(runtime, status) => {
                    dependency_status = Some(status);
                    self.run_entry_point(&runtime, forwarded)
                        .await
                        .map(Step::ReportStatus)
                }
                Step::ReportStatus(exit) => {
                    handoff::report_status(&self.console, &self.manifest, exit).await;
                    Ok(Step::End(exit))
                }
                Step::End(exit) => {
                    stages.push(StageRecord {
                        state,
                        duration: stage_start.elapsed(),
                    });
                    break LaunchOutcome::Completed(exit);
                }
            };

            stages.push(StageRecord {
                state,
                duration: stage_start.elapsed(),
            });
            if let Some(monitor) = &self.monitor {
                monitor.log_stats(state.label());
            }

            match next {
                Ok(next_step) => step = next_step,
                Err(e) => {
                    self.report_failure(&e);
                    break LaunchOutcome::Aborted(e);
                }
            }
        };

        if let Some(monitor) = &self.monitor {
            monitor.log_final_stats();
        }

        let exit_code = match &outcome {
            LaunchOutcome::Completed(exit) => exit.code,
            LaunchOutcome::Aborted(e) => e.exit_code(),
        };

        LaunchReport {
            started_at,
            stages,
            runtime: runtime_report,
            dependencies: dependency_status,
            outcome,
            exit_code,
        }
    }

    async fn check_runtime(&self) -> Result<RuntimeReport> {
        let report = runtime::check_runtime(&self.runner, &self.manifest).await?;
        self.console
            .info(&format!("✓ Python {} ({})", report.version, report.program));
        Ok(report)
    }

    // 原子探測：全部存在則跳過安裝
    async fn check_dependencies(&self, runtime: RuntimeReport) -> Step {
        if dependencies::probe_dependencies(&self.runner, &runtime, &self.manifest).await {
            tracing::info!("✅ All dependencies present");
            self.console.info("✓ 依賴項檢查通過");
            Step::RunEntrypoint(runtime, DependencyStatus::Satisfied)
        } else {
            self.console.info("缺少依賴項");
            Step::InstallDeps(runtime)
        }
    }

    async fn install_dependencies(&self, runtime: &RuntimeReport) -> Result<()> {
        dependencies::install_dependencies(&self.runner, &self.console, runtime, &self.manifest)
            .await?;
        self.console.info("依賴項安裝成功！");
        Ok(())
    }

    async fn run_entry_point(
        &self,
        runtime: &RuntimeReport,
        forwarded: &[String],
    ) -> Result<EntryPointExit> {
        let invocation = handoff::entry_invocation(runtime, &self.manifest, forwarded);
        handoff::run_entry_point(&self.runner, &invocation).await
    }

    fn report_failure(&self, error: &LaunchError) {
        tracing::error!(
            "❌ Launch aborted: {} (Category: {:?}, Severity: {:?})",
            error,
            error.category(),
            error.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());

        self.console.error(&format!("❌ {}", error.user_friendly_message()));
        self.console
            .error(&format!("💡 建議: {}", error.recovery_suggestion()));
    }
}
