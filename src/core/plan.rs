use crate::config::{InstallMode, LaunchManifest};
use crate::core::{dependencies, handoff};
use crate::domain::model::{RuntimeReport, RuntimeVersion};

/// 不執行任何命令的啟動計畫，供 `--dry-run` 顯示
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub candidates: Vec<String>,
    pub min_version: String,
    pub probe_command: String,
    pub install_command: String,
    pub install_mode: InstallMode,
    pub entry_command: String,
    pub log_dir: String,
}

impl LaunchPlan {
    /// 以第一個候選直譯器代入命令
    pub fn build(manifest: &LaunchManifest, forwarded: &[String]) -> Self {
        let candidates = manifest.runtime_candidates();
        let assumed = RuntimeReport {
            program: candidates
                .first()
                .cloned()
                .unwrap_or_else(|| "python".to_string()),
            version: manifest
                .min_version()
                .unwrap_or(RuntimeVersion::new(0, 0, 0)),
        };

        Self {
            candidates,
            min_version: manifest.min_version_str().to_string(),
            probe_command: dependencies::probe_invocation(&assumed, manifest).display_command(),
            install_command: dependencies::install_invocation(&assumed, manifest)
                .display_command(),
            install_mode: manifest.install_mode(),
            entry_command: handoff::entry_invocation(&assumed, manifest, forwarded)
                .display_command(),
            log_dir: manifest.log_dir().display().to_string(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            "🔍 Launch Plan:".to_string(),
            format!(
                "  1. Runtime: first of [{}] reporting Python >= {}",
                self.candidates.join(", "),
                self.min_version
            ),
            format!("  2. Dependency probe: {}", self.probe_command),
            format!(
                "     On failure ({:?}): {}",
                self.install_mode, self.install_command
            ),
            format!("  3. Entry point: {}", self.entry_command),
            format!("  4. On non-zero exit: report code, logs in {}", self.log_dir),
        ]
    }
}
