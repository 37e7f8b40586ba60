use crate::config::LaunchManifest;
use crate::domain::model::{Invocation, RuntimeReport, RuntimeVersion};
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{LaunchError, Result};
use regex::Regex;

/// 從 `--version` 的輸出擷取第一個版本號
pub fn parse_version(output: &str) -> Option<RuntimeVersion> {
    let re = Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").ok()?;
    let caps = re.captures(output)?;

    Some(RuntimeVersion {
        major: caps.get(1)?.as_str().parse().ok()?,
        minor: caps.get(2)?.as_str().parse().ok()?,
        patch: caps
            .get(3)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0),
    })
}

/// 依序探測候選直譯器，回傳第一個版本足夠的
pub async fn check_runtime<R: ProcessRunner + ?Sized>(
    runner: &R,
    manifest: &LaunchManifest,
) -> Result<RuntimeReport> {
    let min_version = manifest.min_version()?;
    let candidates = manifest.runtime_candidates();
    let mut too_old: Option<(String, RuntimeVersion)> = None;

    for program in &candidates {
        let invocation = Invocation::new(program.as_str()).args(manifest.version_args());

        let output = match runner.output(&invocation).await {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("⏭️ Interpreter candidate '{}' unavailable: {}", program, e);
                continue;
            }
        };

        if !output.success() {
            tracing::debug!(
                "⏭️ Interpreter candidate '{}' exited with code {}",
                program,
                output.exit_code
            );
            continue;
        }

        let Some(version) = parse_version(&output.combined()) else {
            tracing::warn!(
                "⚠️ Could not read a version from '{}': {}",
                program,
                output.combined().trim()
            );
            continue;
        };

        if version < min_version {
            tracing::warn!(
                "⚠️ Interpreter '{}' is {}, need {} or newer",
                program,
                version,
                min_version
            );
            if too_old.is_none() {
                too_old = Some((program.clone(), version));
            }
            continue;
        }

        tracing::info!("🐍 Using interpreter '{}' ({})", program, version);
        return Ok(RuntimeReport {
            program: program.clone(),
            version,
        });
    }

    match too_old {
        Some((program, found)) => Err(LaunchError::RuntimeTooOld {
            program,
            found: found.to_string(),
            min_version: manifest.min_version_str().to_string(),
            download_url: manifest.download_url().to_string(),
        }),
        None => Err(LaunchError::RuntimeNotFound {
            tried: candidates,
            min_version: manifest.min_version_str().to_string(),
            download_url: manifest.download_url().to_string(),
        }),
    }
}
