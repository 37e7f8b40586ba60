use crate::domain::model::RuntimeVersion;
use crate::utils::error::{LaunchError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MANIFEST_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_MANIFEST_FILE: &str = "launcher.toml";

const DEFAULT_MIN_VERSION: &str = "3.7";
const DEFAULT_DOWNLOAD_URL: &str = "https://www.python.org/downloads/";
const DEFAULT_REQUIREMENTS: &str = "requirements.txt";
const DEFAULT_ENTRY_SCRIPT: &str = "editor_main.py";
const DEFAULT_LOG_DIR: &str = "logs";

/// 啟動清單，啟動時載入一次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchManifest {
    pub version: u32,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub dependencies: DependencyConfig,
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(default)]
    pub entry: EntryConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub doctor: Option<DoctorConfig>,

    /// 清單檔所在目錄，相對路徑以此為基準
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: Option<String>,
    pub root: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub candidates: Option<Vec<String>>,
    pub min_version: Option<String>,
    pub version_args: Option<Vec<String>>,
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyConfig {
    pub packages: Option<Vec<PackageSpec>>,
    pub manifest: Option<String>,
    pub probe_args: Option<Vec<String>>,
    pub install_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// import 用的模組名
    pub module: String,
    /// pip 套件名，省略時同模組名
    pub package: Option<String>,
}

impl PackageSpec {
    pub fn new(module: &str) -> Self {
        Self {
            module: module.to_string(),
            package: None,
        }
    }

    pub fn with_package(module: &str, package: &str) -> Self {
        Self {
            module: module.to_string(),
            package: Some(package.to_string()),
        }
    }

    pub fn package_name(&self) -> &str {
        self.package.as_deref().unwrap_or(&self.module)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMode {
    #[default]
    Auto,
    Prompt,
    Never,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallConfig {
    pub mode: Option<InstallMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryConfig {
    pub script: Option<String>,
    pub args: Option<Vec<String>>,
    pub working_dir: Option<String>,
    pub hide_console: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub log_dir: Option<String>,
    pub pause_on_error: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorConfig {
    pub smoke_args: Option<Vec<String>>,
}

impl Default for LaunchManifest {
    fn default() -> Self {
        Self {
            version: MANIFEST_SCHEMA_VERSION,
            project: ProjectConfig::default(),
            runtime: RuntimeConfig::default(),
            dependencies: DependencyConfig::default(),
            install: InstallConfig::default(),
            entry: EntryConfig::default(),
            report: ReportConfig::default(),
            doctor: None,
            base_dir: None,
        }
    }
}

impl LaunchManifest {
    /// 指定路徑時必須存在；否則找目前目錄的 launcher.toml，再退回內建預設
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_MANIFEST_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    tracing::debug!("No {} found, using built-in manifest", DEFAULT_MANIFEST_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// 從 TOML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LaunchError::ConfigError {
            message: format!("cannot read manifest '{}': {}", path.display(), e),
        })?;

        let mut manifest = Self::from_toml_str(&content)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// 從 TOML 字串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LaunchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PYTHON_HOME})，未設定的保持原樣。
    /// 值在解析前插入 TOML 字串內，`\` 與 `"` 需先跳脫
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LaunchError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => escape_toml_basic(&value),
                Err(_) => format!("${{{}}}", var_name),
            }
        });

        Ok(result.to_string())
    }

    pub fn project_name(&self) -> &str {
        self.project.name.as_deref().unwrap_or("PyCraft")
    }

    pub fn project_root(&self) -> PathBuf {
        let root = self.project.root.as_deref().unwrap_or(".");
        match &self.base_dir {
            Some(base) if !base.as_os_str().is_empty() => base.join(root),
            _ => PathBuf::from(root),
        }
    }

    /// 含路徑分隔符的相對候選（例如 `.venv/bin/python`）以專案根目錄為基準，
    /// 之後每個步驟都用同一個路徑
    pub fn runtime_candidates(&self) -> Vec<String> {
        let candidates = self.runtime.candidates.clone().unwrap_or_else(|| {
            let mut candidates = vec!["python3".to_string(), "python".to_string()];
            if cfg!(windows) {
                candidates.push("py".to_string());
            }
            candidates
        });

        candidates
            .into_iter()
            .map(|candidate| self.resolve_candidate(candidate))
            .collect()
    }

    fn resolve_candidate(&self, candidate: String) -> String {
        let has_separator = candidate.contains('/') || candidate.contains('\\');
        if !has_separator || Path::new(&candidate).is_absolute() {
            return candidate;
        }
        self.project_root()
            .join(&candidate)
            .to_string_lossy()
            .into_owned()
    }

    pub fn min_version_str(&self) -> &str {
        self.runtime.min_version.as_deref().unwrap_or(DEFAULT_MIN_VERSION)
    }

    pub fn min_version(&self) -> Result<RuntimeVersion> {
        let raw = self.min_version_str();
        raw.parse::<RuntimeVersion>().map_err(|reason| LaunchError::InvalidConfigValueError {
            field: "runtime.min_version".to_string(),
            value: raw.to_string(),
            reason,
        })
    }

    pub fn version_args(&self) -> Vec<String> {
        self.runtime
            .version_args
            .clone()
            .unwrap_or_else(|| vec!["--version".to_string()])
    }

    pub fn download_url(&self) -> &str {
        self.runtime
            .download_url
            .as_deref()
            .unwrap_or(DEFAULT_DOWNLOAD_URL)
    }

    pub fn packages(&self) -> Vec<PackageSpec> {
        self.dependencies.packages.clone().unwrap_or_else(|| {
            vec![
                PackageSpec::new("PyQt5"),
                PackageSpec::with_package("OpenGL", "PyOpenGL"),
                PackageSpec::new("numpy"),
                PackageSpec::new("pybullet"),
                PackageSpec::new("pygame"),
            ]
        })
    }

    /// 依賴清單檔，相對於專案根目錄
    pub fn dependency_manifest(&self) -> &str {
        self.dependencies
            .manifest
            .as_deref()
            .unwrap_or(DEFAULT_REQUIREMENTS)
    }

    pub fn dependency_manifest_path(&self) -> PathBuf {
        self.project_root().join(self.dependency_manifest())
    }

    /// 單次探測所有依賴的參數，`{modules}` 會被替換
    pub fn probe_args(&self) -> Vec<String> {
        let modules = self
            .packages()
            .iter()
            .map(|p| p.module.clone())
            .collect::<Vec<_>>()
            .join(", ");
        self.probe_args_for(&modules)
    }

    pub fn probe_args_for(&self, modules: &str) -> Vec<String> {
        let template = self
            .dependencies
            .probe_args
            .clone()
            .unwrap_or_else(|| vec!["-c".to_string(), "import {modules}".to_string()]);
        expand_template(&template, &[("modules", modules)])
    }

    pub fn install_args(&self) -> Vec<String> {
        let template = self.dependencies.install_args.clone().unwrap_or_else(|| {
            ["-m", "pip", "install", "-r", "{manifest}"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        });
        expand_template(&template, &[("manifest", self.dependency_manifest())])
    }

    pub fn install_mode(&self) -> InstallMode {
        self.install.mode.unwrap_or_default()
    }

    pub fn entry_script(&self) -> &str {
        self.entry.script.as_deref().unwrap_or(DEFAULT_ENTRY_SCRIPT)
    }

    pub fn entry_args(&self) -> Vec<String> {
        self.entry.args.clone().unwrap_or_default()
    }

    pub fn entry_working_dir(&self) -> PathBuf {
        match &self.entry.working_dir {
            Some(dir) => self.project_root().join(dir),
            None => self.project_root(),
        }
    }

    pub fn hide_console(&self) -> bool {
        self.entry.hide_console.unwrap_or(false)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.project_root()
            .join(self.report.log_dir.as_deref().unwrap_or(DEFAULT_LOG_DIR))
    }

    /// 預設只在 Windows 暫停（對應雙擊 .bat 的情境）
    pub fn pause_on_error(&self) -> bool {
        self.report.pause_on_error.unwrap_or(cfg!(windows))
    }

    pub fn smoke_args(&self) -> Vec<String> {
        self.doctor
            .as_ref()
            .and_then(|d| d.smoke_args.clone())
            .unwrap_or_else(|| vec!["--debug".to_string()])
    }

    /// 驗證清單的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.version != MANIFEST_SCHEMA_VERSION {
            return Err(LaunchError::InvalidConfigValueError {
                field: "version".to_string(),
                value: self.version.to_string(),
                reason: format!(
                    "Unsupported manifest version. Supported: {}",
                    MANIFEST_SCHEMA_VERSION
                ),
            });
        }

        let candidates = self.runtime_candidates();
        validation::validate_non_empty_list("runtime.candidates", &candidates)?;
        for candidate in &candidates {
            validation::validate_non_empty_string("runtime.candidates", candidate)?;
        }

        self.min_version()?;
        validation::validate_url("runtime.download_url", self.download_url())?;

        let packages = self.packages();
        validation::validate_non_empty_list("dependencies.packages", &packages)?;
        for package in &packages {
            validation::validate_module_name("dependencies.packages", &package.module)?;
            validation::validate_non_empty_string("dependencies.packages", package.package_name())?;
        }

        validation::validate_path("dependencies.manifest", self.dependency_manifest())?;
        validation::validate_non_empty_list("dependencies.probe_args", &self.probe_args())?;
        validation::validate_non_empty_list("dependencies.install_args", &self.install_args())?;

        validation::validate_path("entry.script", self.entry_script())?;
        if let Some(dir) = &self.entry.working_dir {
            validation::validate_path("entry.working_dir", dir)?;
        }
        if let Some(dir) = &self.report.log_dir {
            validation::validate_path("report.log_dir", dir)?;
        }

        Ok(())
    }
}

impl Validate for LaunchManifest {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// 將 `{key}` 替換成對應的值
pub fn expand_template(template: &[String], vars: &[(&str, &str)]) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            vars.iter().fold(arg.clone(), |acc, (key, value)| {
                acc.replace(&format!("{{{}}}", key), value)
            })
        })
        .collect()
}

fn escape_toml_basic(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
