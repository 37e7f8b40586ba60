use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("No usable interpreter found (tried: {}); {min_version} or newer is required", .tried.join(", "))]
    RuntimeNotFound {
        tried: Vec<String>,
        min_version: String,
        download_url: String,
    },

    #[error("Interpreter '{program}' reports version {found}, but {min_version} or newer is required")]
    RuntimeTooOld {
        program: String,
        found: String,
        min_version: String,
        download_url: String,
    },

    #[error("Dependency installation failed: {reason}")]
    DependencyInstallFailed { command: String, reason: String },

    #[error("Dependency installation declined")]
    DependencyInstallDeclined { command: String },

    #[error("Failed to start entry point '{program}': {source}")]
    EntryPointSpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Runtime,
    Dependency,
    Process,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl LaunchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LaunchError::RuntimeNotFound { .. } | LaunchError::RuntimeTooOld { .. } => {
                ErrorCategory::Runtime
            }
            LaunchError::DependencyInstallFailed { .. }
            | LaunchError::DependencyInstallDeclined { .. } => ErrorCategory::Dependency,
            LaunchError::EntryPointSpawnError { .. } => ErrorCategory::Process,
            LaunchError::ConfigError { .. }
            | LaunchError::ConfigValidationError { .. }
            | LaunchError::InvalidConfigValueError { .. }
            | LaunchError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Runtime | ErrorCategory::Dependency => {
                ErrorSeverity::High
            }
            ErrorCategory::Process => ErrorSeverity::Critical,
        }
    }

    /// 每個致命錯誤都以 1 結束行程；入口點自身的退出碼不經過此處
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LaunchError::RuntimeNotFound {
                min_version,
                download_url,
                ..
            }
            | LaunchError::RuntimeTooOld {
                min_version,
                download_url,
                ..
            } => format!(
                "Install Python {} or newer from {} and make sure it is on PATH",
                min_version, download_url
            ),
            LaunchError::DependencyInstallFailed { command, .. }
            | LaunchError::DependencyInstallDeclined { command, .. } => {
                format!("Install the dependencies manually: {}", command)
            }
            LaunchError::EntryPointSpawnError { program, .. } => format!(
                "Check that '{}' exists and is executable, and that the entry script path is correct",
                program
            ),
            LaunchError::ConfigError { .. }
            | LaunchError::ConfigValidationError { .. }
            | LaunchError::InvalidConfigValueError { .. }
            | LaunchError::MissingConfigError { .. } => {
                "Fix the launcher manifest (launcher.toml) and try again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LaunchError::RuntimeNotFound {
                min_version,
                download_url,
                ..
            } => format!(
                "錯誤: 未找到 Python。PyCraft 需要 Python {} 或更高版本，請從 {} 下載安裝。",
                min_version, download_url
            ),
            LaunchError::RuntimeTooOld {
                found,
                min_version,
                download_url,
                ..
            } => format!(
                "錯誤: Python 版本 {} 過舊。PyCraft 需要 Python {} 或更高版本，請從 {} 下載安裝。",
                found, min_version, download_url
            ),
            LaunchError::DependencyInstallFailed { command, reason } => format!(
                "依賴項安裝失敗 ({})。請手動執行: {}",
                reason, command
            ),
            LaunchError::DependencyInstallDeclined { command } => {
                format!("請手動安裝依賴項後再啟動: {}", command)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
