#![allow(dead_code)]

use async_trait::async_trait;
use pycraft_launcher::core::{CommandOutput, Console, Invocation, ProcessRunner};
use pycraft_launcher::LaunchManifest;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

/// 假的行程執行器：依參數形狀判斷是版本探測、依賴探測、安裝或入口點
#[derive(Default)]
pub struct FakeRunner {
    /// 程式名 → (版本探測的退出碼, 輸出)
    versions: HashMap<String, (i32, String)>,
    missing_modules: HashSet<String>,
    install_code: Option<i32>,
    entry_code: Option<i32>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            install_code: Some(0),
            entry_code: Some(0),
            ..Default::default()
        }
    }

    pub fn with_interpreter(mut self, program: &str, version_output: &str) -> Self {
        self.versions
            .insert(program.to_string(), (0, version_output.to_string()));
        self
    }

    /// 能啟動但版本探測失敗或輸出無法解析的直譯器
    pub fn with_broken_interpreter(mut self, program: &str, exit_code: i32, output: &str) -> Self {
        self.versions
            .insert(program.to_string(), (exit_code, output.to_string()));
        self
    }

    pub fn with_missing_module(mut self, module: &str) -> Self {
        self.missing_modules.insert(module.to_string());
        self
    }

    /// None 代表安裝程式無法啟動
    pub fn with_install_code(mut self, code: Option<i32>) -> Self {
        self.install_code = code;
        self
    }

    /// None 代表入口點無法啟動
    pub fn with_entry_code(mut self, code: Option<i32>) -> Self {
        self.entry_code = code;
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn probes(&self) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.args.first().map(String::as_str) == Some("-c"))
            .collect()
    }

    pub fn installs(&self) -> Vec<Invocation> {
        self.calls().into_iter().filter(is_install).collect()
    }

    pub fn entries(&self) -> Vec<Invocation> {
        self.calls().into_iter().filter(is_entry).collect()
    }

    fn record(&self, invocation: &Invocation) {
        self.calls.lock().unwrap().push(invocation.clone());
    }

    fn not_found(program: &str) -> std::io::Error {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{}: not found", program),
        )
    }
}

fn is_version(invocation: &Invocation) -> bool {
    invocation.args == ["--version"]
}

fn is_install(invocation: &Invocation) -> bool {
    invocation.args.len() >= 2 && invocation.args[0] == "-m" && invocation.args[1] == "pip"
}

fn is_entry(invocation: &Invocation) -> bool {
    !is_version(invocation)
        && !is_install(invocation)
        && invocation.args.first().map(String::as_str) != Some("-c")
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn output(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        self.record(invocation);

        let Some((version_code, version)) = self.versions.get(&invocation.program) else {
            return Err(Self::not_found(&invocation.program));
        };

        if is_version(invocation) {
            return Ok(CommandOutput {
                exit_code: *version_code,
                stdout: version.clone(),
                stderr: String::new(),
            });
        }

        // -c "import a, b"
        let statement = invocation.args.get(1).cloned().unwrap_or_default();
        let modules = statement.trim_start_matches("import ");
        let missing: Vec<&str> = modules
            .split(',')
            .map(str::trim)
            .filter(|m| self.missing_modules.contains(*m))
            .collect();

        if missing.is_empty() {
            Ok(CommandOutput::default())
        } else {
            Ok(CommandOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: format!("ModuleNotFoundError: No module named '{}'", missing[0]),
            })
        }
    }

    async fn status(&self, invocation: &Invocation) -> std::io::Result<i32> {
        self.record(invocation);

        let code = if is_install(invocation) {
            self.install_code
        } else {
            self.entry_code
        };
        code.ok_or_else(|| Self::not_found(&invocation.program))
    }
}

/// 記錄所有輸出的 Console
#[derive(Default)]
pub struct RecordingConsole {
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    questions: Mutex<Vec<String>>,
    pauses: Mutex<usize>,
    answer: bool,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Default::default()
        }
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    pub fn pauses(&self) -> usize {
        *self.pauses.lock().unwrap()
    }

    pub fn all_output(&self) -> String {
        let mut lines = self.infos();
        lines.extend(self.errors());
        lines.join("\n")
    }
}

#[async_trait]
impl Console for RecordingConsole {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    async fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answer
    }

    async fn pause(&self, _prompt: &str) {
        *self.pauses.lock().unwrap() += 1;
    }
}

/// 以暫存目錄為專案根目錄的清單，`extra` 會附加在最後
pub fn manifest_in(root: &Path, extra: &str) -> LaunchManifest {
    // Windows 路徑的反斜線在 TOML 字串中需避免
    let normalized = root.to_string_lossy().replace('\\', "/");
    let content = format!(
        r#"
version = 1

[project]
name = "PyCraft"
root = "{}"

{}
"#,
        normalized, extra
    );

    LaunchManifest::from_toml_str(&content).expect("test manifest should parse")
}

pub fn write_requirements(root: &Path) {
    std::fs::write(root.join("requirements.txt"), "numpy\npygame\n")
        .expect("failed to write requirements.txt");
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
