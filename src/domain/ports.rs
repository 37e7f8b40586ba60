use crate::domain::model::{CommandOutput, Invocation};
use async_trait::async_trait;

/// 執行外部命令的介面，測試時以假實現替換
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// 執行並捕獲 stdout/stderr
    async fn output(&self, invocation: &Invocation) -> std::io::Result<CommandOutput>;

    /// 繼承 stdio 執行，回傳退出碼
    async fn status(&self, invocation: &Invocation) -> std::io::Result<i32>;
}

/// 面向使用者的輸出與互動
#[async_trait]
pub trait Console: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);

    /// 是/否提問，預設否
    async fn confirm(&self, question: &str) -> bool;

    /// 等待使用者按下 Enter
    async fn pause(&self, prompt: &str);
}
