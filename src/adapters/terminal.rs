use crate::domain::ports::Console;
use async_trait::async_trait;
use std::io::{IsTerminal, Write};
use tokio::io::{AsyncRead, AsyncReadExt};

/// 直接寫到終端機的 Console
#[derive(Debug, Clone, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }

    async fn read_line() -> Option<String> {
        read_answer(&mut tokio::io::stdin()).await
    }
}

/// 逐位元組讀到換行為止；不預先緩衝，換行之後的輸入留給入口點
async fn read_answer<R: AsyncRead + Unpin>(reader: &mut R) -> Option<String> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        match reader.read(&mut byte).await {
            Ok(0) if bytes.is_empty() => return None,
            Ok(0) => break,
            Ok(_) => {
                bytes.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to read from stdin: {}", e);
                return None;
            }
        }
    }

    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[async_trait]
impl Console for TerminalConsole {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message);
    }

    async fn confirm(&self, question: &str) -> bool {
        print!("{} (y/n) ", question);
        let _ = std::io::stdout().flush();

        match Self::read_line().await {
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    async fn pause(&self, prompt: &str) {
        // 非互動環境（CI、管線）不等待
        if !std::io::stdin().is_terminal() {
            return;
        }

        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let _ = Self::read_line().await;
    }
}
