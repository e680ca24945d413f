use crate::domain::ports::ComposerRunner;
use crate::utils::error::{Result, SetupError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

/// 以子行程執行 composer，逐行轉送輸出
#[derive(Debug, Clone)]
pub struct ComposerProcess {
    binary: String,
    working_dir: PathBuf,
    last_exit_code: Option<i32>,
}

impl ComposerProcess {
    pub fn new(binary: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            working_dir: working_dir.into(),
            last_exit_code: None,
        }
    }

    pub fn last_exit_code(&self) -> Option<i32> {
        self.last_exit_code
    }

    fn require_args(packages: &[String]) -> Vec<String> {
        let mut args = Vec::with_capacity(packages.len() + 2);
        args.push("require".to_string());
        args.extend(packages.iter().cloned());
        args.push("--no-interaction".to_string());
        args
    }
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    // 以位元組讀取；非 UTF-8 輸出也要讀完，不能提早關閉管線
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let chunk = String::from_utf8_lossy(&buf).into_owned();
                if tx.send(chunk).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to read composer output: {}", e);
                break;
            }
        }
    }
}

#[async_trait]
impl ComposerRunner for ComposerProcess {
    async fn require(
        &mut self,
        packages: &[String],
        on_output: &(dyn for<'a> Fn(&'a str) + Send + Sync),
    ) -> Result<i32> {
        let args = Self::require_args(packages);
        tracing::debug!("🎼 Running {} {}", self.binary, args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .current_dir(&self.working_dir)
            .env("COMPOSER_NO_INTERACTION", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SetupError::Process {
                program: self.binary.clone(),
                message: e.to_string(),
            })?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, tx.clone()));
        }
        drop(tx);

        while let Some(chunk) = rx.recv().await {
            on_output(&chunk);
        }

        let status = child.wait().await?;
        // 被訊號終止時沒有結束代碼
        let code = status.code().unwrap_or(-1);
        self.last_exit_code = Some(code);

        tracing::debug!("🎼 composer exited with {}", code);
        Ok(code)
    }
}
