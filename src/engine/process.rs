use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{EngineError, EngineHandle, OutputMode, RomanizationEngine, Transformed};
use crate::error::truncate;

/// Probe text romanized once during initialization.
const WARMUP_TEXT: &str = "warmup";

/// Stderr characters kept in engine error messages.
const MAX_STDERR_CHARS: usize = 300;

/// Engine backed by an external `uroman` executable.
///
/// Each transform spawns the command, writes the text to stdin and reads
/// the romanization from stdout. The command line is split on whitespace,
/// so `python3 -m uroman` works as well as a plain `uroman`.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    base_args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    pub fn from_command_line(command_line: &str) -> Self {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| "uroman".to_string());
        Self {
            program,
            base_args: parts.collect(),
        }
    }

    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[async_trait]
impl RomanizationEngine for ProcessEngine {
    fn name(&self) -> &str {
        "uroman-process"
    }

    async fn initialize(&self, cache_size_hint: usize) -> Result<Arc<dyn EngineHandle>, EngineError> {
        let handle = ProcessHandle {
            program: self.program.clone(),
            base_args: self.base_args.clone(),
        };

        let started = Instant::now();
        handle
            .run(WARMUP_TEXT, None, OutputMode::Plain)
            .await
            .map_err(|e| EngineError::Unavailable(format!("warm-up with `{}` failed: {e}", self.program)))?;

        // The subprocess keeps no state between calls, so the hint only
        // shows up in the log.
        tracing::info!(
            program = %self.program,
            cache_size_hint,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "uroman process engine ready",
        );

        Ok(Arc::new(handle))
    }
}

struct ProcessHandle {
    program: String,
    base_args: Vec<String>,
}

impl ProcessHandle {
    async fn run(
        &self,
        text: &str,
        language_code: Option<&str>,
        mode: OutputMode,
    ) -> Result<String, EngineError> {
        let mut command = Command::new(&self.program);
        command.args(&self.base_args);
        if let Some(code) = language_code {
            command.arg("-l").arg(code);
        }
        if mode == OutputMode::Annotated {
            command.arg("-f").arg("edges");
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .map_err(|e| EngineError::Unavailable(format!("cannot spawn `{}`: {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Failed("child stdin not captured".into()))?;

        // Feed stdin concurrently with reading stdout so a large input cannot
        // deadlock on a full pipe.
        let input = format!("{text}\n");
        let writer = tokio::spawn(async move {
            stdin.write_all(input.as_bytes()).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| EngineError::Failed(format!("waiting for `{}`: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Failed(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                truncate(stderr.trim(), MAX_STDERR_CHARS)
            )));
        }

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(EngineError::Failed(format!("writing to `{}`: {e}", self.program))),
            Err(e) => return Err(EngineError::Failed(format!("stdin writer aborted: {e}"))),
        }

        String::from_utf8(output.stdout)
            .map_err(|_| EngineError::Failed(format!("`{}` produced non-UTF-8 output", self.program)))
    }
}

#[async_trait]
impl EngineHandle for ProcessHandle {
    async fn transform(
        &self,
        text: &str,
        language_code: Option<&str>,
        mode: OutputMode,
    ) -> Result<Transformed, EngineError> {
        let stdout = self.run(text, language_code, mode).await?;

        match mode {
            OutputMode::Plain => {
                let romanized = stdout.strip_suffix('\n').unwrap_or(&stdout);
                let romanized = romanized.strip_suffix('\r').unwrap_or(romanized);
                Ok(Transformed::Plain(romanized.to_string()))
            }
            OutputMode::Annotated => {
                let lines = stdout
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| {
                        serde_json::from_str::<Value>(line).map_err(|e| {
                            EngineError::Failed(format!("unparseable annotated output: {e}"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Transformed::Annotated(Value::Array(lines)))
            }
        }
    }

    fn reset_cache(&self) {
        tracing::debug!(program = %self.program, "process engine holds no cache");
    }
}
