use std::time::Instant;

use serde::Serialize;

use super::romanize::romanize_one;
use crate::engine::OutputMode;
use crate::error::{truncate, ServiceError, MAX_DETAIL_CHARS};
use crate::protocol::{RomanizeBatchArgs, ToolResult};
use crate::state::AppState;
use crate::validation;

/// Items processed between voluntary yields to the scheduler.
pub const BATCH_YIELD_INTERVAL: usize = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchItem<'a> {
    index: usize,
    original: &'a str,
    romanized: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchStats {
    total: usize,
    successful: usize,
    failed: usize,
    elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponse<'a> {
    results: Vec<BatchItem<'a>>,
    language_code: Option<&'a str>,
    stats: BatchStats,
}

/// Handle a `romanize_batch` tool call.
///
/// Items run in order through the single-text flow. A failing item does not
/// abort the batch: it is returned with its original text, `success: false`
/// and the error message.
pub async fn handle(args: RomanizeBatchArgs, state: &AppState) -> Result<ToolResult, ServiceError> {
    let started = Instant::now();
    let texts = validation::validate_batch(
        &args.texts,
        state.limits.max_batch_size,
        state.limits.max_batch_item_length,
    )?;
    let language_code = args.language_code.as_deref();
    validation::validate_language_code(language_code)?;

    let mut results = Vec::with_capacity(texts.len());
    let mut failed = 0usize;

    for (index, text) in texts.iter().copied().enumerate() {
        let item = match romanize_one(text, language_code, OutputMode::Plain, state).await {
            Ok((romanized, _)) => BatchItem {
                index,
                original: text,
                romanized: romanized.into_text(),
                success: true,
                error: None,
            },
            Err(err) => {
                failed += 1;
                BatchItem {
                    index,
                    original: text,
                    romanized: text.to_string(),
                    success: false,
                    error: Some(truncate(&err.to_string(), MAX_DETAIL_CHARS)),
                }
            }
        };
        results.push(item);

        if (index + 1) % BATCH_YIELD_INTERVAL == 0 {
            tokio::task::yield_now().await;
        }
    }

    let total = results.len();
    let stats = BatchStats {
        total,
        successful: total - failed,
        failed,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    tracing::debug!(total, failed, elapsed_ms = stats.elapsed_ms, "batch romanized");

    ToolResult::json(&BatchResponse {
        results,
        language_code,
        stats,
    })
}
