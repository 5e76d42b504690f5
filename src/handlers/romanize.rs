use serde::Serialize;

use crate::cache;
use crate::engine::{OutputMode, Transformed};
use crate::error::ServiceError;
use crate::protocol::{RomanizeArgs, ToolResult};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RomanizeResponse<'a> {
    original: &'a str,
    romanized: Transformed,
    language_code: Option<&'a str>,
    output_mode: OutputMode,
    cached: bool,
}

/// Handle a `romanize` tool call.
pub async fn handle(args: RomanizeArgs, state: &AppState) -> Result<ToolResult, ServiceError> {
    let text = validation::validate_text(&args.text, "text", state.limits.max_text_length)?;
    validation::validate_non_empty(text, "text")?;
    let language_code = args.language_code.as_deref();
    validation::validate_language_code(language_code)?;

    let (romanized, cached) = romanize_one(text, language_code, args.output_mode, state).await?;

    ToolResult::json(&RomanizeResponse {
        original: text,
        romanized,
        language_code,
        output_mode: args.output_mode,
        cached,
    })
}

/// Single-item flow shared with the batch tool. Input must already be
/// validated.
///
/// Plain mode reads and fills the result cache; annotated mode always goes
/// to the engine. Returns the output and whether it came from the cache.
pub(crate) async fn romanize_one(
    text: &str,
    language_code: Option<&str>,
    mode: OutputMode,
    state: &AppState,
) -> Result<(Transformed, bool), ServiceError> {
    if mode == OutputMode::Annotated {
        let output = state.client.romanize(text, language_code, mode).await?;
        return Ok((output, false));
    }

    let key = cache::fingerprint(text, language_code, mode);
    if let Some(hit) = state.cache.get(&key) {
        tracing::trace!(language = language_code.unwrap_or("auto"), "cache hit");
        return Ok((Transformed::Plain(hit), true));
    }

    match state.client.romanize(text, language_code, mode).await? {
        Transformed::Plain(romanized) => {
            state.cache.put(key, romanized.clone());
            Ok((Transformed::Plain(romanized), false))
        }
        // Only plain strings are cached.
        other => Ok((other, false)),
    }
}
