//! Plain JSON romanization endpoint for callers that do not speak MCP.
//!
//! Body is `{"text": ...}` or `{"texts": [...]}` with an optional
//! `lang_code`. Validation and caching are the same as for the tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::romanize::romanize_one;
use crate::engine::OutputMode;
use crate::error::{elide, ServiceError};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestRequest {
    #[serde(default)]
    pub text: Value,
    #[serde(default)]
    pub texts: Option<Value>,
    #[serde(default, alias = "languageCode")]
    pub lang_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct SingleResponse<'a> {
    original: &'a str,
    romanized: String,
    lang_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct BatchResponse<'a> {
    originals: Vec<&'a str>,
    romanized: Vec<String>,
    lang_code: Option<&'a str>,
    count: usize,
}

/// Route a REST body to the single or batch flow. A `texts` key selects batch.
pub async fn handle(request: RestRequest, state: &AppState) -> Result<Value, ServiceError> {
    let lang_code = request.lang_code.as_deref();
    validation::validate_language_code(lang_code)?;

    match &request.texts {
        Some(texts) => batch(texts, lang_code, state).await,
        None => single(&request.text, lang_code, state).await,
    }
}

async fn single(value: &Value, lang_code: Option<&str>, state: &AppState) -> Result<Value, ServiceError> {
    let text = validation::validate_text(value, "text", state.limits.max_text_length)?;
    validation::validate_non_empty(text, "text")?;

    let (romanized, _) = romanize_one(text, lang_code, OutputMode::Plain, state).await?;

    to_value(&SingleResponse {
        original: text,
        romanized: romanized.into_text(),
        lang_code,
    })
}

/// Failed items come back unchanged so the output stays aligned with the input.
async fn batch(value: &Value, lang_code: Option<&str>, state: &AppState) -> Result<Value, ServiceError> {
    let texts = validation::validate_batch(
        value,
        state.limits.max_batch_size,
        state.limits.max_batch_item_length,
    )?;
    if texts.is_empty() {
        return Err(ServiceError::InvalidInput("`texts` must not be empty".to_string()));
    }

    let mut romanized = Vec::with_capacity(texts.len());
    for text in texts.iter().copied() {
        match romanize_one(text, lang_code, OutputMode::Plain, state).await {
            Ok((output, _)) => romanized.push(output.into_text()),
            Err(err) => {
                tracing::warn!(text = %elide(text), error = %err, "batch item left unromanized");
                romanized.push(text.to_string());
            }
        }
    }

    to_value(&BatchResponse {
        count: texts.len(),
        originals: texts,
        romanized,
        lang_code,
    })
}

fn to_value<T: Serialize>(payload: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(payload).map_err(|e| ServiceError::Internal(e.to_string()))
}
