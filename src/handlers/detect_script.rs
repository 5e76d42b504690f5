use serde::Serialize;

use crate::error::ServiceError;
use crate::protocol::{DetectScriptArgs, ToolResult};
use crate::script::{self, CharacterScript, ScriptDistribution};
use crate::state::AppState;
use crate::validation;

/// Characters listed in a detailed response.
pub const DETAIL_CHARACTER_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
struct DetectScriptResponse {
    #[serde(flatten)]
    distribution: ScriptDistribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    characters: Option<Vec<CharacterScript>>,
}

/// Handle a `detect_script` tool call. Pure; never touches the engine.
pub async fn handle(args: DetectScriptArgs, state: &AppState) -> Result<ToolResult, ServiceError> {
    let text = validation::validate_text(&args.text, "text", state.limits.max_detect_length)?;

    let response = DetectScriptResponse {
        distribution: script::distribution(text),
        characters: args
            .detailed
            .then(|| script::character_scripts(text, DETAIL_CHARACTER_LIMIT)),
    };

    ToolResult::json(&response)
}
