use serde::Serialize;
use serde_json::json;

use super::health;
use crate::error::ServiceError;
use crate::protocol::ToolResult;
use crate::script::Script;
use crate::state::AppState;

pub const LANGUAGES_URI: &str = "uroman://languages";
pub const SCRIPTS_URI: &str = "uroman://scripts";
pub const STATS_URI: &str = "uroman://stats";
pub const EXAMPLES_URI_PREFIX: &str = "uroman://examples/";

/// Language hints with dedicated engine rules.
const LANGUAGES: &[(&str, &str)] = &[
    ("amh", "Amharic"),
    ("ara", "Arabic"),
    ("ben", "Bengali"),
    ("bod", "Tibetan"),
    ("egy", "Egyptian"),
    ("ell", "Greek"),
    ("fas", "Persian"),
    ("heb", "Hebrew"),
    ("hin", "Hindi"),
    ("jpn", "Japanese"),
    ("kor", "Korean"),
    ("mar", "Marathi"),
    ("mya", "Burmese"),
    ("nep", "Nepali"),
    ("rus", "Russian"),
    ("tam", "Tamil"),
    ("tha", "Thai"),
    ("tlh", "Klingon"),
    ("tur", "Turkish"),
    ("tzm", "Tamazight"),
    ("uig", "Uyghur"),
    ("zho", "Chinese"),
];

#[derive(Debug, Clone, Copy, Serialize)]
struct Example {
    original: &'static str,
    romanized: &'static str,
    #[serde(rename = "languageCode", skip_serializing_if = "Option::is_none")]
    language_code: Option<&'static str>,
}

const fn example(original: &'static str, romanized: &'static str, language_code: Option<&'static str>) -> Example {
    Example {
        original,
        romanized,
        language_code,
    }
}

fn examples_for(script: Script) -> &'static [Example] {
    const LATIN: &[Example] = &[example("¿Cómo estás?", "Como estas?", None)];
    const GREEK: &[Example] = &[example("πι", "pi", Some("ell"))];
    const CYRILLIC: &[Example] = &[
        example("Привет мир", "Privet mir", Some("rus")),
        example("«Привет»", "«Privet»", None),
    ];
    const ARABIC: &[Example] = &[example("مرحبا", "mrhba", Some("ara"))];
    const DEVANAGARI: &[Example] = &[example("नमस्ते", "namaste", Some("hin"))];
    const HIRAGANA: &[Example] = &[example("こんにちは", "konnichiha", Some("jpn"))];
    const HAN: &[Example] = &[example("你好", "nihao", Some("zho"))];

    match script {
        Script::Latin => LATIN,
        Script::Greek => GREEK,
        Script::Cyrillic => CYRILLIC,
        Script::Arabic => ARABIC,
        Script::Devanagari => DEVANAGARI,
        Script::Hiragana => HIRAGANA,
        Script::Han => HAN,
        _ => &[],
    }
}

/// `resources/list`.
pub fn list() -> Result<ToolResult, ServiceError> {
    ToolResult::json(&json!({
        "resources": [
            {
                "uri": LANGUAGES_URI,
                "name": "Supported languages",
                "description": "ISO 639-3 codes with dedicated romanization rules",
                "mimeType": "application/json"
            },
            {
                "uri": SCRIPTS_URI,
                "name": "Detectable scripts",
                "description": "Scripts recognized by detect_script, with ISO 15924 codes",
                "mimeType": "application/json"
            },
            {
                "uri": format!("{EXAMPLES_URI_PREFIX}{{script}}"),
                "name": "Example romanizations",
                "description": "Sample input and output for a script, by name or ISO 15924 code",
                "mimeType": "application/json"
            },
            {
                "uri": STATS_URI,
                "name": "Server statistics",
                "description": "Cache statistics, engine state and effective limits",
                "mimeType": "application/json"
            }
        ]
    }))
}

/// `resources/read`.
pub fn read(uri: &str, state: &AppState) -> Result<ToolResult, ServiceError> {
    match uri {
        LANGUAGES_URI => {
            let languages: Vec<_> = LANGUAGES
                .iter()
                .map(|(code, name)| json!({ "code": code, "name": name }))
                .collect();
            ToolResult::json(&json!({ "languages": languages }))
        }

        SCRIPTS_URI => {
            let scripts: Vec<_> = Script::ALL
                .iter()
                .map(|s| json!({ "name": s.name(), "code": s.code() }))
                .collect();
            ToolResult::json(&json!({ "scripts": scripts }))
        }

        STATS_URI => ToolResult::json(&health::report(state)),

        _ => match uri.strip_prefix(EXAMPLES_URI_PREFIX) {
            Some(requested) => {
                let script = Script::lookup(requested)
                    .ok_or_else(|| ServiceError::UnsupportedScript(requested.to_string()))?;
                ToolResult::json(&json!({
                    "script": script.name(),
                    "code": script.code(),
                    "examples": examples_for(script),
                }))
            }
            None => Err(ServiceError::UnknownResource(uri.to_string())),
        },
    }
}
