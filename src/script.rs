//! Coarse script classification by code-point range.
//!
//! Used for `detect_script` and metadata only. The engine alone decides how
//! a character is romanized; nothing here gates a transformation.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Script {
    Latin,
    Greek,
    Cyrillic,
    Armenian,
    Hebrew,
    Arabic,
    Devanagari,
    Bengali,
    Tamil,
    Thai,
    Tibetan,
    Myanmar,
    Georgian,
    Hangul,
    Ethiopic,
    Hiragana,
    Katakana,
    Han,
    /// Alphabetic, but outside every known range.
    Other,
}

impl Script {
    pub const ALL: [Script; 19] = [
        Script::Latin,
        Script::Greek,
        Script::Cyrillic,
        Script::Armenian,
        Script::Hebrew,
        Script::Arabic,
        Script::Devanagari,
        Script::Bengali,
        Script::Tamil,
        Script::Thai,
        Script::Tibetan,
        Script::Myanmar,
        Script::Georgian,
        Script::Hangul,
        Script::Ethiopic,
        Script::Hiragana,
        Script::Katakana,
        Script::Han,
        Script::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Latin => "Latin",
            Self::Greek => "Greek",
            Self::Cyrillic => "Cyrillic",
            Self::Armenian => "Armenian",
            Self::Hebrew => "Hebrew",
            Self::Arabic => "Arabic",
            Self::Devanagari => "Devanagari",
            Self::Bengali => "Bengali",
            Self::Tamil => "Tamil",
            Self::Thai => "Thai",
            Self::Tibetan => "Tibetan",
            Self::Myanmar => "Myanmar",
            Self::Georgian => "Georgian",
            Self::Hangul => "Hangul",
            Self::Ethiopic => "Ethiopic",
            Self::Hiragana => "Hiragana",
            Self::Katakana => "Katakana",
            Self::Han => "Han",
            Self::Other => "Other",
        }
    }

    /// ISO 15924 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Latin => "Latn",
            Self::Greek => "Grek",
            Self::Cyrillic => "Cyrl",
            Self::Armenian => "Armn",
            Self::Hebrew => "Hebr",
            Self::Arabic => "Arab",
            Self::Devanagari => "Deva",
            Self::Bengali => "Beng",
            Self::Tamil => "Taml",
            Self::Thai => "Thai",
            Self::Tibetan => "Tibt",
            Self::Myanmar => "Mymr",
            Self::Georgian => "Geor",
            Self::Hangul => "Hang",
            Self::Ethiopic => "Ethi",
            Self::Hiragana => "Hira",
            Self::Katakana => "Kana",
            Self::Han => "Hani",
            Self::Other => "Zzzz",
        }
    }

    /// Case-insensitive lookup by name or ISO code.
    pub fn lookup(name_or_code: &str) -> Option<Script> {
        Self::ALL.into_iter().find(|script| {
            script.name().eq_ignore_ascii_case(name_or_code)
                || script.code().eq_ignore_ascii_case(name_or_code)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Script(Script),
    Unclassified,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Script(script) => script.name(),
            Self::Unclassified => "Unclassified",
        }
    }
}

/// Inclusive code-point range mapped to a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRange {
    pub start: u32,
    pub end: u32,
    pub script: Script,
}

const fn range(start: u32, end: u32, script: Script) -> ScriptRange {
    ScriptRange { start, end, script }
}

/// Sorted by `start`, pairwise disjoint.
static SCRIPT_RANGES: &[ScriptRange] = &[
    range(0x0041, 0x005A, Script::Latin),
    range(0x0061, 0x007A, Script::Latin),
    range(0x00C0, 0x00D6, Script::Latin),
    range(0x00D8, 0x00F6, Script::Latin),
    range(0x00F8, 0x024F, Script::Latin),
    range(0x0370, 0x03FF, Script::Greek),
    range(0x0400, 0x052F, Script::Cyrillic),
    range(0x0530, 0x058F, Script::Armenian),
    range(0x0590, 0x05FF, Script::Hebrew),
    range(0x0600, 0x06FF, Script::Arabic),
    range(0x0750, 0x077F, Script::Arabic),
    range(0x0900, 0x097F, Script::Devanagari),
    range(0x0980, 0x09FF, Script::Bengali),
    range(0x0B80, 0x0BFF, Script::Tamil),
    range(0x0E00, 0x0E7F, Script::Thai),
    range(0x0F00, 0x0FFF, Script::Tibetan),
    range(0x1000, 0x109F, Script::Myanmar),
    range(0x10A0, 0x10FF, Script::Georgian),
    range(0x1100, 0x11FF, Script::Hangul),
    range(0x1200, 0x137F, Script::Ethiopic),
    range(0x1E00, 0x1EFF, Script::Latin),
    range(0x1F00, 0x1FFF, Script::Greek),
    range(0x3040, 0x309F, Script::Hiragana),
    range(0x30A0, 0x30FF, Script::Katakana),
    range(0x3130, 0x318F, Script::Hangul),
    range(0x3400, 0x4DBF, Script::Han),
    range(0x4E00, 0x9FFF, Script::Han),
    range(0xAC00, 0xD7AF, Script::Hangul),
    range(0xF900, 0xFAFF, Script::Han),
    range(0x20000, 0x2A6DF, Script::Han),
];

pub fn ranges() -> &'static [ScriptRange] {
    SCRIPT_RANGES
}

pub fn classify(ch: char) -> Classification {
    let cp = ch as u32;
    let found = SCRIPT_RANGES.binary_search_by(|r| {
        if cp < r.start {
            std::cmp::Ordering::Greater
        } else if cp > r.end {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Equal
        }
    });

    match found {
        Ok(index) => Classification::Script(SCRIPT_RANGES[index].script),
        Err(_) if ch.is_alphabetic() => Classification::Script(Script::Other),
        Err(_) => Classification::Unclassified,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptShare {
    pub name: &'static str,
    pub code: &'static str,
    pub percentage: u8,
    pub character_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptDistribution {
    pub scripts: Vec<ScriptShare>,
    pub primary_script: Option<&'static str>,
    pub mixed_script: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterScript {
    pub char: String,
    pub script: &'static str,
}

/// Script shares over the classified characters of `text`, largest first.
pub fn distribution(text: &str) -> ScriptDistribution {
    // Encounter order; the stable sort below keeps it for ties.
    let mut counts: Vec<(Script, usize)> = Vec::new();

    for ch in text.chars() {
        if let Classification::Script(script) = classify(ch) {
            match counts.iter_mut().find(|(s, _)| *s == script) {
                Some((_, n)) => *n += 1,
                None => counts.push((script, 1)),
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let total: usize = counts.iter().map(|(_, n)| n).sum();

    let scripts: Vec<ScriptShare> = counts
        .iter()
        .map(|&(script, count)| ScriptShare {
            name: script.name(),
            code: script.code(),
            percentage: percentage(count, total),
            character_count: count,
        })
        .collect();

    ScriptDistribution {
        primary_script: scripts.first().map(|s| s.name),
        mixed_script: scripts.len() > 1,
        scripts,
    }
}

/// Per-character labels for the first `limit` characters.
pub fn character_scripts(text: &str, limit: usize) -> Vec<CharacterScript> {
    text.chars()
        .take(limit)
        .map(|ch| CharacterScript {
            char: ch.to_string(),
            script: classify(ch).label(),
        })
        .collect()
}

fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count * 100 + total / 2) / total) as u8
}
