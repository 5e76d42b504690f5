//! Input checks run before any cache or engine access.
//!
//! Nothing here normalizes input: values that fail a check are rejected,
//! never trimmed or case-folded into shape.

use serde_json::Value;

use crate::error::ServiceError;

/// Length in Unicode scalar values.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Require `value` to be a string of at most `max_len` characters.
pub fn validate_text<'a>(value: &'a Value, field: &str, max_len: usize) -> Result<&'a str, ServiceError> {
    let text = value
        .as_str()
        .ok_or_else(|| ServiceError::InvalidInput(format!("`{field}` must be a string")))?;

    // Byte length bounds char length from above.
    if text.len() > max_len {
        let actual = char_len(text);
        if actual > max_len {
            return Err(ServiceError::TextTooLong {
                field: field.to_string(),
                actual,
                max: max_len,
            });
        }
    }

    Ok(text)
}

pub fn validate_non_empty(text: &str, field: &str) -> Result<(), ServiceError> {
    if text.is_empty() {
        return Err(ServiceError::InvalidInput(format!("`{field}` must not be empty")));
    }
    Ok(())
}

/// A language code, when present, is exactly three lowercase ASCII letters.
pub fn validate_language_code(code: Option<&str>) -> Result<(), ServiceError> {
    match code {
        None => Ok(()),
        Some(code) if code.len() == 3 && code.bytes().all(|b| b.is_ascii_lowercase()) => Ok(()),
        Some(code) => Err(ServiceError::InvalidLanguageCode(code.to_string())),
    }
}

/// Require `value` to be an array of at most `max_items` strings, each at
/// most `max_item_len` characters.
pub fn validate_batch<'a>(
    value: &'a Value,
    max_items: usize,
    max_item_len: usize,
) -> Result<Vec<&'a str>, ServiceError> {
    let items = value
        .as_array()
        .ok_or_else(|| ServiceError::InvalidInput("`texts` must be an array of strings".into()))?;

    if items.len() > max_items {
        return Err(ServiceError::InvalidInput(format!(
            "`texts` has {} items, limit is {max_items}",
            items.len()
        )));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_text(item, &format!("texts[{index}]"), max_item_len))
        .collect()
}
