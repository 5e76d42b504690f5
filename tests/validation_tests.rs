use serde_json::json;

use uroman_mcp_server::error::{elide, truncate, ServiceError};
use uroman_mcp_server::protocol::{ErrorCode, WireError};
use uroman_mcp_server::validation::{
    validate_batch, validate_language_code, validate_non_empty, validate_text,
};

#[test]
fn text_must_be_a_string() {
    for value in [json!(null), json!(1), json!(["a"]), json!({"text": "a"})] {
        let err = validate_text(&value, "text", 10).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput, "{value}");
    }
}

#[test]
fn text_length_counts_characters() {
    let value = json!("日本語");
    assert_eq!(validate_text(&value, "text", 3).unwrap(), "日本語");

    match validate_text(&value, "text", 2).unwrap_err() {
        ServiceError::TextTooLong { field, actual, max } => {
            assert_eq!(field, "text");
            assert_eq!(actual, 3);
            assert_eq!(max, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_empty_check() {
    assert!(validate_non_empty("x", "text").is_ok());
    assert_eq!(validate_non_empty("", "text").unwrap_err().code(), ErrorCode::InvalidInput);
}

#[test]
fn language_codes() {
    assert!(validate_language_code(None).is_ok());
    assert!(validate_language_code(Some("rus")).is_ok());
    for bad in ["ru", "rusk", "Rus", "r s", "рус"] {
        assert_eq!(
            validate_language_code(Some(bad)).unwrap_err().code(),
            ErrorCode::InvalidLanguageCode,
            "{bad:?}"
        );
    }
}

#[test]
fn batch_shape_and_limits() {
    assert_eq!(validate_batch(&json!(["a", "b"]), 2, 5).unwrap(), vec!["a", "b"]);
    assert!(validate_batch(&json!([]), 2, 5).unwrap().is_empty());

    assert_eq!(validate_batch(&json!(["a", "b", "c"]), 2, 5).unwrap_err().code(), ErrorCode::InvalidInput);
    assert_eq!(validate_batch(&json!("a"), 2, 5).unwrap_err().code(), ErrorCode::InvalidInput);
    assert_eq!(validate_batch(&json!([1]), 2, 5).unwrap_err().code(), ErrorCode::InvalidInput);
    assert_eq!(validate_batch(&json!(["toolong"]), 2, 5).unwrap_err().code(), ErrorCode::TextTooLong);
}

#[test]
fn truncation_is_character_based() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("привет", 3), "при...");
    assert_eq!(elide(&"x".repeat(80)).chars().count(), 53);
}

#[test]
fn internal_errors_hide_their_cause() {
    let wire: WireError = ServiceError::Internal("x".repeat(500)).into();
    assert_eq!(wire.code, ErrorCode::InternalError);
    assert_eq!(wire.message, "Internal error");
    let details = wire.details.unwrap();
    assert_eq!(details.as_str().unwrap().chars().count(), 203);
}

#[test]
fn other_errors_keep_their_message() {
    let wire: WireError = ServiceError::InvalidLanguageCode("ru".into()).into();
    assert_eq!(wire.code, ErrorCode::InvalidLanguageCode);
    assert!(wire.message.contains("\"ru\""));
    assert!(wire.details.is_none());
}
