//! Process engine tests against small shell scripts standing in for the
//! uroman executable. Scripts are run as `sh <script>` so they need no
//! execute bit.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use uroman_mcp_server::engine::{
    EngineError, EngineHandle, OutputMode, ProcessEngine, RomanizationEngine, Transformed,
};

const ECHO_SCRIPT: &str = r#"
read -r line
case "$*" in
  *"-f edges"*)
    printf '{"start":0,"text":"%s"}\n' "$line"
    printf '{"start":1,"text":"%s"}\n' "$line"
    ;;
  *)
    if [ "$line" = "bad" ]; then
      echo "no rule for input" >&2
      exit 2
    fi
    printf 'roman:%s:%s\n' "$line" "$*"
    ;;
esac
"#;

const BROKEN_SCRIPT: &str = r#"
echo "romanization tables missing" >&2
exit 3
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn sh_engine(script: &Path) -> ProcessEngine {
    ProcessEngine::new("sh").with_base_args([script.to_string_lossy().into_owned()])
}

#[tokio::test]
async fn plain_transform_strips_trailing_newline() {
    let tmp = tempfile::tempdir().unwrap();
    let script = write_script(tmp.path(), "uroman.sh", ECHO_SCRIPT);
    let engine = sh_engine(&script);
    assert_eq!(engine.name(), "uroman-process");

    let handle = engine.initialize(100).await.unwrap();

    let out = handle.transform("Привет", None, OutputMode::Plain).await.unwrap();
    assert_eq!(out, Transformed::Plain("roman:Привет:".into()));
}

#[tokio::test]
async fn language_code_is_passed_as_flag() {
    let tmp = tempfile::tempdir().unwrap();
    let script = write_script(tmp.path(), "uroman.sh", ECHO_SCRIPT);
    let handle = sh_engine(&script).initialize(0).await.unwrap();

    let out = handle.transform("Київ", Some("ukr"), OutputMode::Plain).await.unwrap();
    assert_eq!(out, Transformed::Plain("roman:Київ:-l ukr".into()));
}

#[tokio::test]
async fn annotated_mode_collects_json_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let script = write_script(tmp.path(), "uroman.sh", ECHO_SCRIPT);
    let handle = sh_engine(&script).initialize(0).await.unwrap();

    let out = handle.transform("мир", Some("rus"), OutputMode::Annotated).await.unwrap();
    match out {
        Transformed::Annotated(value) => {
            let items = value.as_array().unwrap();
            assert_eq!(items.len(), 2);
            assert_eq!(items[0]["text"], "мир");
            assert_eq!(items[1]["start"], 1);
        }
        other => panic!("expected annotated output, got {other:?}"),
    }
}

#[tokio::test]
async fn nonzero_exit_is_a_failure_with_stderr() {
    let tmp = tempfile::tempdir().unwrap();
    let script = write_script(tmp.path(), "uroman.sh", ECHO_SCRIPT);
    let handle = sh_engine(&script).initialize(0).await.unwrap();

    match handle.transform("bad", None, OutputMode::Plain).await {
        Err(EngineError::Failed(msg)) => assert!(msg.contains("no rule for input"), "{msg}"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn failing_warmup_makes_engine_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    let script = write_script(tmp.path(), "broken.sh", BROKEN_SCRIPT);

    match sh_engine(&script).initialize(0).await {
        Err(EngineError::Unavailable(msg)) => assert!(msg.contains("tables missing"), "{msg}"),
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("initialization should fail"),
    }
}

#[tokio::test]
async fn missing_program_is_unavailable() {
    let engine = ProcessEngine::new("/nonexistent/uroman-binary");

    assert!(matches!(engine.initialize(0).await, Err(EngineError::Unavailable(_))));
}

#[tokio::test]
async fn command_line_is_split_on_whitespace() {
    let tmp = tempfile::tempdir().unwrap();
    let script = write_script(tmp.path(), "uroman.sh", ECHO_SCRIPT);
    let engine = ProcessEngine::from_command_line(&format!("sh  {}", script.display()));

    let handle = engine.initialize(0).await.unwrap();
    let out = handle.transform("x", None, OutputMode::Plain).await.unwrap();

    assert_eq!(out.into_text(), "roman:x:");
}
