use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::engine::OutputMode;

/// JSON-RPC 2.0 ID: a number or a string.
///
/// Numbers are kept as [`Number`] so fractional and unsigned 64-bit ids echo
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(Number),
    Str(String),
}

/// JSON-RPC 2.0 request as it arrives on the wire.
///
/// `jsonrpc` is optional: some hosted clients omit it. When present it must
/// be `"2.0"`.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<RpcId>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Parameters for `resources/read`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    pub uri: String,
}

/// Arguments for the `romanize` tool.
///
/// `text` stays a raw JSON value so that a non-string argument is reported
/// as `invalid_input` by the validation layer instead of a serde error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RomanizeArgs {
    #[serde(default)]
    pub text: Value,
    #[serde(default, alias = "lang_code")]
    pub language_code: Option<String>,
    #[serde(default)]
    pub output_mode: OutputMode,
}

/// Arguments for the `romanize_batch` tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RomanizeBatchArgs {
    #[serde(default)]
    pub texts: Value,
    #[serde(default, alias = "lang_code")]
    pub language_code: Option<String>,
}

/// Arguments for the `detect_script` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectScriptArgs {
    #[serde(default)]
    pub text: Value,
    #[serde(default)]
    pub detailed: bool,
}
