pub mod envelope;
pub mod request;
pub mod response;

pub use envelope::{Envelope, Method, Rejected};
pub use request::{
    DetectScriptArgs, JsonRpcRequest, ReadResourceParams, RomanizeArgs, RomanizeBatchArgs, RpcId,
    ToolCallParams,
};
pub use response::{
    ContentType, ErrorCode, ToolResult, WireError, WireResponse, FALLBACK_INTERNAL_ERROR,
};
