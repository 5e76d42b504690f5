use std::str::FromStr;

use serde_json::{Map, Value};

use super::request::{JsonRpcRequest, ReadResourceParams, RpcId, ToolCallParams};
use super::response::WireResponse;
use crate::error::ServiceError;

/// Protocol methods understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    Initialized,
    Ping,
    ListTools,
    CallTool,
    ListResources,
    ReadResource,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Initialized => "notifications/initialized",
            Self::Ping => "ping",
            Self::ListTools => "tools/list",
            Self::CallTool => "tools/call",
            Self::ListResources => "resources/list",
            Self::ReadResource => "resources/read",
        }
    }
}

impl FromStr for Method {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initialize" => Ok(Self::Initialize),
            "notifications/initialized" => Ok(Self::Initialized),
            "ping" => Ok(Self::Ping),
            "tools/list" => Ok(Self::ListTools),
            "tools/call" => Ok(Self::CallTool),
            "resources/list" => Ok(Self::ListResources),
            "resources/read" => Ok(Self::ReadResource),
            other => Err(ServiceError::UnknownMethod(other.to_string())),
        }
    }
}

/// Canonical, platform-independent request.
///
/// Every adapter reduces its native request to one of these before calling
/// the dispatcher.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub method: Method,
    pub tool_name: Option<String>,
    pub arguments: Value,
    pub resource_uri: Option<String>,
    pub id: Option<RpcId>,
}

impl Envelope {
    pub fn new(method: Method, id: Option<RpcId>) -> Self {
        Self {
            method,
            tool_name: None,
            arguments: Value::Object(Map::new()),
            resource_uri: None,
            id,
        }
    }

    pub fn tool_call(name: impl Into<String>, arguments: Value, id: Option<RpcId>) -> Self {
        Self {
            tool_name: Some(name.into()),
            arguments,
            ..Self::new(Method::CallTool, id)
        }
    }

    /// No id means no reply is expected.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Parse a raw request body into an envelope.
    pub fn parse(raw: &[u8]) -> Result<Self, Rejected> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| Rejected::new(None, ServiceError::ParseError(format!("invalid JSON: {e}"))))?;

        // Recover the id before shape validation so a malformed request can
        // still be correlated by the caller.
        let id = value
            .get("id")
            .cloned()
            .and_then(|v| serde_json::from_value::<RpcId>(v).ok());

        let request: JsonRpcRequest = serde_json::from_value(value).map_err(|e| {
            Rejected::new(id.clone(), ServiceError::ParseError(format!("malformed request: {e}")))
        })?;

        Self::try_from(request)
    }
}

impl TryFrom<JsonRpcRequest> for Envelope {
    type Error = Rejected;

    fn try_from(request: JsonRpcRequest) -> Result<Self, Self::Error> {
        let id = request.id;

        if let Some(version) = request.jsonrpc.as_deref() {
            if version != "2.0" {
                return Err(Rejected::new(
                    id,
                    ServiceError::InvalidInput(format!("unsupported jsonrpc version {version:?}")),
                ));
            }
        }

        let method = Method::from_str(&request.method).map_err(|e| Rejected::new(id.clone(), e))?;
        let mut envelope = Envelope::new(method, id);

        match method {
            Method::CallTool => {
                let params: ToolCallParams = match request.params {
                    Some(v) => serde_json::from_value(v).map_err(|e| {
                        Rejected::new(
                            envelope.id.clone(),
                            ServiceError::InvalidInput(format!("invalid tools/call params: {e}")),
                        )
                    })?,
                    None => {
                        return Err(Rejected::new(
                            envelope.id,
                            ServiceError::InvalidInput("missing params for tools/call".into()),
                        ));
                    }
                };

                let arguments = params.arguments.unwrap_or_else(|| Value::Object(Map::new()));
                if !arguments.is_object() {
                    return Err(Rejected::new(
                        envelope.id,
                        ServiceError::InvalidInput("tool arguments must be an object".into()),
                    ));
                }

                envelope.tool_name = Some(params.name);
                envelope.arguments = arguments;
            }

            Method::ReadResource => {
                let params: ReadResourceParams = request
                    .params
                    .ok_or_else(|| ServiceError::InvalidInput("missing params for resources/read".into()))
                    .and_then(|v| {
                        serde_json::from_value(v).map_err(|e| {
                            ServiceError::InvalidInput(format!("invalid resources/read params: {e}"))
                        })
                    })
                    .map_err(|e| Rejected::new(envelope.id.clone(), e))?;
                envelope.resource_uri = Some(params.uri);
            }

            _ => {}
        }

        Ok(envelope)
    }
}

/// A request that was refused before reaching the dispatcher.
#[derive(Debug)]
pub struct Rejected {
    pub id: Option<RpcId>,
    pub error: ServiceError,
}

impl Rejected {
    pub fn new(id: Option<RpcId>, error: ServiceError) -> Self {
        Self { id, error }
    }

    /// Parse errors are always answered (with a null id if needed); other
    /// rejections of notifications are dropped silently.
    pub fn into_response(self) -> Option<WireResponse> {
        let is_parse_error = matches!(self.error, ServiceError::ParseError(_));
        if self.id.is_none() && !is_parse_error {
            tracing::debug!(error = %self.error, "dropping rejected notification");
            return None;
        }
        tracing::warn!(error = %self.error, "request rejected");
        Some(WireResponse::error(self.id, self.error.into()))
    }
}
