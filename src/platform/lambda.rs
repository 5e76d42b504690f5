use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{HttpReply, PlatformAdapter, CORS_HEADERS, JSON_CONTENT_TYPE};
use crate::config::{Platform, ServerConfig};
use crate::engine::RomanizationEngine;
use crate::error::ServiceError;
use crate::handlers::Dispatcher;
use crate::protocol::WireResponse;
use crate::state::AppState;

/// API Gateway proxy event (REST v1 or HTTP v2 payload).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayEvent {
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub raw_path: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    /// Usually a string; some integrations hand over already-parsed JSON.
    pub body: Option<Value>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContext {
    pub http: Option<RequestContextHttp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContextHttp {
    pub method: Option<String>,
    pub path: Option<String>,
}

impl ApiGatewayEvent {
    fn method(&self) -> &str {
        self.http_method
            .as_deref()
            .or_else(|| self.context_http().and_then(|h| h.method.as_deref()))
            .unwrap_or("POST")
    }

    fn path(&self) -> &str {
        self.path
            .as_deref()
            .or(self.raw_path.as_deref())
            .or_else(|| self.context_http().and_then(|h| h.path.as_deref()))
            .unwrap_or("/")
    }

    fn context_http(&self) -> Option<&RequestContextHttp> {
        self.request_context.as_ref().and_then(|c| c.http.as_ref())
    }

    fn decoded_body(&self) -> Result<Vec<u8>, base64::DecodeError> {
        match &self.body {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(body)) if self.is_base64_encoded => STANDARD.decode(body.trim()),
            Some(Value::String(body)) => Ok(body.as_bytes().to_vec()),
            Some(parsed) => Ok(parsed.to_string().into_bytes()),
        }
    }
}

/// Incoming Lambda payload.
#[derive(Debug, Clone)]
pub enum LambdaEvent {
    /// Proxied through API Gateway or a function URL.
    Http(ApiGatewayEvent),
    /// Direct invocation: the payload is the protocol request itself.
    Direct(Value),
}

impl LambdaEvent {
    pub fn from_value(value: Value) -> Self {
        let http_shaped = value
            .as_object()
            .is_some_and(|o| o.contains_key("httpMethod") || o.contains_key("requestContext"));
        if !http_shaped {
            return Self::Direct(value);
        }
        match serde_json::from_value::<ApiGatewayEvent>(value.clone()) {
            Ok(event) => Self::Http(event),
            Err(e) => {
                tracing::debug!(error = %e, "event is not a gateway event; treating as direct invocation");
                Self::Direct(value)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<HttpReply> for ApiGatewayResponse {
    fn from(reply: HttpReply) -> Self {
        let mut headers: BTreeMap<String, String> = CORS_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        if reply.body.is_some() {
            headers.insert("content-type".to_string(), JSON_CONTENT_TYPE.to_string());
        }
        Self {
            status_code: reply.status,
            headers,
            body: reply.body.unwrap_or_default(),
            is_base64_encoded: false,
        }
    }
}

/// Serverless adapter: one event in, one response out.
pub struct LambdaAdapter {
    dispatcher: Dispatcher,
}

impl LambdaAdapter {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            dispatcher: Dispatcher::new(state),
        }
    }

    /// Adapter with the smaller serverless ceilings applied to `config`.
    pub fn from_config(config: &ServerConfig, engine: Arc<dyn RomanizationEngine>) -> Self {
        Self::new(super::build_state(Platform::Lambda, config, engine))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle a raw event as delivered by the runtime.
    pub async fn handle_value(&self, event: Value) -> ApiGatewayResponse {
        self.handle(LambdaEvent::from_value(event)).await
    }
}

#[async_trait]
impl PlatformAdapter for LambdaAdapter {
    type Request = LambdaEvent;
    type Response = ApiGatewayResponse;

    fn platform(&self) -> Platform {
        Platform::Lambda
    }

    async fn handle(&self, event: LambdaEvent) -> ApiGatewayResponse {
        let max_body_bytes = self.dispatcher.state().limits.max_body_bytes;

        let reply = match event {
            LambdaEvent::Http(event) => match event.decoded_body() {
                Ok(body) => super::route_http(&self.dispatcher, event.method(), event.path(), &body).await,
                Err(e) => {
                    tracing::warn!(error = %e, "invalid base64 body");
                    let err = ServiceError::ParseError("request body is not valid base64".to_string());
                    HttpReply::json(400, WireResponse::error(None, err.into()).to_json())
                }
            },
            LambdaEvent::Direct(request) => {
                let body = request.to_string();
                super::process_post(&self.dispatcher, body.as_bytes(), max_body_bytes).await
            }
        };

        reply.into()
    }

    async fn health_check(&self) -> ApiGatewayResponse {
        super::health_reply(self.dispatcher.state()).into()
    }
}
