//! Handler return values and the outbound wire envelope.

use std::collections::BTreeMap;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Full-control response from a route handler.
///
/// Most handlers return JSON through [`Reply::Json`] instead; reach for this
/// when the status code, content type, or extra headers matter.
///
/// # Example
///
/// ```
/// use eventgate::ApiResponse;
/// use http::StatusCode;
///
/// let response = ApiResponse::new(StatusCode::CREATED, "{\"id\": 7}")
///     .with_header("Location", "/orders/7");
/// assert_eq!(response.status, StatusCode::CREATED);
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Content type of the body.
    pub content_type: String,
    /// Response body.
    pub body: Option<String>,
    /// Additional response headers.
    pub headers: Vec<(String, String)>,
}

impl ApiResponse {
    /// Create a response with the default `application/json` content type.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body: Some(body.into()),
            headers: Vec::new(),
        }
    }

    /// Create a response with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// Override the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Attach an extra response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// What a route handler returns on success.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A JSON value, serialized with the resolver's serializer into a 200.
    Json(Value),
    /// A fully specified response.
    Response(ApiResponse),
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<ApiResponse> for Reply {
    fn from(response: ApiResponse) -> Self {
        Self::Response(response)
    }
}

/// Outbound proxy-integration envelope shared by all supported schemas.
///
/// `statusDescription` is only populated for ALB targets, which require it;
/// the other schemas ignore unknown fields so the shape is shared safely.
/// Headers use a `BTreeMap` so serialized output is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// `"200 OK"`-style line, ALB only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Response body.
    pub body: String,
    /// Whether `body` is base64 encoded. Always false: the resolver emits
    /// textual bodies.
    pub is_base64_encoded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_response_defaults_to_json_content_type() {
        let response = ApiResponse::new(StatusCode::OK, "{}");
        assert_eq!(response.content_type, "application/json");
        assert_eq!(response.body.as_deref(), Some("{}"));
    }

    #[test]
    fn api_response_builders_compose() {
        let response = ApiResponse::new(StatusCode::OK, "pong")
            .with_content_type("text/plain")
            .with_header("X-Request-Id", "r-1");
        assert_eq!(response.content_type, "text/plain");
        assert_eq!(
            response.headers,
            vec![("X-Request-Id".to_string(), "r-1".to_string())]
        );
    }

    #[test]
    fn reply_from_value_and_response() {
        assert!(matches!(Reply::from(json!({"ok": true})), Reply::Json(_)));
        assert!(matches!(
            Reply::from(ApiResponse::empty(StatusCode::NO_CONTENT)),
            Reply::Response(_)
        ));
    }

    #[test]
    fn proxy_response_serializes_camel_case() {
        let response = ProxyResponse {
            status_code: 200,
            status_description: None,
            headers: BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: "{}".to_string(),
            is_base64_encoded: false,
        };
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"statusCode\":200"));
        assert!(json.contains("\"isBase64Encoded\":false"));
        assert!(!json.contains("statusDescription"));
    }

    #[test]
    fn proxy_response_includes_status_description_when_set() {
        let response = ProxyResponse {
            status_code: 404,
            status_description: Some("404 Not Found".to_string()),
            headers: BTreeMap::new(),
            body: String::new(),
            is_base64_encoded: false,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"statusDescription\":\"404 Not Found\""));
    }
}
