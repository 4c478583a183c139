//! Inbound event envelopes and their normalization.
//!
//! Each supported trigger delivers its own envelope shape; the resolver only
//! ever dispatches on the schema-independent [`InboundRequest`] produced
//! here. Which envelope `resolve()` expects is fixed by the [`EventType`]
//! discriminator chosen at construction time.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use http::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ResolveError;

/// Identifies which wire-level envelope shape a resolver instance expects.
///
/// Fixed at construction time and owned by the resolver for its whole
/// lifetime; see the adapter factories in [`crate::adapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// VPC Lattice service-network event, v1 (snake_case wire keys).
    VpcLattice,
    /// VPC Lattice service-network event, v2.
    VpcLatticeV2,
    /// Application Load Balancer target-group event.
    Alb,
    /// API Gateway REST proxy event (payload format v1).
    ApiGatewayProxy,
}

impl EventType {
    /// Wire-format name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::VpcLattice => "VPCLattice",
            Self::VpcLatticeV2 => "VPCLatticeV2",
            Self::Alb => "ALB",
            Self::ApiGatewayProxy => "APIGatewayProxy",
        }
    }

    /// Deserialize a raw event according to this discriminator and
    /// normalize it for dispatch.
    pub(crate) fn parse(self, event: Value) -> Result<InboundRequest, ResolveError> {
        let envelope_err = |source| ResolveError::Envelope {
            event_type: self.name(),
            source,
        };
        match self {
            Self::VpcLattice => serde_json::from_value::<VpcLatticeEvent>(event)
                .map_err(envelope_err)?
                .into_request(),
            Self::VpcLatticeV2 => serde_json::from_value::<VpcLatticeV2Event>(event)
                .map_err(envelope_err)?
                .into_request(),
            Self::Alb => serde_json::from_value::<AlbEvent>(event)
                .map_err(envelope_err)?
                .into_request(),
            Self::ApiGatewayProxy => serde_json::from_value::<ApiGatewayProxyEvent>(event)
                .map_err(envelope_err)?
                .into_request(),
        }
    }
}

/// Request body after base64 handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// UTF-8 body, delivered as-is or decoded from base64.
    Text(String),
    /// Base64-decoded body that is not valid UTF-8.
    Binary(Vec<u8>),
}

impl Body {
    /// The body as text, if it is UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// The raw body bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

/// Schema-independent view of an inbound request.
///
/// Header names are lowercased during normalization; multi-value headers
/// keep their first value.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    /// HTTP method of the request.
    pub method: Method,
    /// Request path as delivered, before prefix stripping.
    pub path: String,
    /// Single-value headers with lowercased names.
    pub headers: HashMap<String, String>,
    /// Query string parameters.
    pub query: HashMap<String, String>,
    /// Decoded request body, if any.
    pub body: Option<Body>,
}

impl InboundRequest {
    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// VPC Lattice v1 request envelope.
///
/// Unlike the other schemas this one uses snake_case wire keys.
#[derive(Debug, Clone, Deserialize)]
pub struct VpcLatticeEvent {
    /// Request path, possibly carrying a query string suffix.
    pub raw_path: String,
    /// HTTP method.
    pub method: String,
    /// Request headers.
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Query string parameters.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Request body.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl VpcLatticeEvent {
    pub(crate) fn into_request(self) -> Result<InboundRequest, ResolveError> {
        // v1 delivers the query string inside raw_path.
        let path = match self.raw_path.split_once('?') {
            Some((path, _)) => path.to_string(),
            None => self.raw_path,
        };
        Ok(InboundRequest {
            method: parse_method(&self.method)?,
            path,
            headers: lower_keys(self.headers.unwrap_or_default()),
            query: self.query_string_parameters.unwrap_or_default(),
            body: decode_body(self.body, self.is_base64_encoded)?,
        })
    }
}

/// VPC Lattice v2 request envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcLatticeV2Event {
    /// Payload format version ("2.0").
    #[serde(default)]
    pub version: String,
    /// Request path.
    pub path: String,
    /// HTTP method.
    pub method: String,
    /// Request headers; v2 delivers every header multi-valued.
    #[serde(default)]
    pub headers: Option<HashMap<String, Vec<String>>>,
    /// Query string parameters.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Request body.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
    /// Service-network metadata attached by Lattice.
    #[serde(default)]
    pub request_context: Option<VpcLatticeV2RequestContext>,
}

/// Service-network metadata carried by a VPC Lattice v2 event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcLatticeV2RequestContext {
    #[serde(default)]
    pub service_network_arn: String,
    #[serde(default)]
    pub service_arn: String,
    #[serde(default)]
    pub target_group_arn: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub time_epoch: Option<String>,
}

impl VpcLatticeV2Event {
    pub(crate) fn into_request(self) -> Result<InboundRequest, ResolveError> {
        Ok(InboundRequest {
            method: parse_method(&self.method)?,
            path: self.path,
            headers: first_values(self.headers.unwrap_or_default()),
            query: self.query_string_parameters.unwrap_or_default(),
            body: decode_body(self.body, self.is_base64_encoded)?,
        })
    }
}

/// Application Load Balancer target-group request envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbEvent {
    /// HTTP method.
    pub http_method: String,
    /// Request path.
    pub path: String,
    /// Request headers.
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Query string parameters.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Request body.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
    /// Target-group metadata attached by the load balancer.
    #[serde(default)]
    pub request_context: Option<AlbRequestContext>,
}

/// Target-group metadata carried by an ALB event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbRequestContext {
    #[serde(default)]
    pub elb: ElbContext,
}

/// The load balancer identification block of an ALB event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElbContext {
    #[serde(default)]
    pub target_group_arn: String,
}

impl AlbEvent {
    pub(crate) fn into_request(self) -> Result<InboundRequest, ResolveError> {
        Ok(InboundRequest {
            method: parse_method(&self.http_method)?,
            path: self.path,
            headers: lower_keys(self.headers.unwrap_or_default()),
            query: self.query_string_parameters.unwrap_or_default(),
            body: decode_body(self.body, self.is_base64_encoded)?,
        })
    }
}

/// API Gateway REST proxy request envelope (payload format v1).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyEvent {
    /// Resource template the request matched in API Gateway.
    #[serde(default)]
    pub resource: String,
    /// Request path.
    pub path: String,
    /// HTTP method.
    pub http_method: String,
    /// Request headers.
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Query string parameters.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Request body.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
    /// Deployment metadata attached by API Gateway.
    #[serde(default)]
    pub request_context: Option<ApiGatewayRequestContext>,
}

/// Deployment metadata carried by an API Gateway proxy event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequestContext {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub stage: String,
}

impl ApiGatewayProxyEvent {
    pub(crate) fn into_request(self) -> Result<InboundRequest, ResolveError> {
        Ok(InboundRequest {
            method: parse_method(&self.http_method)?,
            path: self.path,
            headers: lower_keys(self.headers.unwrap_or_default()),
            query: self.query_string_parameters.unwrap_or_default(),
            body: decode_body(self.body, self.is_base64_encoded)?,
        })
    }
}

fn parse_method(raw: &str) -> Result<Method, ResolveError> {
    Method::from_bytes(raw.as_bytes()).map_err(|_| ResolveError::Method {
        method: raw.to_string(),
    })
}

fn lower_keys(headers: HashMap<String, String>) -> HashMap<String, String> {
    headers
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect()
}

fn first_values(headers: HashMap<String, Vec<String>>) -> HashMap<String, String> {
    headers
        .into_iter()
        .filter_map(|(name, mut values)| {
            if values.is_empty() {
                None
            } else {
                Some((name.to_ascii_lowercase(), values.swap_remove(0)))
            }
        })
        .collect()
}

fn decode_body(body: Option<String>, is_base64: bool) -> Result<Option<Body>, ResolveError> {
    let Some(body) = body else {
        return Ok(None);
    };
    if !is_base64 {
        return Ok(Some(Body::Text(body)));
    }
    let bytes = BASE64.decode(body.as_bytes())?;
    Ok(Some(match String::from_utf8(bytes) {
        Ok(text) => Body::Text(text),
        Err(err) => Body::Binary(err.into_bytes()),
    }))
}
