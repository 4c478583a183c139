//! The shared event-routing resolver.
//!
//! A [`Resolver`] is bound to one [`EventType`] for its whole lifetime and
//! carries the route table plus the pass-through options every adapter
//! forwards: CORS policy, debug flag, serializer, and prefix stripping.
//! `resolve()` never fails the invocation for a malformed request; every
//! outcome is rendered as a [`ProxyResponse`].

use std::collections::BTreeMap;
use std::env;
use std::sync::Arc;

use http::{Method, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::cors::CorsConfig;
use crate::error::ServiceError;
use crate::event::EventType;
use crate::response::{ApiResponse, ProxyResponse, Reply};
use crate::router::{Handler, RequestContext, Router};

/// Environment variable enabling debug behavior when the builder leaves the
/// flag unset.
pub const DEV_ENV_VAR: &str = "EVENTGATE_DEV";

/// Serializer turning a handler's JSON value into the textual wire body.
pub type Serializer = Arc<dyn Fn(&Value) -> Result<String, serde_json::Error> + Send + Sync>;

/// Event-routing resolver bound to a single envelope schema.
///
/// Construct one through [`Resolver::builder`] or, more usually, through the
/// per-schema factories in [`crate::adapter`].
///
/// # Example
///
/// ```
/// use eventgate::{vpc_lattice, Reply};
/// use serde_json::json;
///
/// let mut app = vpc_lattice().build();
/// app.get("/status", |_ctx| Ok(Reply::Json(json!({"status": "ok"}))));
///
/// let event = json!({"raw_path": "/status", "method": "GET"});
/// let response = app.resolve(event, "req-1");
/// assert_eq!(response.status_code, 200);
/// ```
pub struct Resolver {
    event_type: EventType,
    router: Router,
    cors: Option<CorsConfig>,
    debug: bool,
    serializer: Serializer,
    strip_prefixes: Vec<String>,
}

impl Resolver {
    /// Start building a resolver for the given envelope schema.
    pub fn builder(event_type: EventType) -> ResolverBuilder {
        ResolverBuilder::new(event_type)
    }

    /// The envelope schema this resolver was constructed for.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Whether debug behavior is active.
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Register a handler for an arbitrary method and path.
    pub fn route<H>(&mut self, method: Method, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, ServiceError> + Send + Sync + 'static,
    {
        let handler: Handler = Box::new(handler);
        self.router.register(method, path, handler);
    }

    /// Register a GET handler.
    pub fn get<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, ServiceError> + Send + Sync + 'static,
    {
        self.route(Method::GET, path, handler);
    }

    /// Register a POST handler.
    pub fn post<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, ServiceError> + Send + Sync + 'static,
    {
        self.route(Method::POST, path, handler);
    }

    /// Register a PUT handler.
    pub fn put<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, ServiceError> + Send + Sync + 'static,
    {
        self.route(Method::PUT, path, handler);
    }

    /// Register a DELETE handler.
    pub fn delete<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, ServiceError> + Send + Sync + 'static,
    {
        self.route(Method::DELETE, path, handler);
    }

    /// Register a PATCH handler.
    pub fn patch<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, ServiceError> + Send + Sync + 'static,
    {
        self.route(Method::PATCH, path, handler);
    }

    /// Register a HEAD handler.
    pub fn head<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, ServiceError> + Send + Sync + 'static,
    {
        self.route(Method::HEAD, path, handler);
    }

    /// Resolve a raw event into a proxy response.
    ///
    /// Deserializes the event per the bound schema, strips configured
    /// prefixes, answers CORS preflights, dispatches to the matching route,
    /// and serializes the handler's reply. Malformed events become a 400 and
    /// unmatched routes a 404; this method never panics on bad input.
    pub fn resolve(&self, event: Value, request_id: &str) -> ProxyResponse {
        if self.debug {
            debug!(request_id = %request_id, event = %event, "resolving raw event");
        }
        if self.router.is_empty() {
            warn!(request_id = %request_id, "resolving with an empty route table");
        }

        let request = match self.event_type.parse(event) {
            Ok(request) => request,
            Err(e) => {
                error!(request_id = %request_id, error = %e, "failed to parse event envelope");
                return self.error_response(StatusCode::BAD_REQUEST, &e.to_string(), None);
            }
        };

        let origin = request.header("origin").map(str::to_string);
        let path = self.stripped_path(&request.path);

        if request.method == Method::OPTIONS && self.cors.is_some() {
            info!(request_id = %request_id, path = %path, "answering CORS preflight");
            return self.preflight(&path, origin.as_deref());
        }

        let Some(handler) = self.router.find(&request.method, &path) else {
            info!(
                request_id = %request_id,
                method = %request.method,
                path = %path,
                "no route matched"
            );
            return self.error_response(StatusCode::NOT_FOUND, "Not found", origin.as_deref());
        };

        info!(
            request_id = %request_id,
            method = %request.method,
            path = %path,
            "dispatching route"
        );

        let ctx = RequestContext {
            request,
            route_path: path,
            request_id: request_id.to_string(),
        };

        match handler(&ctx) {
            Ok(Reply::Json(value)) => match (self.serializer)(&value) {
                Ok(body) => self.wire(ApiResponse::new(StatusCode::OK, body), origin.as_deref()),
                Err(e) => {
                    error!(request_id = %request_id, error = %e, "response serialization failed");
                    self.error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Response serialization failed",
                        origin.as_deref(),
                    )
                }
            },
            Ok(Reply::Response(response)) => self.wire(response, origin.as_deref()),
            Err(err) => {
                info!(
                    request_id = %request_id,
                    status = err.status_code().as_u16(),
                    error = %err,
                    "handler returned service error"
                );
                self.error_response(err.status_code(), err.message(), origin.as_deref())
            }
        }
    }

    /// Strip the first matching configured prefix. Whole segments only: a
    /// prefix of `/payment` does not touch `/payments`.
    fn stripped_path(&self, path: &str) -> String {
        for prefix in &self.strip_prefixes {
            if path == prefix {
                return "/".to_string();
            }
            if let Some(rest) = path.strip_prefix(prefix.as_str()) {
                if rest.starts_with('/') {
                    return rest.to_string();
                }
            }
        }
        path.to_string()
    }

    fn preflight(&self, path: &str, origin: Option<&str>) -> ProxyResponse {
        let mut allow: Vec<String> = self
            .router
            .methods_for(path)
            .into_iter()
            .map(|m| m.as_str().to_string())
            .collect();
        allow.push(Method::OPTIONS.as_str().to_string());

        let mut headers = BTreeMap::from([(
            "Access-Control-Allow-Methods".to_string(),
            allow.join(","),
        )]);
        self.apply_cors(&mut headers, origin);

        ProxyResponse {
            status_code: StatusCode::NO_CONTENT.as_u16(),
            status_description: self.status_description(StatusCode::NO_CONTENT),
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    fn error_response(
        &self,
        status: StatusCode,
        message: &str,
        origin: Option<&str>,
    ) -> ProxyResponse {
        let body = json!({
            "statusCode": status.as_u16(),
            "message": message,
        });
        // Error bodies bypass the custom serializer so a broken serializer
        // cannot mask the error itself.
        self.wire(ApiResponse::new(status, body.to_string()), origin)
    }

    fn wire(&self, response: ApiResponse, origin: Option<&str>) -> ProxyResponse {
        let mut headers = BTreeMap::new();
        if response.body.is_some() {
            headers.insert("Content-Type".to_string(), response.content_type.clone());
        }
        for (name, value) in &response.headers {
            headers.insert(name.clone(), value.clone());
        }
        self.apply_cors(&mut headers, origin);

        ProxyResponse {
            status_code: response.status.as_u16(),
            status_description: self.status_description(response.status),
            headers,
            body: response.body.unwrap_or_default(),
            is_base64_encoded: false,
        }
    }

    fn apply_cors(&self, headers: &mut BTreeMap<String, String>, origin: Option<&str>) {
        if let Some(cors) = &self.cors {
            if let Some(extra) = cors.headers_for(origin) {
                headers.extend(extra);
            }
        }
    }

    /// ALB targets require a status line; the other schemas omit it.
    fn status_description(&self, status: StatusCode) -> Option<String> {
        if self.event_type != EventType::Alb {
            return None;
        }
        Some(match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        })
    }
}

/// Builder carrying the four pass-through options of the shared resolver.
///
/// All options default: no CORS policy, debug from [`DEV_ENV_VAR`], compact
/// JSON serialization, no prefix stripping. Leaving an option unset is
/// indistinguishable from passing its default explicitly.
pub struct ResolverBuilder {
    event_type: EventType,
    cors: Option<CorsConfig>,
    debug: Option<bool>,
    serializer: Option<Serializer>,
    strip_prefixes: Vec<String>,
}

impl ResolverBuilder {
    pub(crate) fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            cors: None,
            debug: None,
            serializer: None,
            strip_prefixes: Vec::new(),
        }
    }

    /// Forward a cross-origin policy to responses.
    pub fn cors(mut self, cors: CorsConfig) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Enable or disable debug behavior, overriding [`DEV_ENV_VAR`].
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Replace the default JSON serialization of handler replies.
    pub fn serializer<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&Value) -> Result<String, serde_json::Error> + Send + Sync + 'static,
    {
        self.serializer = Some(Arc::new(serializer));
        self
    }

    /// Path prefixes stripped before route matching; first match wins.
    pub fn strip_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Construct the resolver with the event-type discriminator fixed.
    pub fn build(self) -> Resolver {
        let debug = self.debug.unwrap_or_else(debug_from_env);
        let serializer = self.serializer.unwrap_or_else(|| default_serializer(debug));
        Resolver {
            event_type: self.event_type,
            router: Router::default(),
            cors: self.cors,
            debug,
            serializer,
            strip_prefixes: self.strip_prefixes,
        }
    }
}

fn debug_from_env() -> bool {
    env::var(DEV_ENV_VAR).map(|value| is_truthy(&value)).unwrap_or(false)
}

/// Accepted spellings for the [`DEV_ENV_VAR`] toggle.
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("on")
}

fn default_serializer(debug: bool) -> Serializer {
    if debug {
        Arc::new(|value| serde_json::to_string_pretty(value))
    } else {
        Arc::new(|value| serde_json::to_string(value))
    }
}
