//! Route table: exact-match lookup keyed on method and normalized path.

use std::collections::HashMap;

use http::Method;

use crate::error::ServiceError;
use crate::event::InboundRequest;
use crate::response::Reply;

/// Boxed route handler stored in the table.
pub type Handler = Box<dyn Fn(&RequestContext) -> Result<Reply, ServiceError> + Send + Sync>;

/// Per-invocation view handed to route handlers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The normalized inbound request.
    pub request: InboundRequest,
    /// The matched route path, after prefix stripping and normalization.
    pub route_path: String,
    /// Lambda request id for log correlation.
    pub request_id: String,
}

/// Registration and lookup of `(method, path) -> handler`.
///
/// Registering the same pair twice replaces the earlier handler.
#[derive(Default)]
pub(crate) struct Router {
    routes: HashMap<(Method, String), Handler>,
}

impl Router {
    pub fn register(&mut self, method: Method, path: &str, handler: Handler) {
        self.routes.insert((method, normalize_path(path)), handler);
    }

    pub fn find(&self, method: &Method, path: &str) -> Option<&Handler> {
        self.routes.get(&(method.clone(), normalize_path(path)))
    }

    /// Methods registered for a path, sorted for deterministic preflights.
    pub fn methods_for(&self, path: &str) -> Vec<Method> {
        let path = normalize_path(path);
        let mut methods: Vec<Method> = self
            .routes
            .keys()
            .filter(|(_, p)| *p == path)
            .map(|(m, _)| m.clone())
            .collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Canonical form used for both registration and lookup: leading slash,
/// no trailing slash, bare or empty paths become `/`.
pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop() -> Handler {
        Box::new(|_| Ok(Reply::Json(json!(null))))
    }

    #[test]
    fn normalize_path_canonical_forms() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/a/"), "/a");
        assert_eq!(normalize_path("a"), "/a");
        assert_eq!(normalize_path("/a/b"), "/a/b");
    }

    #[test]
    fn find_matches_method_and_path() {
        let mut router = Router::default();
        router.register(Method::GET, "/status", noop());

        assert!(router.find(&Method::GET, "/status").is_some());
        assert!(router.find(&Method::GET, "/status/").is_some());
        assert!(router.find(&Method::POST, "/status").is_none());
        assert!(router.find(&Method::GET, "/other").is_none());
    }

    #[test]
    fn reregistration_replaces_handler() {
        let mut router = Router::default();
        router.register(Method::GET, "/x", Box::new(|_| Ok(Reply::Json(json!(1)))));
        router.register(Method::GET, "/x", Box::new(|_| Ok(Reply::Json(json!(2)))));

        let request = crate::event::EventType::VpcLattice
            .parse(json!({"raw_path": "/x", "method": "GET"}))
            .unwrap();
        let ctx = RequestContext {
            request,
            route_path: "/x".to_string(),
            request_id: "test-request-replace".to_string(),
        };
        let handler = router.find(&Method::GET, "/x").unwrap();
        match handler(&ctx).unwrap() {
            Reply::Json(value) => assert_eq!(value, json!(2)),
            Reply::Response(_) => panic!("expected json reply"),
        }
    }

    #[test]
    fn methods_for_is_sorted() {
        let mut router = Router::default();
        router.register(Method::POST, "/x", noop());
        router.register(Method::DELETE, "/x", noop());
        router.register(Method::GET, "/x", noop());
        router.register(Method::GET, "/y", noop());

        assert_eq!(
            router.methods_for("/x"),
            vec![Method::DELETE, Method::GET, Method::POST]
        );
        assert!(!router.is_empty());
    }
}
