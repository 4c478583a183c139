//! Cross-origin policy configuration.
//!
//! The resolver never negotiates CORS; it applies the configured policy to
//! outgoing responses when the request's `Origin` header matches, and
//! answers `OPTIONS` preflights on behalf of registered routes.

/// Headers every policy allows, merged with any configured `allow_headers`.
pub const REQUIRED_CORS_HEADERS: [&str; 5] = [
    "Authorization",
    "Content-Type",
    "X-Amz-Date",
    "X-Amz-Security-Token",
    "X-Api-Key",
];

/// Cross-origin request policy forwarded unmodified to responses.
///
/// # Example
///
/// ```
/// use eventgate::CorsConfig;
///
/// let cors = CorsConfig::new()
///     .with_allow_origin("https://app.example")
///     .with_max_age(300)
///     .with_allow_credentials(true);
///
/// let headers = cors.headers_for(Some("https://app.example")).unwrap();
/// assert!(headers.iter().any(|(name, value)| {
///     name == "Access-Control-Allow-Origin" && value == "https://app.example"
/// }));
/// ```
#[derive(Debug, Clone)]
pub struct CorsConfig {
    allow_origin: String,
    extra_origins: Vec<String>,
    allow_headers: Vec<String>,
    expose_headers: Vec<String>,
    max_age: Option<u32>,
    allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            extra_origins: Vec::new(),
            allow_headers: Vec::new(),
            expose_headers: Vec::new(),
            max_age: None,
            allow_credentials: false,
        }
    }
}

impl CorsConfig {
    /// Create a policy allowing any origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary allowed origin (`*` by default).
    pub fn with_allow_origin(mut self, origin: impl Into<String>) -> Self {
        self.allow_origin = origin.into();
        self
    }

    /// Add further allowed origins beyond the primary one.
    pub fn with_extra_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Set the request headers callers may send, merged with
    /// [`REQUIRED_CORS_HEADERS`].
    pub fn with_allow_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the response headers exposed to browser scripts.
    pub fn with_expose_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expose_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Set how long (seconds) browsers may cache preflight results.
    pub fn with_max_age(mut self, seconds: u32) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Allow credentialed requests. Only emitted for a concrete matched
    /// origin, never for `*`.
    pub fn with_allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    /// Whether this policy admits the given origin.
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allow_origin == "*"
            || self.allow_origin == origin
            || self.extra_origins.iter().any(|o| o == origin)
    }

    /// Response headers for a request from `origin`.
    ///
    /// Returns `None` when the request carried no origin or the origin is
    /// not admitted; the matched origin is echoed back rather than `*`.
    pub fn headers_for(&self, origin: Option<&str>) -> Option<Vec<(String, String)>> {
        let origin = origin?;
        if !self.allows_origin(origin) {
            return None;
        }

        let mut allow_headers: Vec<String> = REQUIRED_CORS_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.allow_headers.iter().cloned())
            .collect();
        allow_headers.sort();
        allow_headers.dedup();

        let mut headers = vec![
            (
                "Access-Control-Allow-Origin".to_string(),
                origin.to_string(),
            ),
            (
                "Access-Control-Allow-Headers".to_string(),
                allow_headers.join(","),
            ),
        ];
        if !self.expose_headers.is_empty() {
            headers.push((
                "Access-Control-Expose-Headers".to_string(),
                self.expose_headers.join(","),
            ));
        }
        if let Some(max_age) = self.max_age {
            headers.push(("Access-Control-Max-Age".to_string(), max_age.to_string()));
        }
        if self.allow_credentials && origin != "*" {
            headers.push((
                "Access-Control-Allow-Credentials".to_string(),
                "true".to_string(),
            ));
        }
        Some(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn wildcard_policy_echoes_request_origin() {
        let cors = CorsConfig::new();
        let headers = cors.headers_for(Some("https://a.example")).unwrap();
        assert_eq!(
            header(&headers, "Access-Control-Allow-Origin"),
            Some("https://a.example")
        );
    }

    #[test]
    fn no_origin_yields_no_headers() {
        let cors = CorsConfig::new();
        assert!(cors.headers_for(None).is_none());
    }

    #[test]
    fn mismatched_origin_yields_no_headers() {
        let cors = CorsConfig::new().with_allow_origin("https://app.example");
        assert!(cors.headers_for(Some("https://evil.example")).is_none());
    }

    #[test]
    fn extra_origins_are_admitted() {
        let cors = CorsConfig::new()
            .with_allow_origin("https://app.example")
            .with_extra_origins(["https://admin.example"]);
        assert!(cors.allows_origin("https://admin.example"));
        assert!(cors.headers_for(Some("https://admin.example")).is_some());
    }

    #[test]
    fn allow_headers_merge_with_required_set() {
        let cors = CorsConfig::new().with_allow_headers(["X-Custom", "Content-Type"]);
        let headers = cors.headers_for(Some("https://a.example")).unwrap();
        let allow = header(&headers, "Access-Control-Allow-Headers").unwrap();

        assert!(allow.contains("X-Custom"));
        assert!(allow.contains("Authorization"));
        // Content-Type appears once despite being in both sets.
        assert_eq!(allow.matches("Content-Type").count(), 1);
    }

    #[test]
    fn credentials_only_for_concrete_origin() {
        let cors = CorsConfig::new()
            .with_allow_origin("https://app.example")
            .with_allow_credentials(true);
        let headers = cors.headers_for(Some("https://app.example")).unwrap();
        assert_eq!(
            header(&headers, "Access-Control-Allow-Credentials"),
            Some("true")
        );
    }

    #[test]
    fn max_age_and_expose_headers_are_optional() {
        let plain = CorsConfig::new();
        let headers = plain.headers_for(Some("https://a.example")).unwrap();
        assert!(header(&headers, "Access-Control-Max-Age").is_none());
        assert!(header(&headers, "Access-Control-Expose-Headers").is_none());

        let rich = CorsConfig::new()
            .with_max_age(600)
            .with_expose_headers(["X-Request-Id"]);
        let headers = rich.headers_for(Some("https://a.example")).unwrap();
        assert_eq!(header(&headers, "Access-Control-Max-Age"), Some("600"));
        assert_eq!(
            header(&headers, "Access-Control-Expose-Headers"),
            Some("X-Request-Id")
        );
    }
}
