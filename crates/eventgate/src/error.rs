use http::StatusCode;
use thiserror::Error;

/// Error a route handler returns to produce a structured non-200 response.
///
/// Each variant maps to an HTTP status code; the resolver renders the error
/// as a JSON body of the form `{"statusCode": n, "message": "..."}`.
///
/// # Example
///
/// ```
/// use eventgate::ServiceError;
///
/// let err = ServiceError::bad_request("the 'name' field is required");
/// assert_eq!(err.status_code().as_u16(), 400);
/// ```
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed or failed validation (400).
    #[error("{message}")]
    BadRequest { message: String },

    /// The caller is not authenticated (401).
    #[error("{message}")]
    Unauthorized { message: String },

    /// The caller is authenticated but not allowed (403).
    #[error("{message}")]
    Forbidden { message: String },

    /// The requested entity does not exist (404).
    #[error("{message}")]
    NotFound { message: String },

    /// The handler failed internally (500).
    #[error("{message}")]
    Internal { message: String },

    /// Any other status code the handler wants to signal.
    #[error("{message}")]
    Custom { status: u16, message: String },
}

impl ServiceError {
    /// Create a 400 Bad Request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 401 Unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a 403 Forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a 404 Not Found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an error with an arbitrary status code.
    ///
    /// Status codes outside the valid HTTP range fall back to 500.
    pub fn custom(status: u16, message: impl Into<String>) -> Self {
        Self::Custom {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Custom { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// The human-readable message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Internal { message }
            | Self::Custom { message, .. } => message,
        }
    }
}

/// Error raised while turning a raw event into a dispatchable request.
///
/// The resolver translates these into a 400 response rather than returning
/// them to the Lambda runtime, so a malformed event never fails the
/// invocation itself.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The raw event did not match the expected envelope schema.
    #[error("failed to deserialize {event_type} event: {source}")]
    Envelope {
        event_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope carried an HTTP method the `http` crate rejects.
    #[error("unsupported http method: {method}")]
    Method { method: String },

    /// The envelope claimed a base64 body that did not decode.
    #[error("invalid base64 request body: {0}")]
    Body(#[from] base64::DecodeError),
}
