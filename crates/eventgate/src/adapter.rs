//! Event-type adapters.
//!
//! Each factory returns a [`ResolverBuilder`] whose event-type discriminator
//! is pre-bound to one envelope schema; everything else (route registration,
//! dispatch, CORS application, error translation) is the shared resolver's
//! behavior, unchanged. Adding support for a new trigger means adding an
//! [`EventType`] variant, its envelope, and one more factory here.

use crate::event::EventType;
use crate::resolver::{Resolver, ResolverBuilder};

/// Resolver builder for VPC Lattice v1 request envelopes.
///
/// Lattice invokes the function with the request content in JSON form; see
/// <https://docs.aws.amazon.com/vpc-lattice/latest/ug/lambda-functions.html>.
///
/// # Example
///
/// ```
/// use eventgate::{vpc_lattice, EventType, Reply};
/// use serde_json::json;
///
/// let mut app = vpc_lattice().build();
/// assert_eq!(app.event_type(), EventType::VpcLattice);
///
/// app.get("/ping", |_ctx| Ok(Reply::Json(json!({"message": "pong"}))));
/// let response = app.resolve(json!({"raw_path": "/ping", "method": "GET"}), "req-1");
/// assert_eq!(response.status_code, 200);
/// ```
pub fn vpc_lattice() -> ResolverBuilder {
    Resolver::builder(EventType::VpcLattice)
}

/// Resolver builder for VPC Lattice v2 request envelopes.
pub fn vpc_lattice_v2() -> ResolverBuilder {
    Resolver::builder(EventType::VpcLatticeV2)
}

/// Resolver builder for Application Load Balancer target-group envelopes.
pub fn alb() -> ResolverBuilder {
    Resolver::builder(EventType::Alb)
}

/// Resolver builder for API Gateway REST proxy envelopes (payload v1).
pub fn api_gateway() -> ResolverBuilder {
    Resolver::builder(EventType::ApiGatewayProxy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cors::CorsConfig;

    #[test]
    fn each_adapter_binds_its_discriminator() {
        assert_eq!(vpc_lattice().build().event_type(), EventType::VpcLattice);
        assert_eq!(
            vpc_lattice_v2().build().event_type(),
            EventType::VpcLatticeV2
        );
        assert_eq!(alb().build().event_type(), EventType::Alb);
        assert_eq!(
            api_gateway().build().event_type(),
            EventType::ApiGatewayProxy
        );
    }

    #[test]
    fn options_pass_through_unchanged() {
        // Any combination of the four optional inputs still builds, with the
        // discriminator untouched.
        let app = vpc_lattice()
            .cors(CorsConfig::new().with_allow_origin("https://app.example"))
            .debug(true)
            .serializer(|value| serde_json::to_string_pretty(value))
            .strip_prefixes(["/live", "/beta"])
            .build();

        assert_eq!(app.event_type(), EventType::VpcLattice);
        assert!(app.debug_enabled());
    }
}
