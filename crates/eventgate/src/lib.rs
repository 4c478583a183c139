//! Event routing for AWS Lambda proxy integrations.
//!
//! This crate provides a generic event-routing resolver plus per-schema
//! adapters that bind it to one inbound envelope shape:
//!
//! - [`Resolver`] / [`ResolverBuilder`]: route registration and dispatch,
//!   with pass-through CORS policy, debug flag, serializer, and
//!   prefix-stripping options
//! - [`vpc_lattice`], [`vpc_lattice_v2`], [`alb`], [`api_gateway`]: adapters
//!   pre-binding the [`EventType`] discriminator to one schema
//! - [`CorsConfig`]: cross-origin policy applied to responses
//! - [`ServiceError`]: structured error replies from route handlers
//! - [`init_tracing`]: JSON-formatted tracing for CloudWatch Logs
//!
//! # Example
//!
//! ```
//! use eventgate::{vpc_lattice, CorsConfig, Reply, ServiceError};
//! use serde_json::json;
//!
//! let mut app = vpc_lattice().cors(CorsConfig::new()).build();
//!
//! app.get("/status", |_ctx| Ok(Reply::Json(json!({"status": "ok"}))));
//! app.post("/orders", |ctx| {
//!     let body = ctx
//!         .request
//!         .body
//!         .as_ref()
//!         .and_then(|b| b.as_text())
//!         .ok_or_else(|| ServiceError::bad_request("request body is required"))?;
//!     Ok(Reply::Json(json!({"received": body.len()})))
//! });
//!
//! // Inside the Lambda handler:
//! // app.resolve(event.payload, &event.context.request_id)
//! ```

#![deny(warnings)]

mod adapter;
mod cors;
mod error;
mod event;
mod resolver;
mod response;
mod router;
mod tracing_init;

pub use adapter::{alb, api_gateway, vpc_lattice, vpc_lattice_v2};
pub use cors::{CorsConfig, REQUIRED_CORS_HEADERS};
pub use error::{ResolveError, ServiceError};
pub use event::{
    AlbEvent, AlbRequestContext, ApiGatewayProxyEvent, ApiGatewayRequestContext, Body, ElbContext,
    EventType, InboundRequest, VpcLatticeEvent, VpcLatticeV2Event, VpcLatticeV2RequestContext,
};
pub use resolver::{Resolver, ResolverBuilder, Serializer, DEV_ENV_VAR};
pub use response::{ApiResponse, ProxyResponse, Reply};
pub use router::RequestContext;
pub use tracing_init::init_tracing;
