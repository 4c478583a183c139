//! AWS Lambda echo function behind a VPC Lattice service network.
//!
//! Demonstrates the VPC Lattice adapter end to end: the resolver is built
//! once at cold start, and each invocation forwards the raw event and the
//! Lambda request id to [`eventgate::Resolver::resolve`].

use std::sync::OnceLock;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use tracing::info;

use eventgate::{
    init_tracing, vpc_lattice, CorsConfig, ProxyResponse, Reply, Resolver, ServiceError,
};

static RESOLVER: OnceLock<Resolver> = OnceLock::new();

/// The process-wide resolver, built on first use.
pub fn resolver() -> &'static Resolver {
    RESOLVER.get_or_init(build_resolver)
}

fn build_resolver() -> Resolver {
    let mut app = vpc_lattice().cors(CorsConfig::new()).build();

    app.get("/status", |_ctx| {
        Ok(Reply::Json(json!({"status": "ok"})))
    });

    app.post("/echo", |ctx| {
        let text = ctx
            .request
            .body
            .as_ref()
            .and_then(|body| body.as_text())
            .ok_or_else(|| ServiceError::bad_request("request body is required"))?;
        let payload: Value = serde_json::from_str(text)
            .map_err(|e| ServiceError::bad_request(format!("invalid JSON body: {}", e)))?;
        Ok(Reply::Json(json!({"echo": payload})))
    });

    app
}

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing();
    lambda_runtime::run(service_fn(handler)).await
}

/// Lambda handler invoked per request.
pub async fn handler(event: LambdaEvent<Value>) -> Result<ProxyResponse, Error> {
    let request_id = event.context.request_id.clone();
    info!(request_id = %request_id, "handling VPC Lattice invocation");
    Ok(resolver().resolve(event.payload, &request_id))
}
