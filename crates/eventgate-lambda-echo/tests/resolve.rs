//! Integration tests driving the echo function's resolver with full
//! VPC Lattice event payloads.

use serde_json::{json, Value};

use eventgate_lambda_echo::resolver;

#[test]
fn echo_round_trips_a_json_body() {
    let event = json!({
        "raw_path": "/echo",
        "method": "POST",
        "headers": {"content-type": "application/json"},
        "body": "{\"order\": 7, \"qty\": 2}",
        "is_base64_encoded": false
    });
    let response = resolver().resolve(event, "test-request-echo");

    assert_eq!(response.status_code, 200);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["echo"]["order"], 7);
    assert_eq!(body["echo"]["qty"], 2);
}

#[test]
fn echo_accepts_base64_encoded_bodies() {
    // "{\"a\":1}" base64-encoded, as Lattice delivers binary-safe bodies.
    let event = json!({
        "raw_path": "/echo",
        "method": "POST",
        "body": "eyJhIjoxfQ==",
        "is_base64_encoded": true
    });
    let response = resolver().resolve(event, "test-request-echo-b64");

    assert_eq!(response.status_code, 200);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["echo"]["a"], 1);
}

#[test]
fn malformed_json_body_is_a_400() {
    let event = json!({
        "raw_path": "/echo",
        "method": "POST",
        "body": "not json",
        "is_base64_encoded": false
    });
    let response = resolver().resolve(event, "test-request-echo-bad");

    assert_eq!(response.status_code, 400);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert!(body["message"].as_str().unwrap().contains("invalid JSON body"));
}

#[test]
fn unknown_route_is_a_404() {
    let event = json!({"raw_path": "/nope", "method": "GET"});
    let response = resolver().resolve(event, "test-request-nope");

    assert_eq!(response.status_code, 404);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body, json!({"statusCode": 404, "message": "Not found"}));
}

#[test]
fn cross_origin_requests_get_cors_headers() {
    let event = json!({
        "raw_path": "/status",
        "method": "GET",
        "headers": {"Origin": "https://console.example"}
    });
    let response = resolver().resolve(event, "test-request-cors");

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response
            .headers
            .get("Access-Control-Allow-Origin")
            .map(String::as_str),
        Some("https://console.example")
    );
}

#[test]
fn preflight_is_answered_without_a_handler() {
    let event = json!({
        "raw_path": "/echo",
        "method": "OPTIONS",
        "headers": {"Origin": "https://console.example"}
    });
    let response = resolver().resolve(event, "test-request-preflight");

    assert_eq!(response.status_code, 204);
    assert_eq!(
        response
            .headers
            .get("Access-Control-Allow-Methods")
            .map(String::as_str),
        Some("POST,OPTIONS")
    );
}
