//! Example demonstrating how each failure is classified.
//!
//! This example shows how to:
//! - Tell argument, client, server and transport errors apart
//! - Access the status code and raw body of HTTP-derived errors
//! - Use `Error::kind` for coarse handling
//!
//! Run with: `cargo run --example error_handling`

use octoparts::{Client, Error, ErrorKind};
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("octoparts=info")
        .init();

    let client = Client::builder().timeout(Duration::from_secs(2)).build()?;

    println!("=== Example 1: Null Input ===");
    match client.invoke(Value::Null).await {
        Err(Error::Argument(message)) => println!("Argument error (no request sent): {}", message),
        other => println!("Unexpected: {:?}", other.map(|r| r.status)),
    }
    println!();

    println!("=== Example 2: Request Rejected By The Gateway ===");
    // No requestMeta.id: structurally fine locally, rejected remotely
    match client.invoke(json!({"request_meta": {"timeout": 500}})).await {
        Ok(_) => println!("Unexpected success"),
        Err(Error::Client { status, body, .. }) => {
            println!("Client error!");
            println!("  Status: {}", status);
            println!("  Body: {}", body);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 3: Unreachable Gateway ===");
    let unreachable = Client::builder()
        .endpoint("http://127.0.0.1:1")?
        .open_timeout(Duration::from_millis(200))
        .build()?;
    match unreachable.invalidate_cache("echo").await {
        Ok(_) => println!("Unexpected success"),
        Err(e) => match e.kind() {
            ErrorKind::Timeout => println!("Timed out: {}", e),
            ErrorKind::Network => println!("Network error: {}", e),
            _ => println!("Other error: {}", e),
        },
    }
    println!();

    println!("=== Example 4: Inspecting Errors ===");
    let errors = vec![
        Error::Server {
            status: http::StatusCode::INTERNAL_SERVER_ERROR,
            body: "NG".to_string(),
            headers: http::HeaderMap::new(),
        },
        Error::Timeout("read deadline elapsed".into()),
        Error::Configuration("Invalid header".to_string()),
    ];

    for error in errors {
        println!("Error: {}", error);
        println!("  Kind: {:?}", error.kind());
        println!("  Status code: {:?}", error.status());
        println!("  Raw response: {:?}", error.raw_response());
        println!();
    }

    Ok(())
}
