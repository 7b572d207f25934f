//! Basic example invoking parts and invalidating their cache.
//!
//! This example shows how to:
//! - Create a client from the environment (`OCTOPARTS_ENDPOINT`, ...)
//! - Build an aggregate request with the builder and as plain JSON
//! - Read part responses and their cache state
//! - Invalidate cached part responses
//!
//! Needs a gateway with an `echo` part. Run with: `cargo run --example basic_invoke`

use octoparts::{AggregateRequest, Client, Error, PartRequest, RequestMeta};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("octoparts=debug,basic_invoke=info")
        .init();

    let client = Client::new()?;
    println!("Using gateway at {}", client.endpoint());

    println!("=== Builder Request ===");
    let request = AggregateRequest::builder()
        .request_meta(RequestMeta::new().id("demo").timeout(500))
        .part_request(PartRequest::new("echo").id("first"))
        .add_param("fooValue", "test")
        .part_request(PartRequest::new("echo").id("second"))
        .add_param("fooValue", "hoge")
        .build()?;

    let response = client.invoke(&request).await?;
    println!("Status: {}, took {:?}", response.status, response.latency);
    for part in &response.responses {
        println!(
            "  {} ({}): {} cached={}",
            part.part_id,
            part.id.as_deref().unwrap_or("-"),
            part.contents.as_deref().unwrap_or(""),
            part.cache_control.is_cached()
        );
    }

    println!("=== JSON Request ===");
    let response = client
        .invoke(json!({
            "request_meta": {"id": "demo", "timeout": 500},
            "requests": [{"part_id": "echo", "params": [{"key": "fooValue", "value": "json"}]}]
        }))
        .await?;
    if let Some(part) = response.find("echo") {
        println!("  echo: {:?}", part.contents);
    }

    println!("=== Cache Invalidation ===");
    client.invalidate_cache_param("echo", "fooValue", "test").await?;
    client.invalidate_cache("echo").await?;
    println!("  echo cache invalidated");

    Ok(())
}
