//! # Octoparts - a client for the aggregate-part gateway
//!
//! An Octoparts gateway fans one logical request out to many named backend
//! "parts" and answers with an aggregate of their results. This crate
//! describes such a batch, sends it, parses the heterogeneous response into a
//! typed tree, and classifies every failure into a small [`Error`] taxonomy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use octoparts::{AggregateRequest, Client, PartRequest, RequestMeta};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), octoparts::Error> {
//!     let client = Client::builder()
//!         .endpoint("http://localhost:9000")?
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let request = AggregateRequest::builder()
//!         .request_meta(RequestMeta::new().id("test").timeout(500))
//!         .part_request(PartRequest::new("echo").add_param("fooValue", "test"))
//!         .build()?;
//!
//!     let response = client.invoke(request).await?;
//!     for part in &response.responses {
//!         println!("{}: {:?}", part.part_id, part.contents);
//!     }
//!
//!     client.invalidate_cache_param("echo", "fooValue", "test").await?;
//!     Ok(())
//! }
//! ```
//!
//! Requests can also be given as JSON with snake_case keys; they are
//! camelized on the way out:
//!
//! ```no_run
//! # async fn example(client: octoparts::Client) -> Result<(), octoparts::Error> {
//! let response = client
//!     .invoke(serde_json::json!({
//!         "request_meta": {"id": "test", "timeout": 500},
//!         "requests": [{"part_id": "echo", "params": [{"key": "fooValue", "value": "test"}]}]
//!     }))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use octoparts::{Client, Error};
//!
//! # async fn example(client: Client) {
//! match client.invoke(serde_json::Value::Null).await {
//!     Ok(response) => println!("{} parts", response.responses.len()),
//!     Err(Error::Argument(message)) => eprintln!("bad input: {message}"),
//!     Err(Error::Client { status, body, .. }) => eprintln!("rejected {status}: {body}"),
//!     Err(Error::Server { status, body, .. }) => eprintln!("gateway failed {status}: {body}"),
//!     Err(Error::Timeout(e)) => eprintln!("timed out: {e}"),
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! # }
//! ```
//!
//! The client never retries and never caches; each operation is exactly one
//! HTTP exchange.

pub mod builder;
pub mod casing;
mod classify;
mod client;
pub mod config;
mod error;
pub mod model;
mod response;
pub mod transport;
pub mod wire;

pub use builder::{IntoRequestBody, RequestBody, RequestBuilder};
pub use classify::classify_response;
pub use client::{Client, ClientBuilder};
pub use config::Config;
pub use error::{BoxError, Error, ErrorKind, Result};
pub use model::{
    AggregateRequest, AggregateResponse, CacheControl, PartParam, PartRequest, PartResponse,
    RequestMeta, ResponseMeta,
};
pub use response::Response;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
