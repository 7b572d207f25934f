//! Typed request and response models of the aggregate protocol.

mod request;
mod response;

pub use request::{AggregateRequest, PartParam, PartRequest, RequestMeta};
pub use response::{AggregateResponse, CacheControl, PartResponse, ResponseMeta};
