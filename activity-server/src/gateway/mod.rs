//! Upstream gateway
//!
//! One authenticated, signed call to the legacy PHP backend per request,
//! returning the raw response. Interpreting the body is the job of
//! [`crate::normalize`].

mod client;
mod endpoint;
mod environment;
mod error;
mod request;
pub mod signer;

pub use client::{GatewayClient, GatewaySettings, RawResponse};
pub use endpoint::{BodyEncoding, Endpoint, EndpointKind, EndpointSpec, SuccessRule};
pub use environment::{Environment, UpstreamTarget};
pub use error::GatewayError;
pub use request::{UpstreamBody, UpstreamRequest};
pub use signer::SignatureScheme;
