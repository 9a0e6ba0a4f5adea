//! Gateway call + normalization + fallback, as one operation per route

use std::sync::Arc;

use serde_json::Value;
use shared::error::{AppError, ErrorCode};

use crate::fallback;
use crate::gateway::{GatewayClient, GatewayError, UpstreamRequest};
use crate::normalize::{Normalized, normalize};
use crate::reply::ApiReply;
use crate::samples::{SampleGenerator, SampleSeed};

#[derive(Debug, Clone)]
pub struct ProxyService {
    gateway: Arc<GatewayClient>,
    samples: SampleGenerator,
}

impl ProxyService {
    pub fn new(gateway: GatewayClient, samples: SampleGenerator) -> Self {
        Self {
            gateway: Arc::new(gateway),
            samples,
        }
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    /// Call the upstream and return the normalized payload
    ///
    /// Non-2xx status and unreadable bodies are transport failures; a
    /// rejected envelope is a business failure carrying the upstream text.
    pub async fn fetch(&self, request: UpstreamRequest) -> Result<Value, AppError> {
        let spec = request.endpoint.spec();
        let raw = self.gateway.call(request).await?;

        if !raw.status.is_success() {
            return Err(GatewayError::Status(raw.status.as_u16()).into());
        }

        let normalized = normalize(&spec, &raw.body).map_err(|e| {
            tracing::warn!(route = spec.route, error = %e, "Malformed upstream body");
            AppError::new(ErrorCode::MalformedUpstream).with_detail(e.to_string())
        })?;

        match normalized {
            Normalized::Data(data) => Ok(data),
            Normalized::Rejected { code, message } => {
                tracing::info!(route = spec.route, code = ?code, %message, "Upstream rejected request");
                let err = AppError::rejected(message);
                Err(match code {
                    Some(code) => err.with_detail(format!("upstream code {code}")),
                    None => err,
                })
            }
        }
    }

    /// Fetch and apply the endpoint's fallback policy on failure
    pub async fn forward(&self, request: UpstreamRequest, seed: SampleSeed) -> ApiReply {
        let spec = request.endpoint.spec();
        match self.fetch(request).await {
            Ok(data) => ApiReply::ok(data),
            Err(err) => fallback::apply(&spec, err, &seed, &self.samples),
        }
    }
}
