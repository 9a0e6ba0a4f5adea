//! Envelope normalizer
//!
//! Turns a raw upstream body into either the extracted, coerced payload or
//! a business rejection, using only the endpoint's configuration row.

mod coerce;
mod envelope;
mod extract;

pub use coerce::Coercion;
pub use envelope::{EnvelopeOutcome, UpstreamEnvelope};
pub use extract::extract_payload;

use serde_json::Value;
use thiserror::Error;

use crate::gateway::EndpointSpec;

/// The body could not be read as an envelope
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("upstream body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("upstream body is not a JSON object")]
    NotAnObject,
}

/// Result of normalizing one body
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Business success with the final payload
    Data(Value),
    /// Business failure with the upstream's reason
    Rejected { code: Option<i64>, message: String },
}

/// Parse, judge, extract and coerce one upstream body
pub fn normalize(spec: &EndpointSpec, body: &[u8]) -> Result<Normalized, NormalizeError> {
    let envelope = UpstreamEnvelope::parse(body)?;
    Ok(match envelope.judge(&spec.success) {
        EnvelopeOutcome::Success(envelope) => {
            let payload = extract_payload(&envelope.raw);
            Normalized::Data(coerce::apply(spec.coercions, payload))
        }
        EnvelopeOutcome::Rejected { code, message } => Normalized::Rejected { code, message },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Endpoint;
    use serde_json::json;

    #[test]
    fn test_record_feed_pipeline() {
        let spec = Endpoint::SignInRecords.spec();
        let body = json!({
            "code": 0,
            "data": {"list": {"uid": 7, "update_time": "2024-05-01"}, "total": 1}
        });
        let out = normalize(&spec, body.to_string().as_bytes()).unwrap();
        assert_eq!(
            out,
            Normalized::Data(json!({
                "list": [{"uid": 7, "updated_time": "2024-05-01"}],
                "total": 1
            }))
        );
    }

    #[test]
    fn test_rejection_passes_message() {
        let spec = Endpoint::SaveConfig.spec();
        let out = normalize(&spec, br#"{"code":1,"msg":"x"}"#).unwrap();
        assert_eq!(
            out,
            Normalized::Rejected {
                code: Some(1),
                message: "x".into()
            }
        );
    }

    #[test]
    fn test_malformed_body() {
        let spec = Endpoint::GetConfig.spec();
        assert!(normalize(&spec, b"Fatal error").is_err());
    }
}
