//! Raw upstream envelope `{code, msg|message, success?, data}`

use serde_json::Value;

use super::NormalizeError;
use crate::gateway::SuccessRule;

/// The envelope fields the normalizer cares about
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamEnvelope {
    /// Numeric code; numeric strings (`"0"`) are accepted
    pub code: Option<i64>,
    /// Boolean `success` flag some endpoints send
    pub success: Option<bool>,
    /// `msg`, falling back to `message`
    pub message: Option<String>,
    /// The whole parsed body
    pub raw: Value,
}

/// Business verdict on one envelope
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeOutcome {
    Success(UpstreamEnvelope),
    Rejected { code: Option<i64>, message: String },
}

impl UpstreamEnvelope {
    /// Parse a response body; anything that isn't a JSON object is malformed
    pub fn parse(body: &[u8]) -> Result<Self, NormalizeError> {
        let raw: Value = serde_json::from_slice(body)?;
        if !raw.is_object() {
            return Err(NormalizeError::NotAnObject);
        }

        let code = match raw.get("code") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        let success = match raw.get("success") {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        };
        let message = ["msg", "message"]
            .iter()
            .filter_map(|key| raw.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            code,
            success,
            message,
            raw,
        })
    }

    /// Apply an endpoint's success rule
    pub fn judge(self, rule: &SuccessRule) -> EnvelopeOutcome {
        if rule.accepts(&self) {
            return EnvelopeOutcome::Success(self);
        }
        let message = self.message.unwrap_or_else(|| match self.code {
            Some(code) => format!("Upstream request failed (code {code})"),
            None => "Upstream request failed".to_string(),
        });
        EnvelopeOutcome::Rejected {
            code: self.code,
            message,
        }
    }
}

impl SuccessRule {
    pub fn accepts(&self, envelope: &UpstreamEnvelope) -> bool {
        if let Some(code) = envelope.code
            && self.codes.contains(&code)
        {
            return true;
        }
        self.accept_success_flag && envelope.success == Some(true)
    }
}
