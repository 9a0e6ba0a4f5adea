//! Outbound call descriptor

use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;

use super::endpoint::{BodyEncoding, Endpoint};

/// Body of an outbound call
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

/// One call to the legacy backend
///
/// Timestamp and signature are not stored here; they are generated by
/// [`GatewayClient`](super::GatewayClient) at send time so that a request
/// built ahead of time is never sent with a stale signature.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub endpoint: Endpoint,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<UpstreamBody>,
    /// Overrides applied after the security headers
    pub headers: HeaderMap,
    /// Per-call override of the configured timeout
    pub timeout: Option<Duration>,
}

impl UpstreamRequest {
    /// Request using the endpoint's configured method and no body
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            method: endpoint.spec().method,
            endpoint,
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a query parameter only when a value is present
    pub fn query_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(UpstreamBody::Json(body));
        self
    }

    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.body = Some(UpstreamBody::Form(fields));
        self
    }

    /// Encode a JSON object according to the endpoint's declared body encoding
    ///
    /// Form encoding stringifies scalar values and JSON-encodes nested ones.
    /// Endpoints without a body put the fields on the query string instead.
    pub fn with_fields(self, fields: Value) -> Self {
        match self.endpoint.spec().encoding {
            BodyEncoding::Json => self.json(fields),
            BodyEncoding::Form => {
                let pairs = flatten(&fields);
                self.form(pairs)
            }
            BodyEncoding::None => {
                let mut req = self;
                for (k, v) in flatten(&fields) {
                    req = req.query(k, v);
                }
                req
            }
        }
    }

    /// Add a header override; invalid names or values are ignored
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

fn flatten(fields: &Value) -> Vec<(String, String)> {
    let Some(map) = fields.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), v)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_uses_endpoint_method() {
        assert_eq!(UpstreamRequest::new(Endpoint::Login).method, Method::POST);
        assert_eq!(UpstreamRequest::new(Endpoint::GetConfig).method, Method::GET);
    }

    #[test]
    fn test_with_fields_form_encoding() {
        let req = UpstreamRequest::new(Endpoint::Login)
            .with_fields(json!({"username": "admin", "password": "pw", "remember": true}));
        let Some(UpstreamBody::Form(pairs)) = req.body else {
            panic!("expected form body");
        };
        assert!(pairs.contains(&("username".to_string(), "admin".to_string())));
        assert!(pairs.contains(&("remember".to_string(), "true".to_string())));
    }

    #[test]
    fn test_with_fields_json_encoding() {
        let fields = json!({"activity_id": "a1", "config": {"enabled": true}});
        let req = UpstreamRequest::new(Endpoint::SaveConfig).with_fields(fields.clone());
        assert_eq!(req.body, Some(UpstreamBody::Json(fields)));
    }

    #[test]
    fn test_with_fields_on_get_goes_to_query() {
        let req = UpstreamRequest::new(Endpoint::GetConfig)
            .with_fields(json!({"activity_id": "a1", "skip": null}));
        assert!(req.body.is_none());
        assert_eq!(req.query, vec![("activity_id".to_string(), "a1".to_string())]);
    }

    #[test]
    fn test_invalid_header_is_ignored() {
        let req = UpstreamRequest::new(Endpoint::GetConfig)
            .header("x-trace", "abc")
            .header("bad header", "v");
        assert_eq!(req.headers.len(), 1);
    }
}
