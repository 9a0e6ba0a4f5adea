//! Signed HTTP calls to the legacy backend

use std::time::Duration;

use http::{HeaderMap, StatusCode};
use reqwest::{Client, Url};

use super::environment::{Environment, UpstreamTarget};
use super::error::GatewayError;
use super::request::{UpstreamBody, UpstreamRequest};
use super::signer::{self, SecurityHeaders, SignatureScheme};

/// Everything the gateway needs to address and sign a call
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub environment: Environment,
    pub target: UpstreamTarget,
    /// Fixed auth query params
    pub uid: String,
    pub auth: String,
    pub password: String,
    pub debug: String,
    pub secret: String,
    pub client_id: String,
    pub timeout: Duration,
    pub scheme: SignatureScheme,
}

impl GatewaySettings {
    /// Settings for an environment with placeholder credentials
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            target: environment.default_target(),
            uid: String::new(),
            auth: String::new(),
            password: String::new(),
            debug: environment.default_debug().to_string(),
            secret: String::new(),
            client_id: "activity-admin".to_string(),
            timeout: Duration::from_millis(30_000),
            scheme: SignatureScheme::Digest,
        }
    }
}

/// Raw upstream response; the body is not interpreted here
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// A request resolved to its final URL and headers
#[derive(Debug)]
struct Prepared {
    url: Url,
    security: SecurityHeaders,
}

/// Upstream gateway client
///
/// Performs exactly one call per [`call`](Self::call), never retries and
/// never looks at `code`/`success` in the body.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    settings: GatewaySettings,
}

impl GatewayClient {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        // Timeout is enforced per call so a request override can shorten it
        let http = Client::builder().build()?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Issue one signed call and return the raw response
    pub async fn call(&self, request: UpstreamRequest) -> Result<RawResponse, GatewayError> {
        let prepared = self.prepare(&request)?;
        audit(&request, &prepared);

        let mut builder = self
            .http
            .request(request.method.clone(), prepared.url.clone());
        for (name, value) in prepared.security.pairs() {
            builder = builder.header(name, value);
        }
        // Overrides win over the security headers
        builder = builder.headers(request.headers.clone());
        builder = match &request.body {
            Some(UpstreamBody::Json(value)) => builder.json(value),
            Some(UpstreamBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let limit = request.timeout.unwrap_or(self.settings.timeout);
        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse {
                status,
                headers,
                body: body.to_vec(),
            })
        };

        match tokio::time::timeout(limit, exchange).await {
            Ok(result) => result.map_err(GatewayError::from),
            Err(_) => {
                tracing::warn!(
                    endpoint = ?request.endpoint,
                    timeout_ms = limit.as_millis() as u64,
                    "Upstream call cancelled by timeout"
                );
                Err(GatewayError::Timeout(limit))
            }
        }
    }

    fn prepare(&self, request: &UpstreamRequest) -> Result<Prepared, GatewayError> {
        let entry = self.settings.target.entry_url();
        let mut url = Url::parse(&entry).map_err(|e| GatewayError::InvalidUrl(format!("{entry}: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("r", request.endpoint.route())
                .append_pair("uid", &self.settings.uid)
                .append_pair("auth", &self.settings.auth)
                .append_pair("debug", &self.settings.debug)
                .append_pair("password", &self.settings.password);
            for (k, v) in &request.query {
                pairs.append_pair(k, v);
            }
        }

        let timestamp_ms = shared::util::now_millis();
        let signature = signer::sign(
            self.settings.scheme,
            request.method.as_str(),
            url.as_str(),
            timestamp_ms,
            &self.settings.secret,
        );

        Ok(Prepared {
            url,
            security: SecurityHeaders {
                client_id: self.settings.client_id.clone(),
                timestamp_ms,
                request_id: uuid::Uuid::new_v4().to_string(),
                signature,
            },
        })
    }
}

/// Scheme, host and path of a URL; the query carries credentials
fn url_prefix(url: &Url) -> String {
    let mut prefix = url.clone();
    prefix.set_query(None);
    prefix.set_fragment(None);
    prefix.to_string()
}

fn audit(request: &UpstreamRequest, prepared: &Prepared) {
    tracing::info!(
        target: "gateway::audit",
        url = %url_prefix(&prepared.url),
        route = request.endpoint.route(),
        method = %request.method,
        timestamp = prepared.security.timestamp_ms,
        request_id = %prepared.security.request_id,
        "upstream call"
    );
}
