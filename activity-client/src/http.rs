//! HTTP client for the activity-server routes

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::NormalizedResponse;
use shared::client::{LoginRequest, LoginResponse, VerifyRequest, VerifyResponse};
use shared::models::FieldNameMapping;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Credential exchange and token verification
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse>;
    async fn verify(&self, token: &str) -> ClientResult<VerifyResponse>;
}

/// Field-name mapping as served
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMapping {
    pub mapping: FieldNameMapping,
    /// The server answered with its built-in dictionary instead of the upstream one
    pub fallback: bool,
}

/// Source of the field-name mapping
#[async_trait]
pub trait FieldMappingApi: Send + Sync {
    async fn field_mapping(&self) -> ClientResult<FetchedMapping>;
}

/// Network client for activity-server
#[derive(Debug, Clone)]
pub struct AdminHttpClient {
    client: Client,
    base_url: String,
}

impl AdminHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET returning the payload and the envelope's `fallback` flag
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<(T, bool)> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;
        let (data, _) = Self::handle_response(response).await?;
        Ok(data)
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<(T, bool)> {
        let status = response.status();
        let text = response.text().await?;
        let envelope: NormalizedResponse<Value> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if status.is_server_error() => {
                return Err(ClientError::Unavailable(format!("HTTP {status}")));
            }
            Err(e) => return Err(ClientError::InvalidResponse(format!("HTTP {status}: {e}"))),
        };

        if status.is_server_error() {
            return Err(ClientError::Unavailable(envelope.message));
        }
        if status == StatusCode::BAD_REQUEST {
            return Err(ClientError::Validation(envelope.message));
        }
        if !envelope.success {
            return Err(ClientError::Rejected {
                message: envelope.message,
            });
        }

        let data = envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("success without data".into()))?;
        Ok((serde_json::from_value(data)?, envelope.fallback))
    }
}

#[async_trait]
impl AuthApi for AdminHttpClient {
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post("api/auth/login", &body).await
    }

    async fn verify(&self, token: &str) -> ClientResult<VerifyResponse> {
        let body = VerifyRequest {
            token: token.to_string(),
        };
        self.post("api/auth/verify", &body).await
    }
}

#[async_trait]
impl FieldMappingApi for AdminHttpClient {
    async fn field_mapping(&self) -> ClientResult<FetchedMapping> {
        let (mapping, fallback) = self.get("api/field-mapping").await?;
        Ok(FetchedMapping { mapping, fallback })
    }
}
