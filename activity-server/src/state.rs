//! Application state

use std::sync::Arc;

use crate::config::Config;
use crate::gateway::{GatewayClient, GatewayError};
use crate::proxy::ProxyService;
use crate::samples::SampleGenerator;

/// Shared application state
///
/// Handlers hold no mutable state between requests; everything here is
/// read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub proxy: ProxyService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, GatewayError> {
        let gateway = GatewayClient::new(config.gateway.clone())?;
        Ok(Self {
            config: Arc::new(config),
            proxy: ProxyService::new(gateway, SampleGenerator::new()),
        })
    }
}
