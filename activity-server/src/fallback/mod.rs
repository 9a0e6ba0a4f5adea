//! Fallback policy
//!
//! Decides what a caller gets when the upstream call or its envelope fails.
//! Mutation and auth endpoints always see the failure. Dashboards get
//! flagged sample/default data reported as success. Read endpoints keep
//! `success: false` but may carry a documented default payload.

pub mod defaults;

use shared::error::AppError;

use crate::gateway::{EndpointKind, EndpointSpec};
use crate::reply::ApiReply;
use crate::samples::{SampleGenerator, SampleKind, SampleSeed};

/// Substitute payload declared per endpoint
#[derive(Debug, Clone, Copy)]
pub enum FallbackPolicy {
    /// Propagate the failure with `data: null`
    None,
    /// A fixed default payload
    Default(fn() -> serde_json::Value),
    /// Deterministic sample data
    Sample(SampleKind),
}

/// Turn a failed call into the reply the endpoint's policy allows
pub fn apply(
    spec: &EndpointSpec,
    err: AppError,
    seed: &SampleSeed,
    samples: &SampleGenerator,
) -> ApiReply {
    let payload = match spec.fallback {
        FallbackPolicy::None => None,
        FallbackPolicy::Default(default) => Some(default()),
        FallbackPolicy::Sample(kind) => Some(samples.generate(kind, seed)),
    };

    match (spec.kind, payload) {
        (EndpointKind::Mutation | EndpointKind::Auth, _) | (_, None) => ApiReply::error(&err),
        (EndpointKind::Dashboard, Some(data)) => {
            tracing::warn!(
                route = spec.route,
                code = %err.code,
                detail = ?err.detail,
                "Upstream failed, serving fallback data"
            );
            ApiReply::fallback(data, "Upstream unavailable, showing fallback data", &err)
        }
        (EndpointKind::Read, Some(data)) => ApiReply::error_with_data(&err, data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Endpoint;
    use chrono::NaiveDate;
    use http::StatusCode;
    use shared::error::ErrorCode;

    fn seed() -> SampleSeed {
        SampleSeed::new("act-1", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn run(endpoint: Endpoint, err: AppError) -> ApiReply {
        apply(&endpoint.spec(), err, &seed(), &SampleGenerator::new())
    }

    #[test]
    fn test_dashboard_transport_failure_becomes_flagged_success() {
        let reply = run(Endpoint::GetMonitorData, AppError::new(ErrorCode::TimeoutError));
        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.success);
        assert!(reply.body.fallback);
        assert!(reply.body.data.is_some());
    }

    #[test]
    fn test_mutation_never_succeeds() {
        for endpoint in [Endpoint::SaveConfig, Endpoint::DeleteCacheEntry, Endpoint::ReloadCache] {
            let reply = run(endpoint, AppError::rejected("x"));
            assert!(!reply.body.success, "{endpoint:?}");
            assert!(reply.body.data.is_none());
            assert!(!reply.body.fallback);
            assert_eq!(reply.body.message, "x");
        }
    }

    #[test]
    fn test_mutation_transport_failure_is_500() {
        let reply = run(Endpoint::SaveConfig, AppError::new(ErrorCode::NetworkError));
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!reply.body.success);
    }

    #[test]
    fn test_read_keeps_failure_with_default() {
        let reply = run(Endpoint::GetConfig, AppError::rejected("activity not found"));
        assert_eq!(reply.status, StatusCode::OK);
        assert!(!reply.body.success);
        assert_eq!(reply.body.message, "activity not found");
        assert_eq!(reply.body.data, Some(defaults::activity_config()));
    }

    #[test]
    fn test_field_mapping_uses_local_dictionary() {
        let reply = run(Endpoint::GetFieldMapping, AppError::new(ErrorCode::NetworkError));
        assert!(reply.body.success);
        assert!(reply.body.fallback);
        assert_eq!(reply.body.data, Some(defaults::field_mapping()));
    }

    #[test]
    fn test_auth_failure_propagates() {
        let reply = run(Endpoint::Login, AppError::rejected("wrong password"));
        assert!(!reply.body.success);
        assert!(reply.body.data.is_none());
    }
}
