//! Upstream endpoint table
//!
//! Every operation the dashboard can ask of the legacy backend is an
//! [`Endpoint`]; its per-endpoint behaviour (route name, method, body
//! encoding, success rule, coercions, fallback) lives in one
//! [`EndpointSpec`] row so handlers never branch on upstream quirks.

use http::Method;
use serde::Serialize;
use shared::models::ActivityKind;

use crate::fallback::{FallbackPolicy, defaults};
use crate::normalize::Coercion;
use crate::samples::SampleKind;

/// Known upstream operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Login,
    VerifyToken,
    GetConfig,
    SaveConfig,
    GetMonitorData,
    ReloadCache,
    DeleteCacheEntry,
    GetFieldMapping,
    DiscoverApis,
    SignInRecords,
    LotteryRecords,
    TaskRecords,
    RechargeRecords,
    FestivalRanking,
}

/// How the route behaves when the upstream fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Credential exchange; never substituted
    Auth,
    /// Read-only; may carry a default payload but still reports failure
    Read,
    /// Informational dashboard; fallback data is reported as success
    Dashboard,
    /// Changes upstream state; failure always propagates
    Mutation,
}

/// Outbound body encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    None,
    Json,
    Form,
}

/// Which envelopes count as business success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessRule {
    /// Accepted values of the envelope's `code`
    pub codes: &'static [i64],
    /// Also accept a boolean `success: true`
    pub accept_success_flag: bool,
}

impl SuccessRule {
    /// `code == 0` only
    pub const STRICT: SuccessRule = SuccessRule {
        codes: &[0],
        accept_success_flag: false,
    };

    /// `code` 0 or 200, or `success: true`
    pub const LENIENT: SuccessRule = SuccessRule {
        codes: &[0, 200],
        accept_success_flag: true,
    };

    /// `code` 0 or 200
    pub const ZERO_OR_200: SuccessRule = SuccessRule {
        codes: &[0, 200],
        accept_success_flag: false,
    };
}

/// One row of the endpoint table
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    pub endpoint: Endpoint,
    /// Value of the `r=` query parameter
    pub route: &'static str,
    pub method: Method,
    pub encoding: BodyEncoding,
    pub success: SuccessRule,
    pub coercions: &'static [Coercion],
    pub kind: EndpointKind,
    pub fallback: FallbackPolicy,
}

const RECORD_COERCIONS: &[Coercion] = &[
    Coercion::ListField("list"),
    Coercion::Rename {
        from: "update_time",
        to: "updated_time",
    },
];

impl Endpoint {
    pub const ALL: [Endpoint; 14] = [
        Endpoint::Login,
        Endpoint::VerifyToken,
        Endpoint::GetConfig,
        Endpoint::SaveConfig,
        Endpoint::GetMonitorData,
        Endpoint::ReloadCache,
        Endpoint::DeleteCacheEntry,
        Endpoint::GetFieldMapping,
        Endpoint::DiscoverApis,
        Endpoint::SignInRecords,
        Endpoint::LotteryRecords,
        Endpoint::TaskRecords,
        Endpoint::RechargeRecords,
        Endpoint::FestivalRanking,
    ];

    /// Record feed for an activity family
    pub fn for_activity(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::SignIn => Self::SignInRecords,
            ActivityKind::Lottery => Self::LotteryRecords,
            ActivityKind::Tasks => Self::TaskRecords,
            ActivityKind::Recharge => Self::RechargeRecords,
            ActivityKind::Festival => Self::FestivalRanking,
        }
    }

    pub fn route(&self) -> &'static str {
        self.spec().route
    }

    /// The configuration row for this endpoint
    pub fn spec(&self) -> EndpointSpec {
        use BodyEncoding as B;
        use EndpointKind as K;

        let endpoint = *self;
        let row = |route,
                   method,
                   encoding,
                   success,
                   coercions: &'static [Coercion],
                   kind,
                   fallback| EndpointSpec {
            endpoint,
            route,
            method,
            encoding,
            success,
            coercions,
            kind,
            fallback,
        };

        match self {
            Self::Login => row(
                "admin.login",
                Method::POST,
                B::Form,
                SuccessRule::LENIENT,
                &[],
                K::Auth,
                FallbackPolicy::None,
            ),
            Self::VerifyToken => row(
                "admin.verifyToken",
                Method::POST,
                B::Form,
                SuccessRule::LENIENT,
                &[],
                K::Auth,
                FallbackPolicy::None,
            ),
            Self::GetConfig => row(
                "activity.getConfig",
                Method::GET,
                B::None,
                SuccessRule::STRICT,
                &[Coercion::Rename {
                    from: "update_time",
                    to: "updated_time",
                }],
                K::Read,
                FallbackPolicy::Default(defaults::activity_config),
            ),
            Self::SaveConfig => row(
                "activity.saveConfig",
                Method::POST,
                B::Json,
                SuccessRule::STRICT,
                &[],
                K::Mutation,
                FallbackPolicy::None,
            ),
            Self::GetMonitorData => row(
                "monitor.getData",
                Method::GET,
                B::None,
                SuccessRule::STRICT,
                &[Coercion::ListField("series"), Coercion::ListField("alerts")],
                K::Dashboard,
                FallbackPolicy::Sample(SampleKind::MonitorSnapshot),
            ),
            Self::ReloadCache => row(
                "cache.reload",
                Method::POST,
                B::Form,
                SuccessRule::ZERO_OR_200,
                &[],
                K::Mutation,
                FallbackPolicy::None,
            ),
            Self::DeleteCacheEntry => row(
                "cache.delete",
                Method::POST,
                B::Form,
                SuccessRule::STRICT,
                &[],
                K::Mutation,
                FallbackPolicy::None,
            ),
            Self::GetFieldMapping => row(
                "system.fieldMapping",
                Method::GET,
                B::None,
                SuccessRule::ZERO_OR_200,
                &[],
                K::Dashboard,
                FallbackPolicy::Default(defaults::field_mapping),
            ),
            Self::DiscoverApis => row(
                "system.apiList",
                Method::GET,
                B::None,
                SuccessRule::ZERO_OR_200,
                &[Coercion::ListField("apis")],
                K::Dashboard,
                FallbackPolicy::Sample(SampleKind::ApiCatalog),
            ),
            Self::SignInRecords => row(
                "signin.records",
                Method::GET,
                B::None,
                SuccessRule::STRICT,
                RECORD_COERCIONS,
                K::Dashboard,
                FallbackPolicy::Sample(SampleKind::ActivityRecords(ActivityKind::SignIn)),
            ),
            Self::LotteryRecords => row(
                "lottery.records",
                Method::GET,
                B::None,
                SuccessRule::STRICT,
                RECORD_COERCIONS,
                K::Dashboard,
                FallbackPolicy::Sample(SampleKind::ActivityRecords(ActivityKind::Lottery)),
            ),
            Self::TaskRecords => row(
                "task.list",
                Method::GET,
                B::None,
                SuccessRule::STRICT,
                RECORD_COERCIONS,
                K::Dashboard,
                FallbackPolicy::Sample(SampleKind::ActivityRecords(ActivityKind::Tasks)),
            ),
            Self::RechargeRecords => row(
                "recharge.records",
                Method::GET,
                B::None,
                SuccessRule::STRICT,
                RECORD_COERCIONS,
                K::Dashboard,
                FallbackPolicy::Sample(SampleKind::ActivityRecords(ActivityKind::Recharge)),
            ),
            Self::FestivalRanking => row(
                "festival.ranking",
                Method::GET,
                B::None,
                SuccessRule::STRICT,
                RECORD_COERCIONS,
                K::Dashboard,
                FallbackPolicy::Sample(SampleKind::Ranking),
            ),
        }
    }
}
