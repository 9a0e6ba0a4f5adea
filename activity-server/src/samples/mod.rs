//! Deterministic sample data
//!
//! Placeholder payloads used only by the fallback layer. Output depends on
//! `(kind, seed key, anchor date)` and nothing else, so a dashboard that
//! falls back twice on the same day shows the same numbers.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use shared::models::ActivityKind;

use crate::gateway::Endpoint;

const NICKNAMES: &[&str] = &[
    "StarFan", "MoonWalker", "LuckyCat", "NightOwl", "SunnyDay", "RedPanda", "BlueWhale",
    "GoldFish", "IronBird", "SilverFox",
];
const PRIZES: &[&str] = &["coins x100", "gift box", "vip card 7d", "badge", "thanks"];
const TASKS: &[&str] = &[
    "watch 10 minutes",
    "send a gift",
    "share a stream",
    "follow a host",
    "daily check-in",
];

/// Which payload shape to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    MonitorSnapshot,
    ApiCatalog,
    ActivityRecords(ActivityKind),
    Ranking,
}

impl SampleKind {
    fn label(&self) -> String {
        match self {
            Self::MonitorSnapshot => "monitor".to_string(),
            Self::ApiCatalog => "catalog".to_string(),
            Self::ActivityRecords(kind) => format!("records:{}", kind.slug()),
            Self::Ranking => "ranking".to_string(),
        }
    }
}

/// Inputs that pin a sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSeed {
    /// Usually the activity id the caller asked about
    pub key: String,
    /// Day all generated timestamps fall on
    pub anchor: NaiveDate,
}

impl SampleSeed {
    pub fn new(key: impl Into<String>, anchor: NaiveDate) -> Self {
        Self {
            key: key.into(),
            anchor,
        }
    }

    /// Seed anchored on today's UTC date
    pub fn today(key: impl Into<String>) -> Self {
        Self::new(key, chrono::Utc::now().date_naive())
    }
}

/// Pure sample generator
#[derive(Debug, Clone, Copy)]
pub struct SampleGenerator {
    /// Rows per generated list
    rows: usize,
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleGenerator {
    pub fn new() -> Self {
        Self { rows: 10 }
    }

    pub fn with_rows(rows: usize) -> Self {
        Self { rows }
    }

    pub fn generate(&self, kind: SampleKind, seed: &SampleSeed) -> Value {
        let mut rng = rng_for(kind, seed);
        match kind {
            SampleKind::MonitorSnapshot => monitor_snapshot(&mut rng, seed),
            SampleKind::ApiCatalog => api_catalog(),
            SampleKind::ActivityRecords(activity) => {
                let list: Vec<Value> = (0..self.rows)
                    .map(|i| record_row(&mut rng, activity, seed, i))
                    .collect();
                json!({
                    "list": list,
                    "total": self.rows,
                    "page": 1,
                    "page_size": self.rows,
                })
            }
            SampleKind::Ranking => ranking(&mut rng, self.rows),
        }
    }
}

fn rng_for(kind: SampleKind, seed: &SampleSeed) -> StdRng {
    let digest = Sha256::digest(format!("{}|{}|{}", kind.label(), seed.key, seed.anchor));
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    StdRng::seed_from_u64(u64::from_le_bytes(bytes))
}

fn stamp(rng: &mut StdRng, anchor: NaiveDate) -> String {
    let (h, m, s) = (
        rng.gen_range(0..24u32),
        rng.gen_range(0..60u32),
        rng.gen_range(0..60u32),
    );
    format!("{} {h:02}:{m:02}:{s:02}", anchor.format("%Y-%m-%d"))
}

fn pick<'a>(rng: &mut StdRng, items: &'a [&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn monitor_snapshot(rng: &mut StdRng, seed: &SampleSeed) -> Value {
    let series: Vec<Value> = (0..24)
        .map(|hour| {
            let participants: u32 = rng.gen_range(20..500);
            json!({
                "hour": format!("{hour:02}:00"),
                "participants": participants,
                "rewards": rng.gen_range(0..=participants),
            })
        })
        .collect();
    let participants: u64 = series
        .iter()
        .filter_map(|p| p["participants"].as_u64())
        .sum();
    let rewards: u64 = series.iter().filter_map(|p| p["rewards"].as_u64()).sum();
    let conversion = if participants == 0 {
        0.0
    } else {
        (rewards as f64 / participants as f64 * 10_000.0).round() / 100.0
    };

    json!({
        "activity_id": seed.key,
        "date": seed.anchor.format("%Y-%m-%d").to_string(),
        "summary": {
            "participants": participants,
            "rewards_issued": rewards,
            "conversion_rate": conversion,
        },
        "series": series,
        "alerts": [],
    })
}

fn api_catalog() -> Value {
    let apis: Vec<Value> = Endpoint::ALL
        .iter()
        .map(|endpoint| {
            let spec = endpoint.spec();
            json!({
                "name": endpoint,
                "route": spec.route,
                "method": spec.method.as_str(),
                "kind": spec.kind,
            })
        })
        .collect();
    json!({ "apis": apis })
}

fn record_row(rng: &mut StdRng, kind: ActivityKind, seed: &SampleSeed, index: usize) -> Value {
    let id = index + 1;
    let uid: u32 = rng.gen_range(100_000..999_999);
    let nickname = pick(rng, NICKNAMES);
    let at = stamp(rng, seed.anchor);
    match kind {
        ActivityKind::SignIn => json!({
            "id": id,
            "uid": uid,
            "nickname": nickname,
            "sign_day": rng.gen_range(1..=7),
            "reward": rng.gen_range(1..=10) * 10,
            "created_time": at,
            "updated_time": at,
        }),
        ActivityKind::Lottery => json!({
            "id": id,
            "uid": uid,
            "nickname": nickname,
            "prize": pick(rng, PRIZES),
            "cost": rng.gen_range(1..=5) * 100,
            "created_time": at,
        }),
        ActivityKind::Tasks => {
            let target: u32 = rng.gen_range(1..=10);
            let completed = rng.gen_range(0..=target);
            json!({
                "id": id,
                "uid": uid,
                "task_name": pick(rng, TASKS),
                "target": target,
                "completed": completed,
                "status": if completed == target { "done" } else { "in_progress" },
                "updated_time": at,
            })
        }
        ActivityKind::Recharge => json!({
            "id": id,
            "uid": uid,
            "nickname": nickname,
            "amount": rng.gen_range(1..=100) * 6,
            "order_no": format!("R{}{:04}", seed.anchor.format("%Y%m%d"), id),
            "created_time": at,
        }),
        ActivityKind::Festival => json!({
            "id": id,
            "uid": uid,
            "nickname": nickname,
            "score": rng.gen_range(100..100_000),
            "created_time": at,
        }),
    }
}

fn ranking(rng: &mut StdRng, rows: usize) -> Value {
    let mut scores: Vec<u32> = (0..rows).map(|_| rng.gen_range(1_000..500_000)).collect();
    scores.sort_unstable_by(|a, b| b.cmp(a));
    let list: Vec<Value> = scores
        .into_iter()
        .enumerate()
        .map(|(i, score)| {
            json!({
                "rank": i + 1,
                "uid": rng.gen_range(100_000..999_999),
                "nickname": pick(rng, NICKNAMES),
                "score": score,
            })
        })
        .collect();
    json!({ "list": list, "total": rows })
}
