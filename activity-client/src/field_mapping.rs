//! Field-name mapping cache with TTL
//!
//! The mapping is stored under [`FIELD_MAPPING_KEY`] together with the time
//! it was saved. A fresh entry is served without a request; a stale one is
//! refetched, and kept as the answer if the refetch fails. A mapping the
//! server marked as its built-in fallback is never cached, and loses to a
//! stale copy.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::models::FieldNameMapping;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::{FetchedMapping, FieldMappingApi};
use crate::session::SessionStore;
use crate::session::store::{FIELD_MAPPING_KEY, load_json, save_json};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedMapping {
    /// Epoch milliseconds
    saved_at: i64,
    mapping: FieldNameMapping,
}

pub struct FieldMappingCache {
    api: Arc<dyn FieldMappingApi>,
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl FieldMappingCache {
    pub fn new(api: Arc<dyn FieldMappingApi>, store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { api, store, ttl }
    }

    /// Cache with the configured TTL
    pub fn from_config(
        api: Arc<dyn FieldMappingApi>,
        store: Arc<dyn SessionStore>,
        config: &ClientConfig,
    ) -> Self {
        Self::new(api, store, config.field_mapping_ttl)
    }

    pub async fn get(&self) -> ClientResult<FieldNameMapping> {
        let cached = self.read_cached();
        if let Some(entry) = &cached
            && self.is_fresh(entry)
        {
            return Ok(entry.mapping.clone());
        }

        match self.api.field_mapping().await {
            Ok(FetchedMapping {
                mapping,
                fallback: true,
            }) => match cached {
                Some(entry) => {
                    tracing::warn!("Server sent fallback field mapping, using stale copy");
                    Ok(entry.mapping)
                }
                None => Ok(mapping),
            },
            Ok(FetchedMapping { mapping, .. }) => {
                let entry = CachedMapping {
                    saved_at: shared::util::now_millis(),
                    mapping: mapping.clone(),
                };
                if let Err(e) = save_json(self.store.as_ref(), FIELD_MAPPING_KEY, &entry) {
                    tracing::warn!(error = %e, "Failed to cache field mapping");
                }
                Ok(mapping)
            }
            Err(err) => match cached {
                Some(entry) => {
                    tracing::warn!(error = %err, "Field mapping refresh failed, using stale copy");
                    Ok(entry.mapping)
                }
                None => Err(err),
            },
        }
    }

    /// Drop the cached copy
    pub fn invalidate(&self) {
        if let Err(e) = self.store.remove(FIELD_MAPPING_KEY) {
            tracing::warn!(error = %e, "Failed to drop cached field mapping");
        }
    }

    fn read_cached(&self) -> Option<CachedMapping> {
        load_json(self.store.as_ref(), FIELD_MAPPING_KEY).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Cached field mapping unreadable");
            None
        })
    }

    fn is_fresh(&self, entry: &CachedMapping) -> bool {
        let age = shared::util::now_millis().saturating_sub(entry.saved_at);
        age >= 0 && (age as u128) < self.ttl.as_millis()
    }
}

/// Label for a raw field name, falling back to the name itself
pub fn label<'a>(mapping: &'a FieldNameMapping, field: &'a str) -> &'a str {
    mapping.get(field).map(String::as_str).unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_falls_back_to_field() {
        let mut mapping = FieldNameMapping::new();
        mapping.insert("uid".into(), "User ID".into());
        assert_eq!(label(&mapping, "uid"), "User ID");
        assert_eq!(label(&mapping, "score"), "score");
    }
}
