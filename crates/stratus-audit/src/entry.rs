//! Audit records, query filters and aggregate counts

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One audit event, written once and never mutated.
///
/// `resource_id` holds whichever id the action targeted: a resource id for
/// lifecycle actions, an infrastructure id for aggregate-level ones.
/// `details` is free-form context and must never carry secrets or full
/// request payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    pub resource_id: String,
    pub provider: String,
    pub success: bool,
    #[serde(default)]
    pub details: HashMap<String, Value>,
}

impl AuditLogEntry {
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        resource_id: impl Into<String>,
        provider: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            actor: actor.into(),
            action: action.into(),
            resource_id: resource_id.into(),
            provider: provider.into(),
            success,
            details: HashMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Query filter; all supplied fields must match (AND).
///
/// Text fields match on case-insensitive substring, `success` on equality.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub actor: Option<String>,
    pub action: Option<String>,
    pub provider: Option<String>,
    pub success: Option<bool>,
    pub resource_id: Option<String>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        fn contains_ci(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        if let Some(actor) = &self.actor {
            if !contains_ci(&entry.actor, actor) {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if !contains_ci(&entry.action, action) {
                return false;
            }
        }
        if let Some(provider) = &self.provider {
            if !contains_ci(&entry.provider, provider) {
                return false;
            }
        }
        if let Some(resource_id) = &self.resource_id {
            if !contains_ci(&entry.resource_id, resource_id) {
                return false;
            }
        }
        if let Some(success) = self.success {
            if entry.success != success {
                return false;
            }
        }
        true
    }
}

/// One page of a filtered query. `total` is the filtered count before
/// pagination, not the number of entries on this page.
#[derive(Debug, Clone, Serialize)]
pub struct LogPage {
    pub entries: Vec<AuditLogEntry>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Frequency tables over the whole log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub counts_by_provider: HashMap<String, usize>,
    pub counts_by_action: HashMap<String, usize>,
}
