//! Table-driven provisioning rules
//!
//! One static [`KindRules`] table per (provider, kind) pair replaces the
//! per-provider product hierarchies: required fields, defaults, enumerated
//! value sets and integer minimums all live in data, and a single shared
//! routine applies them.

use std::collections::HashMap;

use serde_json::Value;
use stratus_core::{Provider, ResourceKind};

use crate::error::{CloudError, FieldViolation, Result};
use crate::factory::ProviderProfile;
use crate::providers;

/// Value filled in when the caller omits an optional field.
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Str(&'static str),
    Int(i64),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::from(s),
            DefaultValue::Int(n) => Value::from(n),
        }
    }
}

/// Provisioning rules for one (provider, kind) pair.
///
/// Defaults are applied before required-field checks, so a field can be
/// both defaulted and required. Caller-supplied values always win.
pub struct KindRules {
    /// Fields that must be present after defaulting.
    pub required: &'static [&'static str],
    /// Fields filled in when absent.
    pub defaults: &'static [(&'static str, DefaultValue)],
    /// Enumerated value constraints, checked only when the field is present.
    pub allowed: &'static [(&'static str, &'static [&'static str])],
    /// Integer lower bounds, checked only when the field is present.
    pub minimums: &'static [(&'static str, i64)],
    /// Spec field rewritten by resize, when the kind has a size class.
    pub size_field: Option<&'static str>,
    /// Conditional defaulting that plain tables cannot express.
    pub refine: Option<fn(&mut HashMap<String, Value>)>,
}

/// Entry point over the per-provider rules tables.
pub struct ProviderCatalog;

impl ProviderCatalog {
    /// Rules table for one (provider, kind) pair.
    pub fn rules(provider: Provider, kind: ResourceKind) -> &'static KindRules {
        providers::rules(provider, kind)
    }

    /// Static metadata for one provider.
    pub fn profile(provider: Provider) -> &'static ProviderProfile {
        providers::profile(provider)
    }

    /// Merge defaults into `spec` (caller wins), then validate.
    ///
    /// Missing required fields are reported first; when all are present,
    /// every enumerated-set and minimum violation is collected into one
    /// error rather than stopping at the first.
    pub fn validate_and_default(
        provider: Provider,
        kind: ResourceKind,
        spec: &HashMap<String, Value>,
    ) -> Result<HashMap<String, Value>> {
        let rules = Self::rules(provider, kind);
        let mut merged = spec.clone();

        for (field, default) in rules.defaults {
            merged
                .entry((*field).to_string())
                .or_insert_with(|| default.to_value());
        }
        if let Some(refine) = rules.refine {
            refine(&mut merged);
        }

        let missing: Vec<String> = rules
            .required
            .iter()
            .filter(|field| !merged.contains_key(**field))
            .map(|field| (*field).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CloudError::MissingFields {
                provider,
                kind,
                fields: missing,
            });
        }

        let mut violations = Vec::new();
        for (field, allowed) in rules.allowed {
            if let Some(value) = merged.get(*field) {
                let text = value_as_text(value);
                if !allowed.contains(&text.as_str()) {
                    violations.push(FieldViolation {
                        field: (*field).to_string(),
                        value: text,
                        allowed: allowed.iter().map(|s| (*s).to_string()).collect(),
                    });
                }
            }
        }
        for (field, min) in rules.minimums {
            if let Some(value) = merged.get(*field) {
                match value.as_i64() {
                    Some(n) if n >= *min => {}
                    _ => violations.push(FieldViolation {
                        field: (*field).to_string(),
                        value: value_as_text(value),
                        allowed: vec![format!("{min} or greater")],
                    }),
                }
            }
        }
        if !violations.is_empty() {
            return Err(CloudError::InvalidFieldValues {
                provider,
                kind,
                violations,
            });
        }

        Ok(merged)
    }

    /// Whether `region` is legal for `provider`.
    ///
    /// Cloud providers carry a closed region set; on-premise locations are
    /// an open set and always validate.
    pub fn validate_region(provider: Provider, region: &str) -> bool {
        let regions = Self::profile(provider).regions;
        regions.is_empty() || regions.contains(&region)
    }

    pub fn supported_regions(provider: Provider) -> &'static [&'static str] {
        Self::profile(provider).regions
    }

    /// Region assumed when a spec omits one and the rules do not require it.
    pub fn default_region(provider: Provider) -> &'static str {
        Self::profile(provider).default_region
    }

    /// Spec field that resize rewrites, when the kind has one.
    pub fn size_field(provider: Provider, kind: ResourceKind) -> Option<&'static str> {
        Self::rules(provider, kind).size_field
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
