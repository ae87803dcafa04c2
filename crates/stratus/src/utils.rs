use std::collections::HashMap;

use colored::{ColoredString, Colorize};
use serde_json::Value;
use stratus_core::ResourceStatus;

/// Parse repeated spec arguments: `key=value` pairs and whole JSON
/// objects can be mixed. Values that parse as JSON keep their type
/// (numbers, booleans), anything else stays a string.
pub fn parse_spec(args: &[String]) -> anyhow::Result<HashMap<String, Value>> {
    let mut spec = HashMap::new();
    for arg in args {
        if arg.trim_start().starts_with('{') {
            let object: HashMap<String, Value> = serde_json::from_str(arg)
                .map_err(|e| anyhow::anyhow!("Invalid JSON spec '{}': {}", arg, e))?;
            spec.extend(object);
        } else {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                anyhow::anyhow!("Expected KEY=VALUE or a JSON object, got '{}'", arg)
            })?;
            spec.insert(key.to_string(), parse_value(value));
        }
    }
    Ok(spec)
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn status_colored(status: ResourceStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        ResourceStatus::Running => text.green(),
        ResourceStatus::Stopped => text.yellow(),
        ResourceStatus::Creating => text.blue(),
        ResourceStatus::Deleting => text.magenta(),
        ResourceStatus::Error => text.red(),
    }
}

pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
