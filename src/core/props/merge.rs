// ─── Property List Merge ───
// Applies global ban/op/whitelist entries to a local server instance list.

use std::path::Path;

use serde_json::Value;
use tracing::error;

use crate::core::error::{AdminError, AdminResult};

/// The identity an entry participates in de-duplication with, if any.
fn identity(entry: &Value) -> Option<&Value> {
    match entry {
        Value::Object(map) => map.get("uuid"),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn into_array(value: Value, which: &str) -> AdminResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => {
            let found = value_kind(&other).to_string();
            error!("Expected top level array in {}, found [{}] instead", which, found);
            Err(AdminError::NotAnArray {
                which: which.to_string(),
                found,
            })
        }
    }
}

/// Append `local` entries to `global`. Objects whose `uuid` is already
/// present in the merged list are skipped; everything else is appended in
/// order.
pub fn merge(global: Value, local: Value) -> AdminResult<Vec<Value>> {
    let mut merged = into_array(global, "global list")?;
    let local = into_array(local, "local list")?;

    for entry in local {
        if let Some(uuid) = identity(&entry) {
            let present = merged.iter().any(|existing| identity(existing) == Some(uuid));
            if present {
                continue;
            }
        }
        merged.push(entry);
    }

    Ok(merged)
}

/// Read a property file, requiring a top-level JSON array.
pub fn load_props(path: &Path) -> AdminResult<Vec<Value>> {
    let raw = std::fs::read(path).map_err(|source| {
        error!("Failed to read properties from [{}]: {}", path.display(), source);
        AdminError::io(path, source)
    })?;

    let value: Value = serde_json::from_slice(&raw).map_err(|e| {
        error!("Failed to read properties from [{}]: {}", path.display(), e);
        AdminError::from(e)
    })?;

    into_array(value, &path.display().to_string())
}

pub fn merge_files(global_path: &Path, local_path: &Path) -> AdminResult<Vec<Value>> {
    let global = load_props(global_path)?;
    let local = load_props(local_path)?;
    merge(Value::Array(global), Value::Array(local))
}
