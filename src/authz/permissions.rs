use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A single granted permission: a resource and an action on it.
///
/// Immutable value type. Duplicates (same resource and action) are kept as
/// delivered by the provider; callers must tolerate repeats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Permission {
    pub resource: String,
    pub action: String,
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl Permission {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            attributes: HashMap::new(),
        }
    }

    /// Case-insensitive match on resource and action
    pub fn matches(&self, resource: &str, action: &str) -> bool {
        self.resource.eq_ignore_ascii_case(resource) && self.action.eq_ignore_ascii_case(action)
    }

    /// The claim value carried on an enriched identity
    pub fn claim_value(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }
}

/// Parse the UMA `authorization` claim of a decoded RPT into permissions.
///
/// Pure function. The claim is an object carrying a `permissions` array of
/// `{rsname, scopes[]}` entries:
/// - an entry without `rsname` is skipped;
/// - `scopes` absent or empty yields one permission with an empty action;
/// - otherwise one permission per scope string, non-string scope values
///   (e.g. null) are skipped without aborting the entry;
/// - anything that isn't the expected shape yields an empty list, never an
///   error.
pub fn extract(authorization_claim: &Value) -> Vec<Permission> {
    let entries = match authorization_claim
        .get("permissions")
        .and_then(Value::as_array)
    {
        Some(entries) => entries,
        None => return Vec::new(),
    };

    let mut permissions = Vec::new();
    for entry in entries {
        let resource = match entry.get("rsname").and_then(Value::as_str) {
            Some(resource) => resource,
            None => continue,
        };
        match entry.get("scopes").and_then(Value::as_array) {
            Some(scopes) if !scopes.is_empty() => {
                for scope in scopes {
                    if let Some(action) = scope.as_str() {
                        permissions.push(Permission::new(resource, action));
                    }
                }
            }
            _ => permissions.push(Permission::new(resource, "")),
        }
    }
    permissions
}

/// Parse a raw JSON string form of the `authorization` claim.
/// Malformed JSON yields an empty list.
pub fn extract_from_str(raw: &str) -> Vec<Permission> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => extract(&value),
        Err(_) => Vec::new(),
    }
}
