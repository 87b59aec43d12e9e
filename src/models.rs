use crate::authz::permissions::Permission;
use serde::Serialize;
use serde_json::Value;

/// Bearer access token for the current request, kept alongside the identity
/// so downstream layers can call the provider on the user's behalf
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

/// The authenticated identity for one request, built fresh from the access
/// token's claims and enriched with permissions before authorization runs.
/// Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct UserContext {
    pub user_id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<Permission>,
    /// `resource:action` claim values appended by enrichment
    pub permission_claims: Vec<String>,
    pub claims: serde_json::Map<String, Value>,
}

impl UserContext {
    /// Build an identity from decoded access token claims.
    /// Requires a `sub` claim; everything else is optional.
    pub fn from_claims(claims: serde_json::Map<String, Value>) -> Option<Self> {
        let user_id = claims.get("sub")?.as_str()?.to_string();
        let username = string_claim(&claims, "preferred_username");
        let email = string_claim(&claims, "email");
        let name = string_claim(&claims, "name");
        let roles = claims
            .get("realm_access")
            .and_then(|v| v.get("roles"))
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            user_id,
            username,
            email,
            name,
            roles,
            permissions: Vec::new(),
            permission_claims: Vec::new(),
            claims,
        })
    }

    /// Whether the identity holds a permission claim, compared
    /// case-insensitively on the full `resource:action` value
    pub fn holds_permission(&self, required: &str) -> bool {
        self.permission_claims
            .iter()
            .any(|held| held.eq_ignore_ascii_case(required))
    }
}

fn string_claim(claims: &serde_json::Map<String, Value>, name: &str) -> Option<String> {
    claims.get(name).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_claims_full() {
        let user = UserContext::from_claims(claims(json!({
            "sub": "user-1",
            "preferred_username": "alice",
            "email": "alice@example.com",
            "name": "Alice Example",
            "realm_access": {"roles": ["admin", "user"]}
        })))
        .unwrap();

        assert_eq!(user.user_id, "user-1");
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
        assert_eq!(user.roles, vec!["admin", "user"]);
        assert!(user.permissions.is_empty());
    }

    #[test]
    fn test_from_claims_requires_sub() {
        assert!(UserContext::from_claims(claims(json!({"preferred_username": "alice"}))).is_none());
    }

    #[test]
    fn test_holds_permission_case_insensitive() {
        let mut user = UserContext::from_claims(claims(json!({"sub": "u"}))).unwrap();
        user.permission_claims.push("doc:read".to_string());
        assert!(user.holds_permission("DOC:READ"));
        assert!(!user.holds_permission("doc:write"));
    }
}
