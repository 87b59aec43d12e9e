use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

/// Decode the payload segment of a JWT into its claims map.
///
/// No signature verification: tokens arrive here either from the provider
/// over a trusted channel or after upstream validation. Anything that isn't
/// a three-segment token with a base64url JSON object payload yields None.
pub fn decode_jwt_claims(token: &str) -> Option<serde_json::Map<String, Value>> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    segments.next()?;

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(payload: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"RS256\",\"typ\":\"JWT\"}");
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn test_decodes_payload_claims() {
        let token = encode(&json!({"sub": "user-1", "preferred_username": "alice"}));
        let claims = decode_jwt_claims(&token).unwrap();
        assert_eq!(claims.get("sub").unwrap(), "user-1");
        assert_eq!(claims.get("preferred_username").unwrap(), "alice");
    }

    #[test]
    fn test_rejects_token_without_three_segments() {
        assert!(decode_jwt_claims("only-one-segment").is_none());
        assert!(decode_jwt_claims("two.segments").is_none());
    }

    #[test]
    fn test_rejects_non_base64_payload() {
        assert!(decode_jwt_claims("a.$$$.c").is_none());
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let body = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
        let token = format!("h.{}.s", body);
        assert!(decode_jwt_claims(&token).is_none());
    }
}
