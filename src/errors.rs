use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::json;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub detail: String,
    pub status_code: StatusCode,
    /// Permissions the identity lacked, attached to 403 responses for
    /// diagnostics
    pub missing_permissions: Vec<String>,
}

impl ApiError {
    /// Create a new ApiError with a detail message and status code
    pub fn new<S: ToString>(detail: S, status_code: StatusCode) -> Self {
        Self {
            detail: detail.to_string(),
            status_code,
            missing_permissions: Vec::new(),
        }
    }

    /// Create new Internal Server Error (500) with a detail message
    pub fn internal<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Create new Unauthorized (401) with a detail message
    pub fn unauthorized<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::UNAUTHORIZED)
    }

    /// Create new Forbidden (403) naming the permissions the identity lacked
    pub fn forbidden_missing_permissions(missing: Vec<String>) -> Self {
        Self {
            detail: format!("missing required permission(s): {}", missing.join(", ")),
            status_code: StatusCode::FORBIDDEN,
            missing_permissions: missing,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = if self.missing_permissions.is_empty() {
            json!({
                "detail": self.detail,
            })
        } else {
            json!({
                "detail": self.detail,
                "missing_permissions": self.missing_permissions,
            })
        };
        (status_code, Json(body)).into_response()
    }
}
