use crate::config::GatewaySettings;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

/// Test fixture wiring the full router to a mocked identity provider.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///
///     Mock::given(matchers::method("POST"))
///         .and(matchers::path("/realms/test/protocol/openid-connect/token"))
///         .respond_with(ResponseTemplate::new(200).set_body_json(json!({
///             "access_token": "...",
///             "expires_in": 60
///         })))
///         .mount(&fixture.keycloak_mock)
///         .await;
///
///     let response = fixture.get("/me").await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub settings: GatewaySettings,
    /// Mock server standing in for Keycloak
    pub keycloak_mock: MockServer,
    /// Application state backing the router
    pub state: AppState,
}

impl TestFixture {
    pub async fn new() -> Self {
        // Initialize test logger
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();

        let keycloak_mock = MockServer::start().await;
        let settings = GatewaySettings::for_test_with_mocks(&keycloak_mock);

        let state = AppState::new(settings.clone()).expect("Failed to build test state");
        let app = create_app(state.clone()).await;

        Self {
            app,
            settings,
            keycloak_mock,
            state,
        }
    }

    /// Builds a plain GET request for the given URI, for callers that want to
    /// decorate the router before dispatching
    pub fn request(&self, uri: impl AsRef<str>) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri.as_ref())
            .body(Body::empty())
            .expect("Failed to build request")
    }

    /// Sends an anonymous GET request
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        self.send(self.request(uri)).await
    }

    /// Sends a GET request carrying a bearer token
    pub async fn get_with_bearer(&self, uri: impl AsRef<str>, token: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri.as_ref())
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST request carrying a bearer token
    pub async fn post_with_bearer(&self, uri: impl AsRef<str>, token: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri.as_ref())
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Dispatches a request through the fixture's router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        Self::send_to(self.app.clone(), request).await
    }

    /// Dispatches a request through an arbitrary router, e.g. one wrapped in
    /// extra layers for a specific test
    pub async fn send_to(app: Router, request: Request<Body>) -> TestResponse {
        let response = app.oneshot(request).await.expect("Failed to send request");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Parse as JSON, defaulting to an empty object on empty or non-JSON bodies
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse { status, json }
    }
}

/// Response from a test request with convenient access to status and JSON body
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200)
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}

/// Builds an unsigned JWT carrying the given payload, enough for code paths
/// that read claims without verifying signatures
pub fn encode_jwt(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(payload).expect("Failed to serialize JWT payload"),
    );
    format!("{}.{}.signature", header, body)
}
