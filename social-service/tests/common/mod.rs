use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::HashCost;
use auth::PasswordHasher;
use auth::TokenService;
use serde_json::json;
use serde_json::Value;
use social_service::domain::identity::gate::AuthorizationGate;
use social_service::domain::identity::service::IdentityService;
use social_service::domain::post::service::PostService;
use social_service::inbound::http::router::create_router;
use social_service::inbound::http::router::AppState;
use social_service::outbound::repositories::InMemoryIdentityRepository;
use social_service::outbound::repositories::InMemoryPostRepository;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Argon2 at the smallest cost keeps the suite fast.
pub fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::with_cost(HashCost {
        iterations: Some(1),
        memory_kib: Some(1024),
    })
    .expect("Failed to build password hasher")
}

pub fn test_authenticator() -> Arc<Authenticator> {
    Arc::new(Authenticator::from_parts(
        cheap_hasher(),
        TokenService::new(TEST_SECRET),
    ))
}

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = test_authenticator();
        let store_timeout = Duration::from_secs(5);
        let identities = Arc::new(InMemoryIdentityRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());

        let state = AppState {
            identity_service: Arc::new(IdentityService::new(
                Arc::clone(&identities),
                Arc::clone(&authenticator),
                store_timeout,
            )),
            post_service: Arc::new(PostService::new(posts, identities, store_timeout)),
            gate: Arc::new(AuthorizationGate::new(authenticator)),
        };

        let router = create_router(state, &[]);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Sign up and return the `(status, body)` pair.
    pub async fn signup(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> (reqwest::StatusCode, Value) {
        let response = self
            .post("/api/auth/signup")
            .json(&json!({
                "name": name,
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");

        let status = response.status();
        (status, response.json().await.expect("Failed to parse body"))
    }

    /// Sign in and return the `(status, body)` pair.
    pub async fn signin(&self, email: &str, password: &str) -> (reqwest::StatusCode, Value) {
        let response = self
            .post("/api/auth/signin")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        let status = response.status();
        (status, response.json().await.expect("Failed to parse body"))
    }

    /// Register Jane Doe and return her token.
    pub async fn signup_jane(&self) -> String {
        let (status, body) = self
            .signup("Jane Doe", "janed", "jane@x.com", "secret1")
            .await;
        assert_eq!(status, 201, "signup failed: {}", body);
        token_of(&body)
    }
}

pub fn token_of(body: &Value) -> String {
    body["data"]["token"]
        .as_str()
        .expect("Missing token")
        .to_string()
}
