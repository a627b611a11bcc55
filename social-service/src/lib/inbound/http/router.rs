use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::HeaderValue;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_post::create_post;
use super::handlers::get_profile::get_profile;
use super::handlers::list_posts::feed;
use super::handlers::list_posts::list_mine;
use super::handlers::list_posts::list_recent;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::update_profile::update_profile;
use crate::domain::identity::gate::AuthorizationGate;
use crate::domain::identity::ports::IdentityServicePort;
use crate::domain::post::ports::PostServicePort;

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Clone)]
pub struct AppState {
    pub identity_service: Arc<dyn IdentityServicePort>,
    pub post_service: Arc<dyn PostServicePort>,
    pub gate: Arc<AuthorizationGate>,
}

/// Build the HTTP router.
///
/// Routes whose handlers take `AuthenticatedIdentity` require a bearer token.
/// An empty `cors_allowed_origins` installs a permissive CORS layer.
pub fn create_router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/signup", post(register))
        .route("/api/auth/signin", post(login));

    let profile_routes = Router::new().route("/api/profile", get(get_profile).put(update_profile));

    let post_routes = Router::new()
        .route("/api/posts", post(create_post).get(list_recent))
        .route("/api/posts/user", get(list_mine))
        .route("/api/feed", get(feed));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(auth_routes)
        .merge(profile_routes)
        .merge(post_routes)
        .layer(trace_layer)
        .layer(cors_layer(cors_allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

#[cfg(test)]
mod tests {
    use auth::Authenticator;
    use auth::HashCost;
    use auth::PasswordHasher;
    use auth::TokenService;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::identity::service::IdentityService;
    use crate::domain::post::service::PostService;
    use crate::outbound::repositories::InMemoryIdentityRepository;
    use crate::outbound::repositories::InMemoryPostRepository;

    fn state() -> AppState {
        let hasher = PasswordHasher::with_cost(HashCost {
            iterations: Some(1),
            memory_kib: Some(1024),
        })
        .unwrap();
        let authenticator = Arc::new(Authenticator::from_parts(
            hasher,
            TokenService::new(b"router-test-secret-at-least-32-bytes"),
        ));
        let timeout = Duration::from_secs(5);
        let identities = Arc::new(InMemoryIdentityRepository::new());

        AppState {
            identity_service: Arc::new(IdentityService::new(
                Arc::clone(&identities),
                Arc::clone(&authenticator),
                timeout,
            )),
            post_service: Arc::new(PostService::new(
                Arc::new(InMemoryPostRepository::new()),
                identities,
                timeout,
            )),
            gate: Arc::new(AuthorizationGate::new(authenticator)),
        }
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let router = create_router(state(), &[]);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_feed_without_token() {
        let router = create_router(state(), &[]);

        let response = router
            .oneshot(Request::builder().uri("/api/feed").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight_for_configured_origin() {
        let router = create_router(state(), &["http://localhost:3000".to_string()]);

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/posts")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-credentials")
                .unwrap(),
            "true"
        );
    }
}
