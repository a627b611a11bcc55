use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::domain::post::models::FeedLimit;
use crate::domain::post::models::Post;
use crate::domain::post::ports::PostServicePort;
use crate::inbound::http::middleware::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

/// `?limit=` query, clamped by `FeedLimit`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    limit: Option<usize>,
}

fn to_data(posts: Vec<Post>) -> ApiSuccess<Vec<PostData>> {
    ApiSuccess::new(StatusCode::OK, posts.iter().map(PostData::from).collect())
}

/// Recent posts for a signed-in caller.
pub async fn list_recent(
    State(state): State<AppState>,
    AuthenticatedIdentity(_): AuthenticatedIdentity,
    Query(query): Query<FeedQuery>,
) -> Result<ApiSuccess<Vec<PostData>>, ApiError> {
    state
        .post_service
        .list_recent(FeedLimit::new(query.limit))
        .await
        .map_err(ApiError::from)
        .map(to_data)
}

/// The caller's own posts.
pub async fn list_mine(
    State(state): State<AppState>,
    AuthenticatedIdentity(author_id): AuthenticatedIdentity,
    Query(query): Query<FeedQuery>,
) -> Result<ApiSuccess<Vec<PostData>>, ApiError> {
    state
        .post_service
        .list_by_author(&author_id, FeedLimit::new(query.limit))
        .await
        .map_err(ApiError::from)
        .map(to_data)
}

/// Public feed.
pub async fn feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<ApiSuccess<Vec<PostData>>, ApiError> {
    state
        .post_service
        .list_recent(FeedLimit::new(query.limit))
        .await
        .map_err(ApiError::from)
        .map(to_data)
}
