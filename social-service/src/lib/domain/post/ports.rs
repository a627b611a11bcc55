use async_trait::async_trait;

use super::errors::PostError;
use super::models::CreatePostCommand;
use super::models::FeedLimit;
use super::models::Post;
use crate::domain::identity::models::IdentityId;

/// Port for post domain service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Publish a post for an authorized identity.
    ///
    /// # Errors
    /// * `AuthorNotFound` - The identity no longer exists
    /// * `StoreTimeout` / `StoreUnavailable` - Store call failed
    async fn create_post(
        &self,
        author_id: &IdentityId,
        command: CreatePostCommand,
    ) -> Result<Post, PostError>;

    /// Most recent posts from everyone, newest first.
    async fn list_recent(&self, limit: FeedLimit) -> Result<Vec<Post>, PostError>;

    /// Most recent posts by one author, newest first.
    async fn list_by_author(
        &self,
        author_id: &IdentityId,
        limit: FeedLimit,
    ) -> Result<Vec<Post>, PostError>;
}

/// Persistence operations for posts.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    async fn insert(&self, post: Post) -> Result<Post, PostError>;

    /// Newest first, at most `limit` rows.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, PostError>;

    /// Newest first, at most `limit` rows.
    async fn list_by_author(
        &self,
        author_id: &IdentityId,
        limit: usize,
    ) -> Result<Vec<Post>, PostError>;
}
