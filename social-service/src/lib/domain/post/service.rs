use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::PostError;
use super::models::CreatePostCommand;
use super::models::FeedLimit;
use super::models::Post;
use super::models::PostAuthor;
use super::models::PostId;
use super::ports::PostRepository;
use super::ports::PostServicePort;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::IdentityRepository;
use crate::domain::store::bounded;

/// Domain service implementation for post operations.
pub struct PostService<PR, IR>
where
    PR: PostRepository,
    IR: IdentityRepository,
{
    posts: Arc<PR>,
    identities: Arc<IR>,
    store_timeout: Duration,
}

impl<PR, IR> PostService<PR, IR>
where
    PR: PostRepository,
    IR: IdentityRepository,
{
    pub fn new(posts: Arc<PR>, identities: Arc<IR>, store_timeout: Duration) -> Self {
        Self {
            posts,
            identities,
            store_timeout,
        }
    }
}

#[async_trait]
impl<PR, IR> PostServicePort for PostService<PR, IR>
where
    PR: PostRepository,
    IR: IdentityRepository,
{
    async fn create_post(
        &self,
        author_id: &IdentityId,
        command: CreatePostCommand,
    ) -> Result<Post, PostError> {
        let author = bounded(self.store_timeout, self.identities.find_by_id(author_id))
            .await?
            .ok_or_else(|| PostError::AuthorNotFound(author_id.to_string()))?;

        let now = Utc::now();
        let post = Post {
            id: PostId::new(),
            author_id: author.id,
            author: PostAuthor::from(&author),
            content: command.content,
            created_at: now,
            updated_at: now,
        };

        let created = bounded(self.store_timeout, self.posts.insert(post)).await?;
        tracing::info!(post_id = %created.id, author_id = %created.author_id, "Post created");

        Ok(created)
    }

    async fn list_recent(&self, limit: FeedLimit) -> Result<Vec<Post>, PostError> {
        bounded(self.store_timeout, self.posts.list_recent(limit.get())).await
    }

    async fn list_by_author(
        &self,
        author_id: &IdentityId,
        limit: FeedLimit,
    ) -> Result<Vec<Post>, PostError> {
        bounded(
            self.store_timeout,
            self.posts.list_by_author(author_id, limit.get()),
        )
        .await
    }
}
