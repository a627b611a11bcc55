use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::IdentityId;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostAuthor;
use crate::domain::post::models::PostContent;
use crate::domain::post::models::PostId;
use crate::domain::post::ports::PostRepository;

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    author_id: Uuid,
    author_display_name: String,
    author_username: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = PostError;

    fn try_from(r: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: PostId(r.id),
            author_id: IdentityId(r.author_id),
            author: PostAuthor {
                display_name: r.author_display_name,
                username: r.author_username,
            },
            content: PostContent::new(r.content).map_err(|e| {
                tracing::error!(post_id = %r.id, error = %e, "Stored post row is invalid");
                PostError::StoreUnavailable(format!("corrupt post row {}: {}", r.id, e))
            })?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn store_error(e: sqlx::Error) -> PostError {
    match e {
        sqlx::Error::PoolTimedOut => PostError::StoreTimeout,
        other => PostError::StoreUnavailable(other.to_string()),
    }
}

fn into_posts(rows: Vec<PostRow>) -> Result<Vec<Post>, PostError> {
    rows.into_iter().map(Post::try_from).collect()
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, PostError> {
        sqlx::query(
            r#"
            INSERT INTO posts
                (id, author_id, author_display_name, author_username, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.id.0)
        .bind(post.author_id.0)
        .bind(post.author.display_name.as_str())
        .bind(post.author.username.as_str())
        .bind(post.content.as_str())
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(post)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, PostError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, author_display_name, author_username, content, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        into_posts(rows)
    }

    async fn list_by_author(
        &self,
        author_id: &IdentityId,
        limit: usize,
    ) -> Result<Vec<Post>, PostError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, author_display_name, author_username, content, created_at, updated_at
            FROM posts
            WHERE author_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(author_id.0)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        into_posts(rows)
    }
}
