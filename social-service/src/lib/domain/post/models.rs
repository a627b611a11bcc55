use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::errors::PostContentError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;

/// A post on the feed.
///
/// Carries a snapshot of the author's names at posting time so feed reads
/// need no identity lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub author_id: IdentityId,
    pub author: PostAuthor,
    pub content: PostContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAuthor {
    pub display_name: String,
    pub username: String,
}

impl From<&Identity> for PostAuthor {
    fn from(identity: &Identity) -> Self {
        Self {
            display_name: identity.display_name.as_str().to_string(),
            username: identity.username.as_str().to_string(),
        }
    }
}

/// Post body: non-blank, at most 2000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    const MAX_LENGTH: usize = 2000;

    /// # Errors
    /// * `Empty` - Content is empty or whitespace only
    /// * `TooLong` - Content exceeds 2000 characters
    pub fn new(content: String) -> Result<Self, PostContentError> {
        if content.trim().is_empty() {
            return Err(PostContentError::Empty);
        }

        let length = content.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(PostContentError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Number of posts returned by a feed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedLimit(usize);

impl FeedLimit {
    pub const DEFAULT: usize = 20;
    pub const MAX: usize = 100;

    /// Clamp a requested page size into `1..=100`; `None` means 20.
    pub fn new(requested: Option<usize>) -> Self {
        Self(requested.unwrap_or(Self::DEFAULT).clamp(1, Self::MAX))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for FeedLimit {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Command to create a post
#[derive(Debug)]
pub struct CreatePostCommand {
    pub content: PostContent,
}
