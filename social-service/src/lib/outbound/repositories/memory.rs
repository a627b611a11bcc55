use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::errors::DuplicateField;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::Post;
use crate::domain::post::ports::PostRepository;

/// Process-local identity store.
///
/// Uniqueness is checked and the row written under one write lock, which
/// gives the same guarantee as the Postgres unique constraints.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<IdentityId, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn collides(existing: &Identity, candidate: &Identity) -> bool {
    existing.id != candidate.id
        && (existing.email == candidate.email || existing.username == candidate.username)
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn insert(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.write().await;

        if identities.contains_key(&identity.id)
            || identities.values().any(|existing| collides(existing, &identity))
        {
            return Err(IdentityError::duplicate(DuplicateField::EmailOrUsername));
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        Ok(self.identities.read().await.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityError> {
        let identities = self.identities.read().await;
        Ok(identities.values().find(|i| &i.email == email).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError> {
        let identities = self.identities.read().await;
        Ok(identities.values().find(|i| &i.username == username).cloned())
    }

    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.write().await;

        if !identities.contains_key(&identity.id) {
            return Err(IdentityError::NotFound(identity.id.to_string()));
        }
        if identities.values().any(|existing| collides(existing, &identity)) {
            return Err(IdentityError::duplicate(DuplicateField::EmailOrUsername));
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }
}

/// Process-local post store, kept in insertion order.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<'a>(posts: impl Iterator<Item = &'a Post>, limit: usize) -> Vec<Post> {
    let mut selected: Vec<Post> = posts.cloned().collect();
    // Equal timestamps: later insert first.
    selected.reverse();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected.truncate(limit);
    selected
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, PostError> {
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, PostError> {
        let posts = self.posts.read().await;
        Ok(newest_first(posts.iter(), limit))
    }

    async fn list_by_author(
        &self,
        author_id: &IdentityId,
        limit: usize,
    ) -> Result<Vec<Post>, PostError> {
        let posts = self.posts.read().await;
        Ok(newest_first(
            posts.iter().filter(|p| &p.author_id == author_id),
            limit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;

    use super::*;
    use crate::domain::identity::models::CredentialHash;
    use crate::domain::identity::models::DisplayName;
    use crate::domain::post::models::PostAuthor;
    use crate::domain::post::models::PostContent;
    use crate::domain::post::models::PostId;

    fn identity(username: &str, email: &str) -> Identity {
        let now = Utc::now();
        Identity {
            id: IdentityId::new(),
            display_name: DisplayName::new("Someone".to_string()).unwrap(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            credential_hash: CredentialHash::new("$argon2id$stub".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn post(author: &Identity, content: &str, minutes_ago: i64) -> Post {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        Post {
            id: PostId::new(),
            author_id: author.id,
            author: PostAuthor::from(author),
            content: PostContent::new(content.to_string()).unwrap(),
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repository = InMemoryIdentityRepository::new();
        let jane = repository
            .insert(identity("janed", "jane@x.com"))
            .await
            .unwrap();

        let by_id = repository.find_by_id(&jane.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, jane.username);

        let by_email = repository
            .find_by_email(&EmailAddress::new("jane@x.com".to_string()).unwrap())
            .await
            .unwrap();
        assert!(by_email.is_some());

        let by_username = repository
            .find_by_username(&Username::new("nobody".to_string()).unwrap())
            .await
            .unwrap();
        assert!(by_username.is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email_or_username() {
        let repository = InMemoryIdentityRepository::new();
        repository
            .insert(identity("janed", "jane@x.com"))
            .await
            .unwrap();

        for candidate in [identity("other", "jane@x.com"), identity("janed", "other@x.com")] {
            match repository.insert(candidate).await {
                Err(IdentityError::Duplicate { field }) => {
                    assert_eq!(field, DuplicateField::EmailOrUsername)
                }
                other => panic!("Expected Duplicate, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_update_allows_own_values_and_rejects_others() {
        let repository = InMemoryIdentityRepository::new();
        let jane = repository
            .insert(identity("janed", "jane@x.com"))
            .await
            .unwrap();
        repository
            .insert(identity("johnd", "john@x.com"))
            .await
            .unwrap();

        let mut renamed = jane.clone();
        renamed.display_name = DisplayName::new("Jane D".to_string()).unwrap();
        let updated = repository.update(renamed).await.unwrap();
        assert_eq!(updated.display_name.as_str(), "Jane D");

        let mut clash = jane.clone();
        clash.username = Username::new("johnd".to_string()).unwrap();
        assert!(matches!(
            repository.update(clash).await,
            Err(IdentityError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_identity() {
        let repository = InMemoryIdentityRepository::new();
        let result = repository.update(identity("ghost", "ghost@x.com")).await;
        assert!(matches!(result, Err(IdentityError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_posts_newest_first_with_limit() {
        let repository = InMemoryPostRepository::new();
        let jane = identity("janed", "jane@x.com");
        let john = identity("johnd", "john@x.com");

        repository.insert(post(&jane, "oldest", 30)).await.unwrap();
        repository.insert(post(&john, "middle", 20)).await.unwrap();
        repository.insert(post(&jane, "newest", 10)).await.unwrap();

        let recent = repository.list_recent(2).await.unwrap();
        let contents: Vec<&str> = recent.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["newest", "middle"]);

        let by_jane = repository.list_by_author(&jane.id, 10).await.unwrap();
        let contents: Vec<&str> = by_jane.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["newest", "oldest"]);
    }
}
