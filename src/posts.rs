//! Per-user post storage.
//!
//! Posts live as a JSON array under `posts_<username>`, newest first.
//! The array is read-modify-written whole, matching the store's
//! value-replacement semantics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::session::store::{SessionStore, keys};

/// A short text update on a user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Post CRUD over the session store.
pub struct PostStore {
    store: Arc<dyn SessionStore>,
}

impl PostStore {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// List a user's posts, newest first.
    pub async fn list(&self, username: &str) -> Result<Vec<Post>, StoreError> {
        match self.store.get(&keys::posts(username)).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    /// Prepend a new post and persist the whole list.
    pub async fn add(&self, username: &str, text: &str) -> Result<Post, StoreError> {
        let post = Post::new(text);
        let mut posts = self.list(username).await?;
        posts.insert(0, post.clone());
        self.save(username, &posts).await?;
        Ok(post)
    }

    /// Delete a post by id. Returns whether it existed.
    pub async fn delete(&self, username: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut posts = self.list(username).await?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Ok(false);
        }
        self.save(username, &posts).await?;
        Ok(true)
    }

    async fn save(&self, username: &str, posts: &[Post]) -> Result<(), StoreError> {
        let value = serde_json::to_value(posts)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(&keys::posts(username), &value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[tokio::test]
    async fn add_list_delete() {
        let posts = PostStore::new(Arc::new(MemoryStore::new()));
        assert!(posts.list("sarahj").await.unwrap().is_empty());

        let first = posts.add("sarahj", "hello world").await.unwrap();
        let second = posts.add("sarahj", "second update").await.unwrap();

        let listed = posts.list("sarahj").await.unwrap();
        assert_eq!(listed.len(), 2);
        // Newest first
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].text, "hello world");

        assert!(posts.delete("sarahj", first.id).await.unwrap());
        assert!(!posts.delete("sarahj", first.id).await.unwrap());
        assert_eq!(posts.list("sarahj").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn posts_are_scoped_per_username() {
        let posts = PostStore::new(Arc::new(MemoryStore::new()));
        posts.add("sarahj", "mine").await.unwrap();
        assert!(posts.list("mchen").await.unwrap().is_empty());
    }
}
