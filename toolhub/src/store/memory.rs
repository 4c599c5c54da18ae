// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::RelationalStore;
use super::types::{
    Comment, Like, NewComment, NewReview, NewSave, NewsletterSubscription, Review, Save,
    StoreError, StoreResult, new_id,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tables {
    likes: Vec<Like>,
    saves: Vec<Save>,
    comments: Vec<Comment>,
    reviews: Vec<Review>,
    newsletter: Vec<NewsletterSubscription>,
}

/// Process-local store used when no database is configured, and by tests.
/// Rows are kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Connection("memory store lock poisoned".to_string()))
    }

    pub fn likes(&self) -> StoreResult<Vec<Like>> {
        Ok(self.tables()?.likes.clone())
    }

    pub fn saves(&self) -> StoreResult<Vec<Save>> {
        Ok(self.tables()?.saves.clone())
    }

    pub fn comments(&self) -> StoreResult<Vec<Comment>> {
        Ok(self.tables()?.comments.clone())
    }

    pub fn reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.tables()?.reviews.clone())
    }

    pub fn subscriptions(&self) -> StoreResult<Vec<NewsletterSubscription>> {
        Ok(self.tables()?.newsletter.clone())
    }
}

#[async_trait]
impl RelationalStore for MemoryStore {
    async fn insert_like(&self, user_id: &str, post_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        if tables
            .likes
            .iter()
            .any(|like| like.user_id == user_id && like.post_id == post_id)
        {
            return Ok(false);
        }
        tables.likes.push(Like {
            id: new_id(),
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn delete_like(&self, user_id: &str, post_id: &str) -> StoreResult<u64> {
        let mut tables = self.tables()?;
        let before = tables.likes.len();
        tables
            .likes
            .retain(|like| !(like.user_id == user_id && like.post_id == post_id));
        Ok((before - tables.likes.len()) as u64)
    }

    async fn has_like(&self, user_id: &str, post_id: &str) -> StoreResult<bool> {
        Ok(self
            .tables()?
            .likes
            .iter()
            .any(|like| like.user_id == user_id && like.post_id == post_id))
    }

    async fn count_likes(&self, post_id: &str) -> StoreResult<u64> {
        Ok(self
            .tables()?
            .likes
            .iter()
            .filter(|like| like.post_id == post_id)
            .count() as u64)
    }

    async fn insert_save(&self, save: &NewSave) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        if tables
            .saves
            .iter()
            .any(|row| row.user_id == save.user_id && row.post_id == save.post_id)
        {
            return Ok(false);
        }
        tables.saves.push(Save {
            id: new_id(),
            user_id: save.user_id.clone(),
            post_id: save.post_id.clone(),
            post_title: save.post_title.clone(),
            post_slug: save.post_slug.clone(),
            saved_at: Utc::now(),
        });
        Ok(true)
    }

    async fn delete_save(&self, user_id: &str, post_id: &str) -> StoreResult<u64> {
        let mut tables = self.tables()?;
        let before = tables.saves.len();
        tables
            .saves
            .retain(|row| !(row.user_id == user_id && row.post_id == post_id));
        Ok((before - tables.saves.len()) as u64)
    }

    async fn has_save(&self, user_id: &str, post_id: &str) -> StoreResult<bool> {
        Ok(self
            .tables()?
            .saves
            .iter()
            .any(|row| row.user_id == user_id && row.post_id == post_id))
    }

    async fn list_saves(&self, user_id: &str) -> StoreResult<Vec<Save>> {
        Ok(self
            .tables()?
            .saves
            .iter()
            .rev()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_comment(&self, comment_id: &str, post_id: &str) -> StoreResult<Option<Comment>> {
        Ok(self
            .tables()?
            .comments
            .iter()
            .find(|comment| comment.id == comment_id && comment.post_id == post_id)
            .cloned())
    }

    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        let row = Comment {
            id: new_id(),
            user_id: comment.user_id.clone(),
            user_full_name: comment.user_full_name.clone(),
            post_id: comment.post_id.clone(),
            parent_comment_id: comment.parent_comment_id.clone(),
            content: comment.content.clone(),
            created_at: Utc::now(),
        };
        self.tables()?.comments.push(row.clone());
        Ok(row)
    }

    async fn list_comments(&self, post_id: &str) -> StoreResult<Vec<Comment>> {
        Ok(self
            .tables()?
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn insert_review(&self, review: &NewReview) -> StoreResult<Review> {
        let row = Review {
            id: new_id(),
            user_id: review.user_id.clone(),
            user_full_name: review.user_full_name.clone(),
            tool_id: review.tool_id.clone(),
            title: review.title.clone(),
            content: review.content.clone(),
            created_at: Utc::now(),
        };
        self.tables()?.reviews.push(row.clone());
        Ok(row)
    }

    async fn list_reviews(&self, tool_id: &str) -> StoreResult<Vec<Review>> {
        Ok(self
            .tables()?
            .reviews
            .iter()
            .rev()
            .filter(|review| review.tool_id == tool_id)
            .cloned()
            .collect())
    }

    async fn subscribe_newsletter(&self, email: &str) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        if tables.newsletter.iter().any(|row| row.email == email) {
            return Ok(false);
        }
        tables.newsletter.push(NewsletterSubscription {
            id: new_id(),
            email: email.to_string(),
            subscribed: true,
            subscribed_at: Utc::now(),
            unsubscribed_at: None,
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_comment(post_id: &str, parent: Option<&str>, content: &str) -> NewComment {
        NewComment {
            user_id: "u1".to_string(),
            user_full_name: "Ada Lovelace".to_string(),
            post_id: post_id.to_string(),
            parent_comment_id: parent.map(str::to_string),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn like_is_unique_per_user_and_post() {
        let store = MemoryStore::new();
        assert!(store.insert_like("u1", "p1").await.unwrap());
        assert!(!store.insert_like("u1", "p1").await.unwrap());
        assert!(store.insert_like("u2", "p1").await.unwrap());
        assert_eq!(store.count_likes("p1").await.unwrap(), 2);
        assert!(store.has_like("u1", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn deleting_missing_like_is_a_no_op() {
        let store = MemoryStore::new();
        assert_eq!(store.delete_like("u1", "p1").await.unwrap(), 0);
        store.insert_like("u1", "p1").await.unwrap();
        assert_eq!(store.delete_like("u1", "p1").await.unwrap(), 1);
        assert!(!store.has_like("u1", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn saves_list_newest_first() {
        let store = MemoryStore::new();
        for (post, title) in [("p1", "First"), ("p2", "Second")] {
            store
                .insert_save(&NewSave {
                    user_id: "u1".to_string(),
                    post_id: post.to_string(),
                    post_title: title.to_string(),
                    post_slug: title.to_lowercase(),
                })
                .await
                .unwrap();
        }
        let saves = store.list_saves("u1").await.unwrap();
        let titles: Vec<&str> = saves.iter().map(|save| save.post_title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn find_comment_requires_matching_post() {
        let store = MemoryStore::new();
        let parent = store
            .insert_comment(&new_comment("p1", None, "top level"))
            .await
            .unwrap();
        assert!(store.find_comment(&parent.id, "p1").await.unwrap().is_some());
        assert!(store.find_comment(&parent.id, "p2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn comments_list_oldest_first() {
        let store = MemoryStore::new();
        let parent = store
            .insert_comment(&new_comment("p1", None, "first"))
            .await
            .unwrap();
        store
            .insert_comment(&new_comment("p1", Some(&parent.id), "second"))
            .await
            .unwrap();
        store
            .insert_comment(&new_comment("p2", None, "elsewhere"))
            .await
            .unwrap();
        let comments = store.list_comments("p1").await.unwrap();
        let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(comments[1].parent_comment_id.as_deref(), Some(parent.id.as_str()));
    }

    #[tokio::test]
    async fn newsletter_subscribe_is_idempotent() {
        let store = MemoryStore::new();
        assert!(store.subscribe_newsletter("ada@example.com").await.unwrap());
        assert!(!store.subscribe_newsletter("ada@example.com").await.unwrap());
        let rows = store.subscriptions().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].subscribed);
        assert!(rows[0].unsubscribed_at.is_none());
    }
}
