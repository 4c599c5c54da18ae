// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Relational rows owned by this application: likes, saves, comments, reviews and
//! newsletter subscriptions.

mod memory;
mod postgres;
mod types;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use types::{
    Comment, Like, NewComment, NewReview, NewSave, NewsletterSubscription, Review, Save,
    StoreError, StoreResult,
};

use async_trait::async_trait;

#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Conflict-tolerant: returns `false` when the user already liked the post.
    async fn insert_like(&self, user_id: &str, post_id: &str) -> StoreResult<bool>;
    async fn delete_like(&self, user_id: &str, post_id: &str) -> StoreResult<u64>;
    async fn has_like(&self, user_id: &str, post_id: &str) -> StoreResult<bool>;
    async fn count_likes(&self, post_id: &str) -> StoreResult<u64>;

    /// Conflict-tolerant: returns `false` when the post is already saved.
    async fn insert_save(&self, save: &NewSave) -> StoreResult<bool>;
    async fn delete_save(&self, user_id: &str, post_id: &str) -> StoreResult<u64>;
    async fn has_save(&self, user_id: &str, post_id: &str) -> StoreResult<bool>;
    /// Newest first.
    async fn list_saves(&self, user_id: &str) -> StoreResult<Vec<Save>>;

    /// A comment with this id that belongs to `post_id`.
    async fn find_comment(&self, comment_id: &str, post_id: &str) -> StoreResult<Option<Comment>>;
    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<Comment>;
    /// Oldest first, replies included.
    async fn list_comments(&self, post_id: &str) -> StoreResult<Vec<Comment>>;

    async fn insert_review(&self, review: &NewReview) -> StoreResult<Review>;
    /// Newest first.
    async fn list_reviews(&self, tool_id: &str) -> StoreResult<Vec<Review>>;

    /// Conflict-tolerant: returns `false` when the email is already subscribed.
    async fn subscribe_newsletter(&self, email: &str) -> StoreResult<bool>;
}
