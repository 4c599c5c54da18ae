// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Headless CMS access: posts, tags, authors and tools live in an external
//! GraphQL document graph.

mod client;
mod hygraph;
pub mod queries;
mod types;

pub use client::{Access, GraphClient, GraphError, GraphQlError, GraphResult, HttpGraphClient};
pub use hygraph::HygraphCms;
pub use types::{
    Asset, AuthorNode, AuthorProfile, AuthorWithPosts, NamedRef, NewAuthor, NewTag, PostDetail,
    PostDraft, PostNode, PostSummary, PostUpdate, StageRef, TagNode, TagWithPosts, Tool, ToolsOverview,
};

use async_trait::async_trait;

/// Typed operations against the document graph.
#[async_trait]
pub trait CmsApi: Send + Sync {
    async fn find_author_by_email(&self, email: &str) -> GraphResult<Option<AuthorNode>>;
    async fn create_author(&self, author: &NewAuthor) -> GraphResult<AuthorNode>;
    async fn publish_author(&self, id: &str) -> GraphResult<()>;

    /// Draft stage, so unpublished tags are included.
    async fn find_tags_by_names(&self, names: &[String]) -> GraphResult<Vec<TagNode>>;
    async fn find_tag_by_slug(&self, slug: &str) -> GraphResult<Option<TagNode>>;
    async fn create_tag(&self, tag: &NewTag) -> GraphResult<TagNode>;
    async fn publish_tag(&self, id: &str) -> GraphResult<()>;

    /// Draft stage lookup used by the write paths.
    async fn find_post_by_slug(&self, slug: &str) -> GraphResult<Option<PostNode>>;
    async fn create_post(&self, draft: &PostDraft) -> GraphResult<PostNode>;
    async fn update_post(&self, update: &PostUpdate) -> GraphResult<PostNode>;
    async fn publish_post(&self, id: &str) -> GraphResult<()>;
    async fn unpublish_post(&self, id: &str) -> GraphResult<()>;
    async fn delete_post(&self, id: &str) -> GraphResult<()>;

    async fn list_posts(&self) -> GraphResult<Vec<PostSummary>>;
    async fn get_post(&self, slug: &str) -> GraphResult<Option<PostDetail>>;
    async fn tag_with_posts(&self, slug: &str) -> GraphResult<Option<TagWithPosts>>;
    async fn author_with_posts(&self, slug: &str) -> GraphResult<Option<AuthorWithPosts>>;
    async fn author_profile(&self, email: &str) -> GraphResult<Option<AuthorProfile>>;
    async fn tools_overview(&self) -> GraphResult<ToolsOverview>;
    async fn get_tool(&self, slug: &str) -> GraphResult<Option<Tool>>;
}
