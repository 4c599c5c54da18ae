// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::CmsApi;
use super::client::{Access, GraphClient, GraphError, GraphResult};
use super::queries;
use super::types::{
    AuthorNode, AuthorProfile, AuthorWithPosts, NewAuthor, NewTag, PostDetail, PostDraft,
    PostNode, PostSummary, PostUpdate, TagNode, TagWithPosts, Tool, ToolsOverview,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

/// [`CmsApi`] for a Hygraph content API.
pub struct HygraphCms {
    client: Arc<dyn GraphClient>,
}

impl HygraphCms {
    pub fn new(client: Arc<dyn GraphClient>) -> Self {
        Self { client }
    }

    async fn field<T: DeserializeOwned + Send>(
        &self,
        query: &'static str,
        variables: Value,
        access: Access,
        key: &str,
    ) -> GraphResult<T> {
        let data = self.client.execute(query, variables, access).await?;
        take_field(data, key)
    }

    /// Mutations answer `null` when the target does not exist.
    async fn node<T: DeserializeOwned + Send>(
        &self,
        query: &'static str,
        variables: Value,
        key: &str,
    ) -> GraphResult<T> {
        self.field::<Option<T>>(query, variables, Access::Authorized, key)
            .await?
            .ok_or_else(|| GraphError::Decode(format!("{} returned no node", key)))
    }

    async fn acknowledge(&self, query: &'static str, id: &str, key: &str) -> GraphResult<()> {
        self.node::<Value>(query, json!({ "id": id }), key)
            .await
            .map(|_| ())
    }
}

fn take_field<T: DeserializeOwned>(mut data: Value, key: &str) -> GraphResult<T> {
    let value = data.get_mut(key).map(Value::take).unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|err| GraphError::Decode(format!("{}: {}", key, err)))
}

fn id_list(ids: &[String]) -> Value {
    if ids.is_empty() {
        return Value::Null;
    }
    Value::Array(ids.iter().map(|id| json!({ "id": id })).collect())
}

fn connect_list(ids: &[String]) -> Value {
    if ids.is_empty() {
        return Value::Null;
    }
    Value::Array(
        ids.iter()
            .map(|id| json!({ "where": { "id": id } }))
            .collect(),
    )
}

#[async_trait]
impl CmsApi for HygraphCms {
    async fn find_author_by_email(&self, email: &str) -> GraphResult<Option<AuthorNode>> {
        self.field(
            queries::AUTHOR_BY_EMAIL,
            json!({ "email": email }),
            Access::Authorized,
            "author",
        )
        .await
    }

    async fn create_author(&self, author: &NewAuthor) -> GraphResult<AuthorNode> {
        self.node(
            queries::CREATE_AUTHOR,
            json!({
                "name": author.name,
                "slug": author.slug,
                "email": author.email,
                "title": author.title,
                "bio": author.bio,
                "website": author.website,
                "instagram": author.instagram,
                "facebook": author.facebook,
                "linkedin": author.linkedin,
            }),
            "createAuthor",
        )
        .await
    }

    async fn publish_author(&self, id: &str) -> GraphResult<()> {
        self.acknowledge(queries::PUBLISH_AUTHOR, id, "publishAuthor")
            .await
    }

    async fn find_tags_by_names(&self, names: &[String]) -> GraphResult<Vec<TagNode>> {
        self.field::<Option<Vec<TagNode>>>(
            queries::TAGS_BY_NAMES,
            json!({ "names": names }),
            Access::Authorized,
            "tags",
        )
        .await
        .map(Option::unwrap_or_default)
    }

    async fn find_tag_by_slug(&self, slug: &str) -> GraphResult<Option<TagNode>> {
        self.field(
            queries::TAG_BY_SLUG,
            json!({ "slug": slug }),
            Access::Authorized,
            "tag",
        )
        .await
    }

    async fn create_tag(&self, tag: &NewTag) -> GraphResult<TagNode> {
        self.node(
            queries::CREATE_TAG,
            json!({ "name": tag.name, "slug": tag.slug }),
            "createTag",
        )
        .await
    }

    async fn publish_tag(&self, id: &str) -> GraphResult<()> {
        self.acknowledge(queries::PUBLISH_TAG, id, "publishTag").await
    }

    async fn find_post_by_slug(&self, slug: &str) -> GraphResult<Option<PostNode>> {
        self.field(
            queries::POST_BY_SLUG,
            json!({ "slug": slug }),
            Access::Authorized,
            "post",
        )
        .await
    }

    async fn create_post(&self, draft: &PostDraft) -> GraphResult<PostNode> {
        self.node(
            queries::CREATE_POST,
            json!({
                "title": draft.title,
                "slug": draft.slug,
                "content": draft.content,
                "date": draft.date,
                "authorId": draft.author_id,
                "tags": id_list(&draft.tag_ids),
            }),
            "createPost",
        )
        .await
    }

    async fn update_post(&self, update: &PostUpdate) -> GraphResult<PostNode> {
        self.node(
            queries::UPDATE_POST,
            json!({
                "id": update.id,
                "title": update.title,
                "slug": update.slug,
                "content": update.content,
                "authorId": update.author_id,
                "connect": connect_list(&update.connect),
                "disconnect": id_list(&update.disconnect),
            }),
            "updatePost",
        )
        .await
    }

    async fn publish_post(&self, id: &str) -> GraphResult<()> {
        self.acknowledge(queries::PUBLISH_POST, id, "publishPost")
            .await
    }

    async fn unpublish_post(&self, id: &str) -> GraphResult<()> {
        self.acknowledge(queries::UNPUBLISH_POST, id, "unpublishPost")
            .await
    }

    async fn delete_post(&self, id: &str) -> GraphResult<()> {
        self.acknowledge(queries::DELETE_POST, id, "deletePost")
            .await
    }

    async fn list_posts(&self) -> GraphResult<Vec<PostSummary>> {
        self.field::<Option<Vec<PostSummary>>>(
            queries::LIST_POSTS,
            json!({}),
            Access::Public,
            "posts",
        )
        .await
        .map(Option::unwrap_or_default)
    }

    async fn get_post(&self, slug: &str) -> GraphResult<Option<PostDetail>> {
        self.field(
            queries::POST_DETAIL,
            json!({ "slug": slug }),
            Access::Public,
            "post",
        )
        .await
    }

    async fn tag_with_posts(&self, slug: &str) -> GraphResult<Option<TagWithPosts>> {
        self.field(
            queries::TAG_WITH_POSTS,
            json!({ "slug": slug }),
            Access::Public,
            "tag",
        )
        .await
    }

    async fn author_with_posts(&self, slug: &str) -> GraphResult<Option<AuthorWithPosts>> {
        self.field(
            queries::AUTHOR_WITH_POSTS,
            json!({ "slug": slug }),
            Access::Public,
            "author",
        )
        .await
    }

    async fn author_profile(&self, email: &str) -> GraphResult<Option<AuthorProfile>> {
        self.field(
            queries::AUTHOR_PROFILE,
            json!({ "email": email }),
            Access::Authorized,
            "author",
        )
        .await
    }

    async fn tools_overview(&self) -> GraphResult<ToolsOverview> {
        let data = self
            .client
            .execute(queries::TOOLS_OVERVIEW, json!({}), Access::Public)
            .await?;
        serde_json::from_value(data).map_err(|err| GraphError::Decode(err.to_string()))
    }

    async fn get_tool(&self, slug: &str) -> GraphResult<Option<Tool>> {
        self.field(
            queries::TOOL_BY_SLUG,
            json!({ "slug": slug }),
            Access::Public,
            "tool",
        )
        .await
    }
}
