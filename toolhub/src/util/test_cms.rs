// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

//! In-process document graph with draft/published stages and failure injection.

use crate::cms::{
    AuthorNode, AuthorProfile, AuthorWithPosts, CmsApi, GraphError, GraphQlError, GraphResult,
    NamedRef, NewAuthor, NewTag, PostDetail, PostDraft, PostNode, PostSummary, PostUpdate,
    TagNode, TagWithPosts, Tool, ToolsOverview,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// How a scripted tag creation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFailure {
    /// Another writer creates the tag first; the create reports a unique violation.
    Race,
    /// The create is refused and nothing is stored.
    Reject,
    /// The create lands but the response times out.
    Transport,
    /// A unique violation is reported yet no tag with the slug exists.
    PhantomDuplicate,
}

#[derive(Debug, Clone)]
pub struct StoredAuthor {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub email: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub published: bool,
}

impl StoredAuthor {
    fn node(&self) -> AuthorNode {
        AuthorNode {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
            email: self.email.clone(),
        }
    }

    fn named(&self) -> NamedRef {
        NamedRef {
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredPostRow {
    id: String,
    title: String,
    slug: String,
    content: String,
    date: String,
    author_id: String,
    tag_ids: Vec<String>,
    published: bool,
}

/// A post as the graph holds it, with tags and author resolved.
#[derive(Debug, Clone)]
pub struct StoredPost {
    pub node: PostNode,
    pub content: String,
    pub date: String,
    pub published: bool,
}

#[derive(Debug, Default)]
struct Graph {
    next_id: u64,
    authors: Vec<StoredAuthor>,
    tags: Vec<TagNode>,
    posts: Vec<StoredPostRow>,
    overview: ToolsOverview,
    calls: Vec<String>,
    tag_failures: HashMap<String, TagFailure>,
    tag_publish_failures: HashSet<String>,
    tag_lookup_failure: Option<GraphError>,
    tag_slug_lookup_failures: HashSet<String>,
    fail_post_publish: bool,
    fail_reads: Option<GraphError>,
}

impl Graph {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn tag_by_id(&self, id: &str) -> Option<&TagNode> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    fn author_by_id(&self, id: &str) -> Option<&StoredAuthor> {
        self.authors.iter().find(|author| author.id == id)
    }

    fn resolve(&self, row: &StoredPostRow) -> StoredPost {
        StoredPost {
            node: PostNode {
                id: row.id.clone(),
                title: row.title.clone(),
                slug: row.slug.clone(),
                tag: row
                    .tag_ids
                    .iter()
                    .filter_map(|id| self.tag_by_id(id).cloned())
                    .collect(),
                author: self.author_by_id(&row.author_id).map(StoredAuthor::node),
            },
            content: row.content.clone(),
            date: row.date.clone(),
            published: row.published,
        }
    }

    fn published_tags(&self, row: &StoredPostRow) -> Vec<NamedRef> {
        row.tag_ids
            .iter()
            .filter_map(|id| self.tag_by_id(id))
            .filter(|tag| tag.is_published())
            .map(|tag| NamedRef {
                name: tag.name.clone(),
                slug: tag.slug.clone(),
            })
            .collect()
    }

    fn summary(&self, row: &StoredPostRow) -> PostSummary {
        PostSummary {
            id: row.id.clone(),
            title: row.title.clone(),
            slug: row.slug.clone(),
            tag: self.published_tags(row),
            author: self.author_by_id(&row.author_id).map(StoredAuthor::named),
            created_at: Some(row.date.clone()),
        }
    }

    fn detail(&self, row: &StoredPostRow) -> PostDetail {
        PostDetail {
            id: row.id.clone(),
            title: row.title.clone(),
            slug: row.slug.clone(),
            content: row.content.clone(),
            tag: self.published_tags(row),
            author: self.author_by_id(&row.author_id).map(StoredAuthor::named),
            created_at: Some(row.date.clone()),
        }
    }

    fn published_posts(&self) -> impl Iterator<Item = &StoredPostRow> {
        self.posts.iter().rev().filter(|row| row.published)
    }

    fn read_guard(&self) -> GraphResult<()> {
        match &self.fail_reads {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn graph_error(message: &str) -> GraphError {
    GraphError::Graph(vec![GraphQlError {
        message: message.to_string(),
        extensions: None,
    }])
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Debug, Default)]
pub struct MemoryCms {
    graph: Mutex<Graph>,
}

impl MemoryCms {
    pub fn new() -> Self {
        Self::default()
    }

    fn graph(&self) -> GraphResult<MutexGuard<'_, Graph>> {
        self.graph
            .lock()
            .map_err(|_| GraphError::Transport("memory graph lock poisoned".to_string()))
    }

    fn record(&self, call: String) -> GraphResult<MutexGuard<'_, Graph>> {
        let mut graph = self.graph()?;
        graph.calls.push(call);
        Ok(graph)
    }

    fn inspect(&self) -> MutexGuard<'_, Graph> {
        self.graph.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Operation log, one `name:argument` entry per call.
    pub fn calls(&self) -> Vec<String> {
        self.inspect().calls.clone()
    }

    pub fn tags(&self) -> Vec<TagNode> {
        self.inspect().tags.clone()
    }

    pub fn tag(&self, slug: &str) -> Option<TagNode> {
        self.inspect().tags.iter().find(|tag| tag.slug == slug).cloned()
    }

    pub fn post(&self, slug: &str) -> Option<StoredPost> {
        let graph = self.inspect();
        graph
            .posts
            .iter()
            .find(|row| row.slug == slug)
            .map(|row| graph.resolve(row))
    }

    pub fn author_record(&self, email: &str) -> Option<StoredAuthor> {
        self.inspect()
            .authors
            .iter()
            .find(|author| author.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn seed_author(&self, name: &str, email: &str) -> AuthorNode {
        let mut graph = self.inspect();
        let id = graph.id("author-");
        let author = StoredAuthor {
            id,
            name: name.to_string(),
            slug: crate::blog::slugify(name),
            email: email.to_string(),
            title: None,
            bio: None,
            website: None,
            instagram: None,
            facebook: None,
            linkedin: None,
            published: true,
        };
        let node = author.node();
        graph.authors.push(author);
        node
    }

    pub fn seed_tag(&self, name: &str, slug: &str, published: bool) -> TagNode {
        let mut graph = self.inspect();
        let id = graph.id("tag-");
        let mut tag = TagNode {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
            document_in_stages: Vec::new(),
        };
        if published {
            tag.mark_published();
        }
        graph.tags.push(tag.clone());
        tag
    }

    /// Stores a published post written by the author with `author_email`.
    pub fn seed_post(&self, title: &str, author_email: &str, tag_slugs: &[&str]) -> PostNode {
        let mut graph = self.inspect();
        let id = graph.id("post-");
        let author_id = graph
            .authors
            .iter()
            .find(|author| author.email == author_email)
            .map(|author| author.id.clone())
            .unwrap_or_default();
        let tag_ids = tag_slugs
            .iter()
            .filter_map(|slug| graph.tags.iter().find(|tag| tag.slug == *slug))
            .map(|tag| tag.id.clone())
            .collect();
        let row = StoredPostRow {
            id,
            title: title.to_string(),
            slug: crate::blog::slugify(title),
            content: format!("{} body", title),
            date: now(),
            author_id,
            tag_ids,
            published: true,
        };
        let node = graph.resolve(&row).node;
        graph.posts.push(row);
        node
    }

    pub fn seed_tools(&self, overview: ToolsOverview) {
        self.inspect().overview = overview;
    }

    pub fn fail_tag_creation(&self, slug: &str, failure: TagFailure) {
        self.inspect().tag_failures.insert(slug.to_string(), failure);
    }

    pub fn fail_tag_publish(&self, slug: &str) {
        self.inspect().tag_publish_failures.insert(slug.to_string());
    }

    pub fn fail_tag_lookup(&self, error: GraphError) {
        self.inspect().tag_lookup_failure = Some(error);
    }

    /// Every `find_tag_by_slug` for `slug` fails with a transport error.
    pub fn fail_tag_slug_lookup(&self, slug: &str) {
        self.inspect()
            .tag_slug_lookup_failures
            .insert(slug.to_string());
    }

    pub fn fail_post_publish(&self) {
        self.inspect().fail_post_publish = true;
    }

    /// Every public read fails with `error`.
    pub fn fail_reads(&self, error: GraphError) {
        self.inspect().fail_reads = Some(error);
    }
}

#[async_trait]
impl CmsApi for MemoryCms {
    async fn find_author_by_email(&self, email: &str) -> GraphResult<Option<AuthorNode>> {
        let graph = self.record(format!("find_author_by_email:{}", email))?;
        Ok(graph
            .authors
            .iter()
            .find(|author| author.email.eq_ignore_ascii_case(email))
            .map(StoredAuthor::node))
    }

    async fn create_author(&self, author: &NewAuthor) -> GraphResult<AuthorNode> {
        let mut graph = self.record(format!("create_author:{}", author.slug))?;
        if graph
            .authors
            .iter()
            .any(|row| row.slug == author.slug || row.email == author.email)
        {
            return Err(graph_error("value is not unique for the field \"slug\""));
        }
        let id = graph.id("author-");
        let stored = StoredAuthor {
            id,
            name: author.name.clone(),
            slug: author.slug.clone(),
            email: author.email.clone(),
            title: author.title.clone(),
            bio: author.bio.clone(),
            website: author.website.clone(),
            instagram: author.instagram.clone(),
            facebook: author.facebook.clone(),
            linkedin: author.linkedin.clone(),
            published: false,
        };
        let node = stored.node();
        graph.authors.push(stored);
        Ok(node)
    }

    async fn publish_author(&self, id: &str) -> GraphResult<()> {
        let mut graph = self.record(format!("publish_author:{}", id))?;
        let author = graph
            .authors
            .iter_mut()
            .find(|author| author.id == id)
            .ok_or_else(|| GraphError::Decode("publishAuthor returned no node".to_string()))?;
        author.published = true;
        Ok(())
    }

    async fn find_tags_by_names(&self, names: &[String]) -> GraphResult<Vec<TagNode>> {
        let graph = self.record(format!("find_tags_by_names:{}", names.join(",")))?;
        if let Some(err) = &graph.tag_lookup_failure {
            return Err(err.clone());
        }
        Ok(graph
            .tags
            .iter()
            .filter(|tag| names.contains(&tag.name))
            .cloned()
            .collect())
    }

    async fn find_tag_by_slug(&self, slug: &str) -> GraphResult<Option<TagNode>> {
        let graph = self.record(format!("find_tag_by_slug:{}", slug))?;
        if graph.tag_slug_lookup_failures.contains(slug) {
            return Err(GraphError::Transport("connection reset".to_string()));
        }
        Ok(graph.tags.iter().find(|tag| tag.slug == slug).cloned())
    }

    async fn create_tag(&self, tag: &NewTag) -> GraphResult<TagNode> {
        let mut graph = self.record(format!("create_tag:{}", tag.slug))?;
        let failure = graph.tag_failures.get(&tag.slug).copied();
        let exists = graph.tags.iter().any(|row| row.slug == tag.slug);
        match failure {
            Some(TagFailure::Reject) => {
                return Err(graph_error("permission denied for createTag"));
            }
            Some(TagFailure::PhantomDuplicate) => {
                return Err(graph_error("value is not unique for the field \"slug\""));
            }
            _ => {}
        }
        if exists {
            return Err(graph_error("value is not unique for the field \"slug\""));
        }

        let id = graph.id("tag-");
        let node = TagNode {
            id,
            name: tag.name.clone(),
            slug: tag.slug.clone(),
            document_in_stages: Vec::new(),
        };
        graph.tags.push(node.clone());
        match failure {
            Some(TagFailure::Race) => {
                Err(graph_error("value is not unique for the field \"slug\""))
            }
            Some(TagFailure::Transport) => {
                Err(GraphError::Transport("operation timed out".to_string()))
            }
            _ => Ok(node),
        }
    }

    async fn publish_tag(&self, id: &str) -> GraphResult<()> {
        let mut graph = self.record(format!("publish_tag:{}", id))?;
        let slug = graph
            .tag_by_id(id)
            .map(|tag| tag.slug.clone())
            .ok_or_else(|| GraphError::Decode("publishTag returned no node".to_string()))?;
        if graph.tag_publish_failures.contains(&slug) {
            return Err(graph_error("publishing is temporarily unavailable"));
        }
        if let Some(tag) = graph.tags.iter_mut().find(|tag| tag.id == id) {
            tag.mark_published();
        }
        Ok(())
    }

    async fn find_post_by_slug(&self, slug: &str) -> GraphResult<Option<PostNode>> {
        let graph = self.record(format!("find_post_by_slug:{}", slug))?;
        Ok(graph
            .posts
            .iter()
            .find(|row| row.slug == slug)
            .map(|row| graph.resolve(row).node))
    }

    async fn create_post(&self, draft: &PostDraft) -> GraphResult<PostNode> {
        let mut graph = self.record(format!("create_post:{}", draft.slug))?;
        if graph.posts.iter().any(|row| row.slug == draft.slug) {
            return Err(graph_error("value is not unique for the field \"slug\""));
        }
        let id = graph.id("post-");
        let row = StoredPostRow {
            id,
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            content: draft.content.clone(),
            date: draft.date.clone(),
            author_id: draft.author_id.clone(),
            tag_ids: draft.tag_ids.clone(),
            published: false,
        };
        let node = graph.resolve(&row).node;
        graph.posts.push(row);
        Ok(node)
    }

    async fn update_post(&self, update: &PostUpdate) -> GraphResult<PostNode> {
        let mut graph = self.record(format!("update_post:{}", update.id))?;
        let row = graph
            .posts
            .iter_mut()
            .find(|row| row.id == update.id)
            .ok_or_else(|| GraphError::Decode("updatePost returned no node".to_string()))?;
        row.title = update.title.clone();
        row.slug = update.slug.clone();
        row.content = update.content.clone();
        row.author_id = update.author_id.clone();
        row.tag_ids.retain(|id| !update.disconnect.contains(id));
        for id in &update.connect {
            if !row.tag_ids.contains(id) {
                row.tag_ids.push(id.clone());
            }
        }
        row.published = false;
        let row = row.clone();
        Ok(graph.resolve(&row).node)
    }

    async fn publish_post(&self, id: &str) -> GraphResult<()> {
        let mut graph = self.record(format!("publish_post:{}", id))?;
        if graph.fail_post_publish {
            return Err(graph_error("publishing is temporarily unavailable"));
        }
        let row = graph
            .posts
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| GraphError::Decode("publishPost returned no node".to_string()))?;
        row.published = true;
        Ok(())
    }

    async fn unpublish_post(&self, id: &str) -> GraphResult<()> {
        let mut graph = self.record(format!("unpublish_post:{}", id))?;
        if let Some(row) = graph.posts.iter_mut().find(|row| row.id == id) {
            row.published = false;
        }
        Ok(())
    }

    async fn delete_post(&self, id: &str) -> GraphResult<()> {
        let mut graph = self.record(format!("delete_post:{}", id))?;
        graph.posts.retain(|row| row.id != id);
        Ok(())
    }

    async fn list_posts(&self) -> GraphResult<Vec<PostSummary>> {
        let graph = self.record("list_posts".to_string())?;
        graph.read_guard()?;
        Ok(graph.published_posts().map(|row| graph.summary(row)).collect())
    }

    async fn get_post(&self, slug: &str) -> GraphResult<Option<PostDetail>> {
        let graph = self.record(format!("get_post:{}", slug))?;
        graph.read_guard()?;
        Ok(graph
            .published_posts()
            .find(|row| row.slug == slug)
            .map(|row| graph.detail(row)))
    }

    async fn tag_with_posts(&self, slug: &str) -> GraphResult<Option<TagWithPosts>> {
        let graph = self.record(format!("tag_with_posts:{}", slug))?;
        graph.read_guard()?;
        let Some(tag) = graph
            .tags
            .iter()
            .find(|tag| tag.slug == slug && tag.is_published())
        else {
            return Ok(None);
        };
        Ok(Some(TagWithPosts {
            name: tag.name.clone(),
            slug: tag.slug.clone(),
            post: graph
                .published_posts()
                .filter(|row| row.tag_ids.contains(&tag.id))
                .map(|row| graph.summary(row))
                .collect(),
        }))
    }

    async fn author_with_posts(&self, slug: &str) -> GraphResult<Option<AuthorWithPosts>> {
        let graph = self.record(format!("author_with_posts:{}", slug))?;
        graph.read_guard()?;
        let Some(author) = graph
            .authors
            .iter()
            .find(|author| author.slug == slug && author.published)
        else {
            return Ok(None);
        };
        Ok(Some(AuthorWithPosts {
            name: author.name.clone(),
            slug: author.slug.clone(),
            post: graph
                .published_posts()
                .filter(|row| row.author_id == author.id)
                .map(|row| graph.summary(row))
                .collect(),
        }))
    }

    async fn author_profile(&self, email: &str) -> GraphResult<Option<AuthorProfile>> {
        let graph = self.record(format!("author_profile:{}", email))?;
        graph.read_guard()?;
        let Some(author) = graph
            .authors
            .iter()
            .find(|author| author.email.eq_ignore_ascii_case(email) && author.published)
        else {
            return Ok(None);
        };
        Ok(Some(AuthorProfile {
            id: author.id.clone(),
            name: author.name.clone(),
            slug: author.slug.clone(),
            email: author.email.clone(),
            title: author.title.clone(),
            bio: author.bio.clone(),
            website: author.website.clone(),
            instagram: author.instagram.clone(),
            facebook: author.facebook.clone(),
            linkedin: author.linkedin.clone(),
            post: graph
                .published_posts()
                .filter(|row| row.author_id == author.id)
                .map(|row| graph.detail(row))
                .collect(),
        }))
    }

    async fn tools_overview(&self) -> GraphResult<ToolsOverview> {
        let graph = self.record("tools_overview".to_string())?;
        graph.read_guard()?;
        Ok(graph.overview.clone())
    }

    async fn get_tool(&self, slug: &str) -> GraphResult<Option<Tool>> {
        let graph = self.record(format!("get_tool:{}", slug))?;
        graph.read_guard()?;
        Ok(graph.overview.tools.iter().find(|tool| tool.slug == slug).cloned())
    }
}
