// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedRef {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageRef {
    pub id: String,
}

/// A tag as seen in the draft stage, which includes unpublished tags.
///
/// Draft-stage reads always return a null `publishedAt`, so publication is
/// taken from the tag's copy in the published stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub document_in_stages: Vec<StageRef>,
}

impl TagNode {
    pub fn is_published(&self) -> bool {
        !self.document_in_stages.is_empty()
    }

    pub fn mark_published(&mut self) {
        self.document_in_stages = vec![StageRef {
            id: self.id.clone(),
        }];
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub email: String,
}

/// A post as needed by the write paths: identity, author and current tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostNode {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub tag: Vec<TagNode>,
    #[serde(default)]
    pub author: Option<AuthorNode>,
}

impl PostNode {
    pub fn is_written_by(&self, email: &str) -> bool {
        self.author
            .as_ref()
            .is_some_and(|author| author.email.eq_ignore_ascii_case(email))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub tag: Vec<NamedRef>,
    #[serde(default)]
    pub author: Option<NamedRef>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub tag: Vec<NamedRef>,
    #[serde(default)]
    pub author: Option<NamedRef>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagWithPosts {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub post: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorWithPosts {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub post: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorProfile {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub email: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub post: Vec<PostDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo: Option<Asset>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub category: Option<NamedRef>,
    #[serde(default)]
    pub platform: Option<NamedRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolsOverview {
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub categories: Vec<NamedRef>,
    #[serde(default)]
    pub platforms: Vec<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    /// RFC 3339 timestamp.
    pub date: String,
    pub author_id: String,
    pub tag_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author_id: String,
    pub connect: Vec<String>,
    pub disconnect: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub slug: String,
    pub email: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
}
