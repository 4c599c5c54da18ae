// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::reconcile::{Resolution, TagDelta, TagReconciler, compute_delta};
use super::tags::{parse_tag_list, slugify};
use crate::cms::{AuthorNode, CmsApi, GraphError, NewAuthor, PostDraft, PostNode, PostUpdate};
use crate::security::{
    MAX_BODY_CHARS, MAX_NAME_CHARS, MAX_TITLE_CHARS, normalize_handle, require_text,
    validate_and_sanitize_user_name,
};
use chrono::Utc;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

const INSTAGRAM_BASE: &str = "https://instagram.com/";
const FACEBOOK_BASE: &str = "https://facebook.com/";
const LINKEDIN_BASE: &str = "https://linkedin.com/in/";

/// Raw post form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
}

/// Raw author registration form fields. Social fields are handles, not URLs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorRegistration {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug)]
pub enum PublishError {
    Validation(String),
    AuthorNotFound,
    PostNotFound,
    SlugTaken(String),
    AuthorExists,
    Upstream {
        step: &'static str,
        source: GraphError,
    },
    /// The node was saved in draft but the publish call failed.
    NotPublished {
        kind: &'static str,
        slug: String,
        source: GraphError,
    },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Validation(msg) => write!(f, "{}", msg),
            PublishError::AuthorNotFound => write!(f, "No author is registered for this account"),
            PublishError::PostNotFound => write!(f, "Post not found"),
            PublishError::SlugTaken(slug) => write!(f, "A post with slug '{}' already exists", slug),
            PublishError::AuthorExists => write!(f, "An author is already registered for this account"),
            PublishError::Upstream { step, source } => write!(f, "{} failed: {}", step, source),
            PublishError::NotPublished { kind, slug, source } => {
                write!(f, "{} '{}' was saved but not published: {}", kind, slug, source)
            }
        }
    }
}

impl std::error::Error for PublishError {}

fn upstream(step: &'static str) -> impl FnOnce(GraphError) -> PublishError {
    move |source| PublishError::Upstream { step, source }
}

/// Result of a create or edit.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub post: PostNode,
    pub resolution: Resolution,
    /// Present for edits.
    pub delta: Option<TagDelta>,
}

struct ValidPost {
    title: String,
    slug: String,
    content: String,
    tags: String,
}

impl PostInput {
    fn validate(&self) -> Result<ValidPost, PublishError> {
        let title = require_text("Title", self.title.as_deref(), MAX_TITLE_CHARS)
            .map_err(PublishError::Validation)?;
        let content = require_text("Content", self.content.as_deref(), MAX_BODY_CHARS)
            .map_err(PublishError::Validation)?;
        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(PublishError::Validation(
                "Title must contain letters or numbers".to_string(),
            ));
        }
        Ok(ValidPost {
            title,
            slug,
            content,
            tags: self.tags.clone().unwrap_or_default(),
        })
    }
}

fn optional_text(label: &str, value: Option<&str>, max: usize) -> Result<Option<String>, PublishError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => require_text(label, Some(text), max)
            .map(Some)
            .map_err(PublishError::Validation),
    }
}

fn social_url(base: &str, handle: Option<&str>) -> Result<Option<String>, PublishError> {
    Ok(normalize_handle(handle)
        .map_err(PublishError::Validation)?
        .map(|handle| format!("{}{}", base, handle)))
}

/// Ordered, fallible steps that write posts and authors to the CMS.
/// Stops at the first fatal step; per-tag failures are absorbed by the reconciler.
pub struct PostPublisher<'a> {
    cms: &'a dyn CmsApi,
    settle_delay: Duration,
}

impl<'a> PostPublisher<'a> {
    pub fn new(cms: &'a dyn CmsApi, settle_delay: Duration) -> Self {
        Self { cms, settle_delay }
    }

    async fn author_for(&self, email: &str) -> Result<AuthorNode, PublishError> {
        self.cms
            .find_author_by_email(email)
            .await
            .map_err(upstream("Author lookup"))?
            .ok_or(PublishError::AuthorNotFound)
    }

    async fn owned_post(&self, author: &AuthorNode, slug: &str) -> Result<PostNode, PublishError> {
        let post = self
            .cms
            .find_post_by_slug(slug)
            .await
            .map_err(upstream("Post lookup"))?;
        match post {
            Some(post) if post.is_written_by(&author.email) => Ok(post),
            Some(_) => {
                log::warn!("Author {} tried to modify post '{}' they do not own", author.id, slug);
                Err(PublishError::PostNotFound)
            }
            None => Err(PublishError::PostNotFound),
        }
    }

    async fn ensure_slug_free(&self, slug: &str) -> Result<(), PublishError> {
        let existing = self
            .cms
            .find_post_by_slug(slug)
            .await
            .map_err(upstream("Slug check"))?;
        match existing {
            Some(_) => Err(PublishError::SlugTaken(slug.to_string())),
            None => Ok(()),
        }
    }

    async fn publish(&self, post: &PostNode) -> Result<(), PublishError> {
        self.cms.publish_post(&post.id).await.map_err(|source| {
            log::error!("Post '{}' ({}) saved but publish failed: {}", post.slug, post.id, source);
            PublishError::NotPublished {
                kind: "Post",
                slug: post.slug.clone(),
                source,
            }
        })
    }

    pub async fn create(
        &self,
        author_email: &str,
        input: &PostInput,
    ) -> Result<PublishOutcome, PublishError> {
        let valid = input.validate()?;
        let author = self.author_for(author_email).await?;
        self.ensure_slug_free(&valid.slug).await?;

        let resolution = TagReconciler::new(self.cms, self.settle_delay)
            .resolve(&parse_tag_list(&valid.tags))
            .await
            .map_err(upstream("Tag lookup"))?;

        let post = self
            .cms
            .create_post(&PostDraft {
                title: valid.title,
                slug: valid.slug,
                content: valid.content,
                date: Utc::now().to_rfc3339(),
                author_id: author.id.clone(),
                tag_ids: resolution.ids(),
            })
            .await
            .map_err(upstream("Post create"))?;
        log::info!(
            "Created post '{}' ({}) for author {} with {} tags",
            post.slug,
            post.id,
            author.id,
            resolution.tags.len()
        );

        self.publish(&post).await?;
        Ok(PublishOutcome {
            post,
            resolution,
            delta: None,
        })
    }

    pub async fn edit(
        &self,
        author_email: &str,
        old_slug: Option<&str>,
        input: &PostInput,
    ) -> Result<PublishOutcome, PublishError> {
        let old_slug = old_slug
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .ok_or_else(|| PublishError::Validation("Slug is required".to_string()))?;
        let valid = input.validate()?;
        let author = self.author_for(author_email).await?;
        let existing = self.owned_post(&author, old_slug).await?;
        if valid.slug != existing.slug {
            self.ensure_slug_free(&valid.slug).await?;
        }

        let resolution = TagReconciler::new(self.cms, self.settle_delay)
            .resolve(&parse_tag_list(&valid.tags))
            .await
            .map_err(upstream("Tag lookup"))?;
        let delta = compute_delta(&existing.tag, &resolution.ids());
        log::debug!(
            "Post {} tags: connect {:?}, disconnect {:?}, unchanged {:?}",
            existing.id,
            delta.connect,
            delta.disconnect,
            delta.unchanged
        );

        let post = self
            .cms
            .update_post(&PostUpdate {
                id: existing.id.clone(),
                title: valid.title,
                slug: valid.slug,
                content: valid.content,
                author_id: author.id.clone(),
                connect: delta.connect.clone(),
                disconnect: delta.disconnect.clone(),
            })
            .await
            .map_err(upstream("Post update"))?;

        self.publish(&post).await?;
        Ok(PublishOutcome {
            post,
            resolution,
            delta: Some(delta),
        })
    }

    pub async fn delete(&self, author_email: &str, slug: Option<&str>) -> Result<PostNode, PublishError> {
        let slug = slug
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .ok_or_else(|| PublishError::Validation("Slug is required".to_string()))?;
        let author = self.author_for(author_email).await?;
        let post = self.owned_post(&author, slug).await?;

        self.cms
            .unpublish_post(&post.id)
            .await
            .map_err(upstream("Post unpublish"))?;
        self.cms
            .delete_post(&post.id)
            .await
            .map_err(upstream("Post delete"))?;
        log::info!("Deleted post '{}' ({})", post.slug, post.id);
        Ok(post)
    }

    /// Registers the signed-in user as an author. A blank name falls back to
    /// the account's display name.
    pub async fn register_author(
        &self,
        email: &str,
        account_name: &str,
        registration: &AuthorRegistration,
    ) -> Result<AuthorNode, PublishError> {
        let raw_name = registration
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(account_name);
        let name = validate_and_sanitize_user_name(raw_name).map_err(PublishError::Validation)?;
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(PublishError::Validation(
                "Name must contain letters or numbers".to_string(),
            ));
        }

        let author = NewAuthor {
            name,
            slug,
            email: email.to_string(),
            title: optional_text("Title", registration.title.as_deref(), MAX_TITLE_CHARS)?,
            bio: optional_text("Bio", registration.bio.as_deref(), MAX_BODY_CHARS)?,
            website: optional_text("Website", registration.website.as_deref(), MAX_NAME_CHARS)?,
            instagram: social_url(INSTAGRAM_BASE, registration.instagram.as_deref())?,
            facebook: social_url(FACEBOOK_BASE, registration.facebook.as_deref())?,
            linkedin: social_url(LINKEDIN_BASE, registration.linkedin.as_deref())?,
        };

        let existing = self
            .cms
            .find_author_by_email(email)
            .await
            .map_err(upstream("Author lookup"))?;
        if existing.is_some() {
            return Err(PublishError::AuthorExists);
        }

        let created = self.cms.create_author(&author).await.map_err(|source| {
            if source.is_duplicate() {
                PublishError::AuthorExists
            } else {
                PublishError::Upstream {
                    step: "Author create",
                    source,
                }
            }
        })?;

        self.cms.publish_author(&created.id).await.map_err(|source| {
            log::error!("Author '{}' saved but publish failed: {}", created.slug, source);
            PublishError::NotPublished {
                kind: "Author",
                slug: created.slug.clone(),
                source,
            }
        })?;
        log::info!("Registered author '{}' ({})", created.slug, created.id);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_cms::{MemoryCms, TagFailure};

    const EMAIL: &str = "ada@example.com";

    fn input(title: &str, content: &str, tags: &str) -> PostInput {
        PostInput {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            tags: Some(tags.to_string()),
        }
    }

    fn tag_slugs(cms: &MemoryCms, slug: &str) -> Vec<String> {
        let mut slugs: Vec<String> = cms
            .post(slug)
            .map(|post| post.node.tag.into_iter().map(|tag| tag.slug).collect())
            .unwrap_or_default();
        slugs.sort();
        slugs
    }

    #[tokio::test]
    async fn create_requires_registered_author() {
        let cms = MemoryCms::new();
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        let err = publisher
            .create(EMAIL, &input("Hello", "Body", "rust"))
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::AuthorNotFound));
        assert!(cms.tags().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_and_symbol_titles() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        let missing = publisher.create(EMAIL, &PostInput::default()).await;
        assert!(matches!(missing, Err(PublishError::Validation(msg)) if msg == "Title is required"));
        let symbols = publisher.create(EMAIL, &input("!!!", "Body", "")).await;
        assert!(matches!(symbols, Err(PublishError::Validation(_))));
    }

    #[tokio::test]
    async fn create_publishes_post_with_deduplicated_tags() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        let outcome = publisher
            .create(EMAIL, &input("Hello World", "Body", "Go, go and Rust"))
            .await
            .unwrap();
        assert_eq!(outcome.post.slug, "hello-world");
        assert_eq!(tag_slugs(&cms, "hello-world"), vec!["go", "rust"]);
        assert!(cms.post("hello-world").unwrap().published);
    }

    #[tokio::test]
    async fn create_rejects_taken_slug() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        publisher.create(EMAIL, &input("Same", "One", "")).await.unwrap();
        let err = publisher
            .create(EMAIL, &input("  same ", "Two", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::SlugTaken(slug) if slug == "same"));
    }

    #[tokio::test]
    async fn failed_tag_does_not_block_publish() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        cms.fail_tag_creation("broken", TagFailure::Reject);
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        let outcome = publisher
            .create(EMAIL, &input("Resilient", "Body", "broken, fine"))
            .await
            .unwrap();
        assert_eq!(outcome.resolution.skipped.len(), 1);
        assert_eq!(tag_slugs(&cms, "resilient"), vec!["fine"]);
        assert!(cms.post("resilient").unwrap().published);
    }

    #[tokio::test]
    async fn publish_failure_is_reported_distinctly() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        cms.fail_post_publish();
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        let err = publisher
            .create(EMAIL, &input("Stuck", "Body", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::NotPublished { kind: "Post", .. }));
        let stored = cms.post("stuck").unwrap();
        assert!(!stored.published);
    }

    #[tokio::test]
    async fn edit_computes_minimal_tag_delta() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        publisher
            .create(EMAIL, &input("Tagged", "Body", "a, b"))
            .await
            .unwrap();
        let a = cms.tag("a").unwrap();
        let b = cms.tag("b").unwrap();

        let outcome = publisher
            .edit(EMAIL, Some("tagged"), &input("Tagged", "Body v2", "b, c"))
            .await
            .unwrap();
        let c = cms.tag("c").unwrap();
        let delta = outcome.delta.unwrap();
        assert_eq!(delta.connect, vec![c.id]);
        assert_eq!(delta.disconnect, vec![a.id]);
        assert_eq!(delta.unchanged, vec![b.id]);
        assert_eq!(tag_slugs(&cms, "tagged"), vec!["b", "c"]);
        let stored = cms.post("tagged").unwrap();
        assert_eq!(stored.content, "Body v2");
        assert!(stored.published);
    }

    #[tokio::test]
    async fn edit_with_empty_tags_disconnects_all() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        publisher
            .create(EMAIL, &input("Bare", "Body", "x, y"))
            .await
            .unwrap();
        let outcome = publisher
            .edit(EMAIL, Some("bare"), &input("Bare", "Body", "  "))
            .await
            .unwrap();
        assert_eq!(outcome.delta.unwrap().disconnect.len(), 2);
        assert!(tag_slugs(&cms, "bare").is_empty());
    }

    #[tokio::test]
    async fn edit_rejects_foreign_post_and_slug_collision() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        cms.seed_author("Grace", "grace@example.com");
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        publisher.create(EMAIL, &input("Mine", "Body", "")).await.unwrap();
        publisher.create(EMAIL, &input("Other", "Body", "")).await.unwrap();

        let foreign = publisher
            .edit("grace@example.com", Some("mine"), &input("Mine", "Hijack", ""))
            .await;
        assert!(matches!(foreign, Err(PublishError::PostNotFound)));

        let collision = publisher
            .edit(EMAIL, Some("mine"), &input("Other", "Body", ""))
            .await;
        assert!(matches!(collision, Err(PublishError::SlugTaken(_))));
    }

    #[tokio::test]
    async fn edit_keeps_user_text_out_of_query_documents() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        publisher.create(EMAIL, &input("Quote", "Body", "")).await.unwrap();
        let hostile = "\" } mutation { deleteManyPosts { count } } #";
        publisher
            .edit(EMAIL, Some("quote"), &input("Quote", hostile, hostile))
            .await
            .unwrap();
        assert_eq!(cms.post("quote").unwrap().content, hostile);
    }

    #[tokio::test]
    async fn delete_unpublishes_then_removes() {
        let cms = MemoryCms::new();
        cms.seed_author("Ada", EMAIL);
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        publisher.create(EMAIL, &input("Gone", "Body", "")).await.unwrap();
        let deleted = publisher.delete(EMAIL, Some("gone")).await.unwrap();
        assert_eq!(deleted.slug, "gone");
        assert!(cms.post("gone").is_none());
        let calls = cms.calls();
        let unpublish = calls.iter().position(|call| call.starts_with("unpublish_post"));
        let delete = calls.iter().position(|call| call.starts_with("delete_post"));
        assert!(unpublish.is_some());
        assert!(unpublish < delete);

        let again = publisher.delete(EMAIL, Some("gone")).await;
        assert!(matches!(again, Err(PublishError::PostNotFound)));
    }

    #[tokio::test]
    async fn register_author_expands_social_handles() {
        let cms = MemoryCms::new();
        let publisher = PostPublisher::new(&cms, Duration::ZERO);
        let author = publisher
            .register_author(
                EMAIL,
                "Ada Lovelace",
                &AuthorRegistration {
                    name: Some("  ".to_string()),
                    instagram: Some("@ada".to_string()),
                    linkedin: Some("ada-l".to_string()),
                    facebook: Some(String::new()),
                    ..AuthorRegistration::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(author.slug, "ada-lovelace");
        let profile = cms.author_record(EMAIL).unwrap();
        assert_eq!(profile.instagram.as_deref(), Some("https://instagram.com/ada"));
        assert_eq!(profile.linkedin.as_deref(), Some("https://linkedin.com/in/ada-l"));
        assert_eq!(profile.facebook, None);
        assert!(profile.published);

        let again = publisher
            .register_author(EMAIL, "Ada Lovelace", &AuthorRegistration::default())
            .await;
        assert!(matches!(again, Err(PublishError::AuthorExists)));
    }
}
