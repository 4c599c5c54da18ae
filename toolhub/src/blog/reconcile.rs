// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::tags::DesiredTag;
use crate::cms::{CmsApi, GraphResult, NewTag, TagNode};
use futures_util::future::join_all;
use std::collections::HashSet;
use std::time::Duration;

/// How a resolved tag was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOrigin {
    Existing,
    Created,
    /// Creation failed but the tag turned out to exist (concurrent writer).
    Recovered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    pub tag: TagNode,
    pub origin: TagOrigin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub tags: Vec<ResolvedTag>,
    /// Tags that could neither be found nor created.
    pub skipped: Vec<DesiredTag>,
    /// Ids of tags published during this resolution.
    pub published: Vec<String>,
}

impl Resolution {
    fn push(&mut self, tag: TagNode, origin: TagOrigin) {
        if self.tags.iter().any(|resolved| resolved.tag.id == tag.id) {
            return;
        }
        self.tags.push(ResolvedTag { tag, origin });
    }

    pub fn ids(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|resolved| resolved.tag.id.clone())
            .collect()
    }

    pub fn created(&self) -> usize {
        self.tags
            .iter()
            .filter(|resolved| resolved.origin == TagOrigin::Created)
            .count()
    }
}

/// Tag id changes needed to move a post from its current tags to the desired ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDelta {
    pub connect: Vec<String>,
    pub disconnect: Vec<String>,
    pub unchanged: Vec<String>,
}

pub fn compute_delta(current: &[TagNode], desired: &[String]) -> TagDelta {
    let current_ids: HashSet<&str> = current.iter().map(|tag| tag.id.as_str()).collect();
    let desired_ids: HashSet<&str> = desired.iter().map(String::as_str).collect();

    let mut delta = TagDelta::default();
    for id in desired {
        if current_ids.contains(id.as_str()) {
            delta.unchanged.push(id.clone());
        } else if !delta.connect.contains(id) {
            delta.connect.push(id.clone());
        }
    }
    for tag in current {
        if !desired_ids.contains(tag.id.as_str()) && !delta.disconnect.contains(&tag.id) {
            delta.disconnect.push(tag.id.clone());
        }
    }
    delta
}

fn matches_tag(tag: &TagNode, wanted: &DesiredTag) -> bool {
    tag.slug == wanted.slug || tag.name.eq_ignore_ascii_case(&wanted.name)
}

/// Resolves desired tags to graph nodes, creating and publishing what is missing.
pub struct TagReconciler<'a> {
    cms: &'a dyn CmsApi,
    settle_delay: Duration,
}

impl<'a> TagReconciler<'a> {
    pub fn new(cms: &'a dyn CmsApi, settle_delay: Duration) -> Self {
        Self { cms, settle_delay }
    }

    /// Only the initial lookup is fatal. Individual tags that fail are skipped.
    pub async fn resolve(&self, desired: &[DesiredTag]) -> GraphResult<Resolution> {
        let mut resolution = Resolution::default();
        if desired.is_empty() {
            return Ok(resolution);
        }

        let names: Vec<String> = desired.iter().map(|tag| tag.name.clone()).collect();
        let existing = self.cms.find_tags_by_names(&names).await?;

        for wanted in desired {
            if let Some(tag) = existing.iter().find(|tag| matches_tag(tag, wanted)) {
                resolution.push(tag.clone(), TagOrigin::Existing);
                continue;
            }
            match self.obtain(wanted).await {
                Some((tag, origin)) => resolution.push(tag, origin),
                None => resolution.skipped.push(wanted.clone()),
            }
        }

        self.publish_drafts(&mut resolution).await;
        Ok(resolution)
    }

    async fn obtain(&self, wanted: &DesiredTag) -> Option<(TagNode, TagOrigin)> {
        match self.cms.find_tag_by_slug(&wanted.slug).await {
            Ok(Some(tag)) => return Some((tag, TagOrigin::Existing)),
            Ok(None) => {}
            Err(err) => log::warn!("Tag re-check for '{}' failed: {}", wanted.slug, err),
        }

        let new_tag = NewTag {
            name: wanted.name.clone(),
            slug: wanted.slug.clone(),
        };
        match self.cms.create_tag(&new_tag).await {
            Ok(tag) => {
                log::info!("Created tag '{}' ({})", tag.slug, tag.id);
                Some((tag, TagOrigin::Created))
            }
            Err(err) if err.is_duplicate() || err.is_transport() => {
                log::info!(
                    "Creating tag '{}' failed ({}); fetching existing tag",
                    wanted.slug,
                    err
                );
                match self.cms.find_tag_by_slug(&wanted.slug).await {
                    Ok(Some(tag)) => Some((tag, TagOrigin::Recovered)),
                    Ok(None) => {
                        log::warn!("Skipping tag '{}': not found after failed create", wanted.name);
                        None
                    }
                    Err(err) => {
                        log::warn!("Skipping tag '{}': recovery failed: {}", wanted.name, err);
                        None
                    }
                }
            }
            Err(err) => {
                log::warn!("Skipping tag '{}': {}", wanted.name, err);
                None
            }
        }
    }

    async fn publish_drafts(&self, resolution: &mut Resolution) {
        let drafts: Vec<String> = resolution
            .tags
            .iter()
            .filter(|resolved| !resolved.tag.is_published())
            .map(|resolved| resolved.tag.id.clone())
            .collect();
        if drafts.is_empty() {
            return;
        }

        let results = join_all(drafts.iter().map(|id| self.cms.publish_tag(id))).await;
        for (id, result) in drafts.into_iter().zip(results) {
            match result {
                Ok(()) => resolution.published.push(id),
                Err(err) => log::warn!("Publishing tag {} failed: {}", id, err),
            }
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }
}
