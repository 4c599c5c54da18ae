// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static AND_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+and\s+").expect("valid separator regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").expect("valid slug regex"));
static DASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("valid dash regex"));

/// A tag the author asked for, after normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredTag {
    pub name: String,
    pub slug: String,
}

/// URL slug for titles, names and tags. May return an empty string.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let dashed = WHITESPACE_RUN.replace_all(&lowered, "-");
    let stripped = NON_SLUG_CHARS.replace_all(&dashed, "");
    DASH_RUN.replace_all(&stripped, "-").into_owned()
}

/// Splits free-form tag input ("rust, web and async") into distinct tags.
/// The first spelling of a slug wins.
pub fn parse_tag_list(raw: &str) -> Vec<DesiredTag> {
    let separated = AND_SEPARATOR.replace_all(raw, ",");
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for token in separated.split(',') {
        let name = token.trim();
        if name.is_empty() {
            continue;
        }
        let slug = slugify(name);
        if slug.is_empty() || !seen.insert(slug.clone()) {
            continue;
        }
        tags.push(DesiredTag {
            name: name.to_string(),
            slug,
        });
    }
    tags
}
