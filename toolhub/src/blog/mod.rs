// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Author-written posts: tag normalisation, tag reconciliation against the
//! CMS, and the create / edit / delete / register pipeline.

mod publish;
mod reconcile;
mod tags;

pub use publish::{AuthorRegistration, PostInput, PostPublisher, PublishError, PublishOutcome};
pub use reconcile::{Resolution, ResolvedTag, TagDelta, TagOrigin, TagReconciler, compute_delta};
pub use tags::{DesiredTag, parse_tag_list, slugify};
