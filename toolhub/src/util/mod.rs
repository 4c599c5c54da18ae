// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod test_auth;
pub mod test_cms;
pub mod test_config;

pub use test_auth::{SESSION_COOKIE, ScriptedAuthProvider, session_for};
pub use test_cms::{MemoryCms, TagFailure};
pub use test_config::{TestConfigBuilder, test_config};
