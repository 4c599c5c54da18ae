// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod cookies;
pub mod gate;
pub mod provider;
pub mod types;

pub use cookies::{CookieDefaults, propagate_cookies};
pub use gate::{AuthRequest, SessionGateFactory, resolve_session};
pub use provider::{AuthProvider, HttpAuthProvider};
pub use types::{
    AuthError, RequestCredentials, Session, SessionLookup, SessionRecord, SessionUser,
    SignInCredentials, SignUpProfile, UpstreamAuthResponse,
};
