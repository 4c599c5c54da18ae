// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::header::{AUTHORIZATION, COOKIE, HeaderMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User as reported by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub session: SessionRecord,
    pub user: SessionUser,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.session.expires_at <= now
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Result of a session check. The provider may rotate the session cookie while answering.
#[derive(Debug, Clone, Default)]
pub struct SessionLookup {
    pub session: Option<Session>,
    pub set_cookie: Vec<String>,
}

/// The parts of an incoming request the provider needs to identify a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCredentials {
    pub cookie: Option<String>,
    pub authorization: Option<String>,
}

impl RequestCredentials {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cookies: Vec<&str> = headers
            .get_all(COOKIE)
            .filter_map(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .collect();
        let cookie = if cookies.is_empty() {
            None
        } else {
            Some(cookies.join("; "))
        };
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Self {
            cookie,
            authorization,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cookie.is_none() && self.authorization.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpProfile {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Raw answer of a credential call, kept verbatim so cookies can be relayed.
#[derive(Debug, Clone, Default)]
pub struct UpstreamAuthResponse {
    pub status: u16,
    pub set_cookie: Vec<String>,
    pub body: String,
}

impl UpstreamAuthResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub enum AuthError {
    Transport(String),
    Status(u16),
    Decode(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Transport(msg) => write!(f, "Auth provider unreachable: {}", msg),
            AuthError::Status(status) => write!(f, "Auth provider answered HTTP {}", status),
            AuthError::Decode(msg) => write!(f, "Auth provider response invalid: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}
