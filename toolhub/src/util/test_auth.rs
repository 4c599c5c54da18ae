// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

//! Auth provider double: sessions keyed by token, scripted sign-in/sign-up answers.

use crate::auth::{
    AuthError, AuthProvider, RequestCredentials, Session, SessionLookup, SessionRecord,
    SessionUser, SignInCredentials, SignUpProfile, UpstreamAuthResponse,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub const SESSION_COOKIE: &str = "better-auth.session_token";

#[derive(Debug, Default)]
struct Script {
    sessions: HashMap<String, Session>,
    sign_in: Option<Result<UpstreamAuthResponse, AuthError>>,
    sign_up: Option<Result<UpstreamAuthResponse, AuthError>>,
    lookup_failure: Option<AuthError>,
    rotate_with: Option<String>,
    sign_in_requests: Vec<SignInCredentials>,
    sign_up_requests: Vec<SignUpProfile>,
}

#[derive(Debug, Default)]
pub struct ScriptedAuthProvider {
    script: Mutex<Script>,
}

fn token_from_cookie(cookie: &str) -> Option<&str> {
    cookie.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

pub fn session_for(token: &str, user_id: &str, name: &str, email: &str) -> Session {
    let now = Utc::now();
    Session {
        session: SessionRecord {
            id: format!("session-{}", token),
            token: token.to_string(),
            user_id: user_id.to_string(),
            expires_at: now + Duration::days(7),
            updated_at: now,
        },
        user: SessionUser {
            id: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            email_verified: true,
            image: None,
        },
    }
}

impl ScriptedAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_session(&self, session: Session) {
        self.script()
            .sessions
            .insert(session.session.token.clone(), session);
    }

    pub fn respond_to_sign_in(&self, response: Result<UpstreamAuthResponse, AuthError>) {
        self.script().sign_in = Some(response);
    }

    pub fn respond_to_sign_up(&self, response: Result<UpstreamAuthResponse, AuthError>) {
        self.script().sign_up = Some(response);
    }

    pub fn fail_lookups(&self, error: AuthError) {
        self.script().lookup_failure = Some(error);
    }

    /// Every successful lookup also returns this Set-Cookie value.
    pub fn rotate_with(&self, set_cookie: &str) {
        self.script().rotate_with = Some(set_cookie.to_string());
    }

    pub fn sign_in_requests(&self) -> Vec<SignInCredentials> {
        self.script().sign_in_requests.clone()
    }

    pub fn sign_up_requests(&self) -> Vec<SignUpProfile> {
        self.script().sign_up_requests.clone()
    }
}

fn unscripted() -> Result<UpstreamAuthResponse, AuthError> {
    Ok(UpstreamAuthResponse {
        status: 500,
        set_cookie: Vec::new(),
        body: r#"{"message":"no scripted answer"}"#.to_string(),
    })
}

#[async_trait]
impl AuthProvider for ScriptedAuthProvider {
    async fn get_session(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<SessionLookup, AuthError> {
        let script = self.script();
        if let Some(err) = &script.lookup_failure {
            return Err(err.clone());
        }
        let bearer = credentials
            .authorization
            .as_deref()
            .and_then(|value| value.strip_prefix("Bearer "));
        let token = credentials
            .cookie
            .as_deref()
            .and_then(token_from_cookie)
            .or(bearer);
        let session = token.and_then(|token| script.sessions.get(token).cloned());
        let set_cookie = match (&session, &script.rotate_with) {
            (Some(_), Some(cookie)) => vec![cookie.clone()],
            _ => Vec::new(),
        };
        Ok(SessionLookup {
            session,
            set_cookie,
        })
    }

    async fn sign_in_email(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<UpstreamAuthResponse, AuthError> {
        let mut script = self.script();
        script.sign_in_requests.push(credentials.clone());
        script.sign_in.clone().unwrap_or_else(unscripted)
    }

    async fn sign_up_email(
        &self,
        profile: &SignUpProfile,
    ) -> Result<UpstreamAuthResponse, AuthError> {
        let mut script = self.script();
        script.sign_up_requests.push(profile.clone());
        script.sign_up.clone().unwrap_or_else(unscripted)
    }
}
