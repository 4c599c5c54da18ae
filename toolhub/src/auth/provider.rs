// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{
    AuthError, RequestCredentials, Session, SessionLookup, SignInCredentials, SignUpProfile,
    UpstreamAuthResponse,
};
use crate::config::AuthConfig;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, COOKIE, ORIGIN, SET_COOKIE};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

const GET_SESSION_PATH: &str = "/api/auth/get-session";
const SIGN_IN_EMAIL_PATH: &str = "/api/auth/sign-in/email";
const SIGN_UP_EMAIL_PATH: &str = "/api/auth/sign-up/email";

/// Contract of the external authentication provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Looks up the session carried by the request. An unknown or missing session is
    /// `Ok` with `session: None`; only transport and decode problems are errors.
    async fn get_session(&self, credentials: &RequestCredentials)
    -> Result<SessionLookup, AuthError>;

    async fn sign_in_email(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<UpstreamAuthResponse, AuthError>;

    async fn sign_up_email(
        &self,
        profile: &SignUpProfile,
    ) -> Result<UpstreamAuthResponse, AuthError>;
}

/// better-auth compatible HTTP client.
pub struct HttpAuthProvider {
    client: Client,
    base_url: String,
}

impl HttpAuthProvider {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .user_agent("toolhub-auth")
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|err| AuthError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_credentials<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<UpstreamAuthResponse, AuthError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header(ORIGIN, self.base_url.as_str())
            .json(payload)
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;
        capture_response(response).await
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn get_session(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<SessionLookup, AuthError> {
        if credentials.is_empty() {
            return Ok(SessionLookup::default());
        }

        let mut request = self.client.get(self.endpoint(GET_SESSION_PATH));
        if let Some(cookie) = credentials.cookie.as_deref() {
            request = request.header(COOKIE, cookie);
        }
        if let Some(authorization) = credentials.authorization.as_deref() {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;
        let captured = capture_response(response).await?;

        if captured.status == StatusCode::UNAUTHORIZED.as_u16() {
            return Ok(SessionLookup {
                session: None,
                set_cookie: captured.set_cookie,
            });
        }
        if !captured.is_success() {
            return Err(AuthError::Status(captured.status));
        }

        Ok(SessionLookup {
            session: decode_session(&captured.body)?,
            set_cookie: captured.set_cookie,
        })
    }

    async fn sign_in_email(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<UpstreamAuthResponse, AuthError> {
        self.post_credentials(SIGN_IN_EMAIL_PATH, credentials).await
    }

    async fn sign_up_email(
        &self,
        profile: &SignUpProfile,
    ) -> Result<UpstreamAuthResponse, AuthError> {
        self.post_credentials(SIGN_UP_EMAIL_PATH, profile).await
    }
}

async fn capture_response(response: Response) -> Result<UpstreamAuthResponse, AuthError> {
    let status = response.status().as_u16();
    let set_cookie = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect();
    let body = response
        .text()
        .await
        .map_err(|err| AuthError::Transport(err.to_string()))?;
    Ok(UpstreamAuthResponse {
        status,
        set_cookie,
        body,
    })
}

/// The provider answers `null` (or an empty body) when no session matches.
fn decode_session(body: &str) -> Result<Option<Session>, AuthError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<Session>>(trimmed).map_err(|err| AuthError::Decode(err.to_string()))
}
