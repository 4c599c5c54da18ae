// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::account::types::UpstreamErrorBody;
use crate::api::ApiError;
use crate::auth::{CookieDefaults, UpstreamAuthResponse, propagate_cookies};
use crate::security::{validate_email_field, validate_password_field};
use actix_web::HttpResponse;
use actix_web::http::{StatusCode, header};

pub(super) const INVALID_REQUEST_MESSAGE: &str = "Invalid email format or request.";

/// Trimmed email and raw password, or a 400.
pub(super) fn validated_credentials(
    email: Option<&str>,
    password: Option<&str>,
) -> Result<(String, String), ApiError> {
    let email = email.map(str::trim).unwrap_or_default();
    validate_email_field(email).map_err(ApiError::Validation)?;
    let password = password.unwrap_or_default();
    validate_password_field(password).map_err(ApiError::Validation)?;
    Ok((email.to_string(), password.to_string()))
}

fn upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<UpstreamErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
}

/// Maps a non-success provider answer. Statuses listed in `known` are user errors;
/// anything else is an upstream failure.
pub(super) fn rejection(
    context: &str,
    upstream: &UpstreamAuthResponse,
    known: &[(StatusCode, ApiError)],
) -> ApiError {
    let detail = upstream_message(&upstream.body).unwrap_or_default();
    if let Some((_, err)) = known
        .iter()
        .find(|(status, _)| status.as_u16() == upstream.status)
    {
        log::warn!("{} rejected by auth provider ({}): {}", context, upstream.status, detail);
        return err.clone();
    }
    ApiError::upstream(
        &format!("{} failed", context),
        format!("auth provider answered HTTP {} {}", upstream.status, detail),
    )
}

/// Relays the provider's session cookies and sends the client home.
pub(super) fn signed_in_redirect(
    upstream: &UpstreamAuthResponse,
    defaults: CookieDefaults,
) -> HttpResponse {
    let mut response = HttpResponse::Found();
    response.insert_header((header::LOCATION, "/"));
    for cookie in propagate_cookies(&upstream.set_cookie, defaults) {
        response.cookie(cookie);
    }
    response.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16, body: &str) -> UpstreamAuthResponse {
        UpstreamAuthResponse {
            status,
            set_cookie: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn credentials_are_validated_locally() {
        assert!(validated_credentials(Some(" ada@example.com "), Some("long-enough")).is_ok());
        assert!(matches!(
            validated_credentials(Some("not-an-email"), Some("long-enough")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validated_credentials(Some("ada@example.com"), Some("short")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validated_credentials(None, None),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn known_statuses_become_user_errors() {
        let known = [(
            StatusCode::UNAUTHORIZED,
            ApiError::Unauthenticated("nope".to_string()),
        )];
        let err = rejection("Sign-in", &upstream(401, r#"{"message":"Invalid"}"#), &known);
        assert_eq!(err, ApiError::Unauthenticated("nope".to_string()));
        let err = rejection("Sign-in", &upstream(503, "unavailable"), &known);
        assert_eq!(err, ApiError::Upstream);
    }

    #[test]
    fn redirect_carries_every_directive() {
        let response = signed_in_redirect(
            &UpstreamAuthResponse {
                status: 200,
                set_cookie: vec![
                    "better-auth.session_token=abc.def; Path=/; HttpOnly".to_string(),
                    "better-auth.session_data=xyz; Max-Age=300".to_string(),
                ],
                body: String::new(),
            },
            CookieDefaults { secure: false },
        );
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        let names: Vec<String> = response
            .cookies()
            .map(|cookie| cookie.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["better-auth.session_token", "better-auth.session_data"]
        );
    }
}
