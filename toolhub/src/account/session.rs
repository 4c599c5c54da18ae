// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::account::types::{SignInForm, SignUpForm};
use crate::api::ApiError;
use crate::app_state::AppState;
use crate::auth::{SignInCredentials, SignUpProfile};
use crate::security::{MAX_NAME_CHARS, require_text};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use super::helpers::{INVALID_REQUEST_MESSAGE, rejection, signed_in_redirect, validated_credentials};

const WRONG_CREDENTIALS_MESSAGE: &str = "User not found or wrong credentials.";
const USER_EXISTS_MESSAGE: &str = "User already exists. Use Sign In or Social Sign In";

pub(super) async fn sign_in(
    form: web::Form<SignInForm>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let (email, password) =
        validated_credentials(form.email.as_deref(), form.password.as_deref())?;

    let upstream = app_state
        .auth
        .sign_in_email(&SignInCredentials { email, password })
        .await
        .map_err(|err| ApiError::upstream("Sign-in request failed", err))?;

    if !upstream.is_success() {
        return Err(rejection(
            "Sign-in",
            &upstream,
            &[
                (
                    StatusCode::UNAUTHORIZED,
                    ApiError::Unauthenticated(WRONG_CREDENTIALS_MESSAGE.to_string()),
                ),
                (
                    StatusCode::BAD_REQUEST,
                    ApiError::validation(INVALID_REQUEST_MESSAGE),
                ),
            ],
        ));
    }

    Ok(signed_in_redirect(&upstream, app_state.cookie_defaults()))
}

pub(super) async fn sign_up(
    form: web::Form<SignUpForm>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let first = require_text("First name", form.firstname.as_deref(), MAX_NAME_CHARS)
        .map_err(ApiError::Validation)?;
    let last = form.lastname.as_deref().map(str::trim).unwrap_or_default();
    let name = format!("{} {}", first, last).trim().to_string();
    let (email, password) =
        validated_credentials(form.email.as_deref(), form.password.as_deref())?;

    let upstream = app_state
        .auth
        .sign_up_email(&SignUpProfile {
            name,
            email,
            password,
        })
        .await
        .map_err(|err| ApiError::upstream("Sign-up request failed", err))?;

    if !upstream.is_success() {
        return Err(rejection(
            "Sign-up",
            &upstream,
            &[
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiError::Conflict(USER_EXISTS_MESSAGE.to_string()),
                ),
                (
                    StatusCode::BAD_REQUEST,
                    ApiError::validation(INVALID_REQUEST_MESSAGE),
                ),
            ],
        ));
    }

    Ok(signed_in_redirect(&upstream, app_state.cookie_defaults()))
}
