// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::blog::PublishError;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

const UPSTREAM_MESSAGE: &str = "Internal server error";

/// Failure reported to the client as a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Unauthenticated(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    /// Detail is logged where the error is built; the client sees a generic body.
    Upstream,
    NotPublished(String),
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated("Unauthorized".to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Logs `err` with `context` and hides it from the client.
    pub fn upstream(context: &str, err: impl fmt::Display) -> Self {
        log::error!("{}: {}", context, err);
        ApiError::Upstream
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthenticated(msg)
            | ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::NotPublished(msg) => msg,
            ApiError::Upstream => UPSTREAM_MESSAGE,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream | ApiError::NotPublished(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.message().to_string())
    }
}

impl From<PublishError> for ApiError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::Validation(msg) => ApiError::Validation(msg),
            PublishError::AuthorNotFound => {
                ApiError::NotFound("Author not found. Register as an author first.".to_string())
            }
            PublishError::PostNotFound => ApiError::not_found("Post not found"),
            PublishError::SlugTaken(_) => {
                ApiError::Conflict("A post with this title already exists".to_string())
            }
            PublishError::AuthorExists => {
                ApiError::Conflict("An author profile already exists for this account".to_string())
            }
            PublishError::Upstream { step, source } => ApiError::upstream(step, source),
            PublishError::NotPublished { kind, .. } => {
                ApiError::NotPublished(format!("{} was saved but failed to publish", kind))
            }
        }
    }
}
