// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use super::ApiError;
use crate::app_state::AppState;
use crate::auth::AuthRequest;
use crate::blog::{AuthorRegistration, PostInput};

#[derive(Debug, Deserialize)]
pub struct EditPostForm {
    /// Slug of the post before the edit.
    slug: Option<String>,
    title: Option<String>,
    content: Option<String>,
    tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeletePostForm {
    slug: Option<String>,
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub async fn write_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<PostInput>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    let outcome = state
        .publisher()
        .create(&session.user.email, &form)
        .await?;
    log::info!(
        "User {} published post '{}'",
        session.user_id(),
        outcome.post.slug
    );
    Ok(see_other("/blog"))
}

pub async fn register_author(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<AuthorRegistration>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    state
        .publisher()
        .register_author(&session.user.email, &session.user.name, &form)
        .await?;
    Ok(found("/blog/write"))
}

pub async fn edit_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<EditPostForm>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    let form = form.into_inner();
    let input = PostInput {
        title: form.title,
        content: form.content,
        tags: form.tags,
    };
    state
        .publisher()
        .edit(&session.user.email, form.slug.as_deref(), &input)
        .await?;
    Ok(found("/user/profile"))
}

pub async fn delete_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<DeletePostForm>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    state
        .publisher()
        .delete(&session.user.email, form.slug.as_deref())
        .await?;
    Ok(see_other("/user/profile"))
}
