// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use super::ApiError;
use crate::app_state::AppState;
use crate::auth::AuthRequest;
use crate::security::{MAX_BODY_CHARS, MAX_TITLE_CHARS, require_text, validate_email_field};
use crate::store::{NewComment, NewReview, NewSave};

const MAX_ID_CHARS: usize = 128;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    post_id: Option<String>,
    action: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    post_id: Option<String>,
    post_title: Option<String>,
    post_slug: Option<String>,
    action: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    post_id: Option<String>,
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    post_id: Option<String>,
    parent_comment_id: Option<String>,
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    title: Option<String>,
    content: Option<String>,
    tool_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    email: Option<String>,
}

fn required(label: &str, value: Option<&str>, max_chars: usize) -> Result<String, ApiError> {
    require_text(label, value, max_chars).map_err(ApiError::Validation)
}

fn ok() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("OK")
}

fn created(message: &'static str) -> HttpResponse {
    HttpResponse::Created()
        .content_type("text/plain; charset=utf-8")
        .body(message)
}

pub async fn like(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<LikeRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    let post_id = required("postId", payload.post_id.as_deref(), MAX_ID_CHARS)?;
    let user_id = session.user_id();

    match payload.action.as_deref().map(str::trim) {
        Some("like") => {
            let inserted = state
                .store
                .insert_like(user_id, &post_id)
                .await
                .map_err(|err| ApiError::upstream("Like insert failed", err))?;
            if !inserted {
                log::debug!("User {} already likes post {}", user_id, post_id);
            }
        }
        Some("unlike") => {
            state
                .store
                .delete_like(user_id, &post_id)
                .await
                .map_err(|err| ApiError::upstream("Like delete failed", err))?;
        }
        None | Some("") => return Err(ApiError::validation("action is required")),
        Some(_) => return Err(ApiError::validation("Invalid action")),
    }
    Ok(ok())
}

pub async fn save(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<SaveRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    let post_id = required("postId", payload.post_id.as_deref(), MAX_ID_CHARS)?;
    let user_id = session.user_id();

    match payload.action.as_deref().map(str::trim) {
        Some("save") => {
            let save = NewSave {
                user_id: user_id.to_string(),
                post_id,
                post_title: required("postTitle", payload.post_title.as_deref(), MAX_TITLE_CHARS)?,
                post_slug: required("postSlug", payload.post_slug.as_deref(), MAX_TITLE_CHARS)?,
            };
            state
                .store
                .insert_save(&save)
                .await
                .map_err(|err| ApiError::upstream("Save insert failed", err))?;
        }
        Some("unsave") => {
            state
                .store
                .delete_save(user_id, &post_id)
                .await
                .map_err(|err| ApiError::upstream("Save delete failed", err))?;
        }
        None | Some("") => return Err(ApiError::validation("action is required")),
        Some(_) => return Err(ApiError::validation("Invalid action")),
    }
    Ok(ok())
}

pub async fn comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    let post_id = required("postId", payload.post_id.as_deref(), MAX_ID_CHARS)?;
    let content = required("comment", payload.comment.as_deref(), MAX_BODY_CHARS)?;

    let comment = state
        .store
        .insert_comment(&NewComment {
            user_id: session.user.id.clone(),
            user_full_name: session.user.name.clone(),
            post_id,
            parent_comment_id: None,
            content,
        })
        .await
        .map_err(|err| ApiError::upstream("Comment insert failed", err))?;
    log::debug!("Comment {} created on post {}", comment.id, comment.post_id);
    Ok(created("Comment created successfully"))
}

pub async fn reply(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<ReplyRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    let post_id = required("postId", payload.post_id.as_deref(), MAX_ID_CHARS)?;
    let parent_id = required(
        "parentCommentId",
        payload.parent_comment_id.as_deref(),
        MAX_ID_CHARS,
    )?;
    let content = required("comment", payload.comment.as_deref(), MAX_BODY_CHARS)?;

    let parent = state
        .store
        .find_comment(&parent_id, &post_id)
        .await
        .map_err(|err| ApiError::upstream("Parent comment lookup failed", err))?;
    if parent.is_none() {
        return Err(ApiError::not_found("Parent comment not found"));
    }

    state
        .store
        .insert_comment(&NewComment {
            user_id: session.user.id.clone(),
            user_full_name: session.user.name.clone(),
            post_id,
            parent_comment_id: Some(parent_id),
            content,
        })
        .await
        .map_err(|err| ApiError::upstream("Reply insert failed", err))?;
    Ok(created("Reply created successfully"))
}

pub async fn review(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<ReviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    let review = NewReview {
        user_id: session.user.id.clone(),
        user_full_name: session.user.name.clone(),
        tool_id: required("toolId", payload.tool_id.as_deref(), MAX_ID_CHARS)?,
        title: required("title", payload.title.as_deref(), MAX_TITLE_CHARS)?,
        content: required("content", payload.content.as_deref(), MAX_BODY_CHARS)?,
    };

    state
        .store
        .insert_review(&review)
        .await
        .map_err(|err| ApiError::upstream("Review insert failed", err))?;
    Ok(created("Review created successfully"))
}

pub async fn newsletter(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<NewsletterRequest>,
) -> Result<HttpResponse, ApiError> {
    req.require_session()?;
    let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
    validate_email_field(email).map_err(ApiError::Validation)?;

    let subscribed = state
        .store
        .subscribe_newsletter(&email.to_lowercase())
        .await
        .map_err(|err| ApiError::upstream("Newsletter insert failed", err))?;
    if subscribed {
        log::info!("Newsletter subscription added");
    }
    Ok(ok())
}
