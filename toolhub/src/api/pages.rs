// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! JSON loaders backing the tools, blog and profile pages.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use super::ApiError;
use crate::app_state::AppState;
use crate::auth::{AuthRequest, SessionUser};
use crate::cms::{AuthorProfile, PostDetail, PostSummary, Tool};
use crate::store::{Comment, Review, Save};

#[derive(Serialize)]
struct ToolPage {
    tool: Tool,
    reviews: Vec<Review>,
}

#[derive(Serialize)]
struct BlogIndex {
    posts: Vec<PostSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostPage {
    post: PostDetail,
    comments: Vec<Comment>,
    like_count: u64,
    liked: bool,
    saved: bool,
}

#[derive(Serialize)]
struct ProfilePage {
    user: SessionUser,
    author: Option<AuthorProfile>,
    saves: Vec<Save>,
}

pub async fn current_session(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(req.session().map(|session| session.user))
}

pub async fn tools(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let overview = state
        .cms
        .tools_overview()
        .await
        .map_err(|err| ApiError::upstream("Tools query failed", err))?;
    Ok(HttpResponse::Ok().json(overview))
}

pub async fn tool(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let tool = state
        .cms
        .get_tool(&slug)
        .await
        .map_err(|err| ApiError::upstream("Tool query failed", err))?
        .ok_or_else(|| ApiError::not_found("Tool not found"))?;
    let reviews = state
        .store
        .list_reviews(&tool.id)
        .await
        .map_err(|err| ApiError::upstream("Review query failed", err))?;
    Ok(HttpResponse::Ok().json(ToolPage { tool, reviews }))
}

pub async fn blog_index(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let posts = state
        .cms
        .list_posts()
        .await
        .map_err(|err| ApiError::upstream("Post list query failed", err))?;
    Ok(HttpResponse::Ok().json(BlogIndex { posts }))
}

pub async fn blog_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let post = state
        .cms
        .get_post(&slug)
        .await
        .map_err(|err| ApiError::upstream("Post query failed", err))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let store = &state.store;
    let comments = store
        .list_comments(&post.id)
        .await
        .map_err(|err| ApiError::upstream("Comment query failed", err))?;
    let like_count = store
        .count_likes(&post.id)
        .await
        .map_err(|err| ApiError::upstream("Like count failed", err))?;

    let (liked, saved) = match req.session() {
        Some(session) => {
            let liked = store
                .has_like(session.user_id(), &post.id)
                .await
                .map_err(|err| ApiError::upstream("Like lookup failed", err))?;
            let saved = store
                .has_save(session.user_id(), &post.id)
                .await
                .map_err(|err| ApiError::upstream("Save lookup failed", err))?;
            (liked, saved)
        }
        None => (false, false),
    };

    Ok(HttpResponse::Ok().json(PostPage {
        post,
        comments,
        like_count,
        liked,
        saved,
    }))
}

pub async fn blog_tag(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let tag = state
        .cms
        .tag_with_posts(&slug)
        .await
        .map_err(|err| ApiError::upstream("Tag query failed", err))?
        .ok_or_else(|| ApiError::not_found("Tag not found"))?;
    Ok(HttpResponse::Ok().json(tag))
}

pub async fn blog_author(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let author = state
        .cms
        .author_with_posts(&slug)
        .await
        .map_err(|err| ApiError::upstream("Author query failed", err))?
        .ok_or_else(|| ApiError::not_found("Author not found"))?;
    Ok(HttpResponse::Ok().json(author))
}

pub async fn profile(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let session = req.require_session()?;
    let author = state
        .cms
        .author_profile(&session.user.email)
        .await
        .map_err(|err| ApiError::upstream("Author profile query failed", err))?;
    let saves = state
        .store
        .list_saves(session.user_id())
        .await
        .map_err(|err| ApiError::upstream("Saved posts query failed", err))?;

    Ok(HttpResponse::Ok().json(ProfilePage {
        user: session.user,
        author,
        saves,
    }))
}
