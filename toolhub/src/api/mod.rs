// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::auth::AuthRequest;
use actix_web::{HttpRequest, web};

mod actions;
mod blog;
mod error;
mod pages;

pub use error::ApiError;

const MAX_FORM_BYTES: usize = 256 * 1024;

/// Body extractors run before the handler, so an anonymous caller must get
/// 401 here rather than a body error.
fn rejected_body(req: &HttpRequest, message: &str) -> ApiError {
    if req.is_authenticated() {
        ApiError::validation(message)
    } else {
        ApiError::unauthenticated()
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req: &HttpRequest| {
        log::debug!("Rejected JSON body: {}", err);
        rejected_body(req, "Invalid request body").into()
    })
}

fn form_config() -> web::FormConfig {
    web::FormConfig::default()
        .limit(MAX_FORM_BYTES)
        .error_handler(|err, req: &HttpRequest| {
            log::debug!("Rejected form body: {}", err);
            rejected_body(req, "Invalid form submission").into()
        })
}

/// Form config for routes open to anonymous callers.
pub(crate) fn public_form_config() -> web::FormConfig {
    web::FormConfig::default()
        .limit(MAX_FORM_BYTES)
        .error_handler(|err, _req: &HttpRequest| {
            log::debug!("Rejected form body: {}", err);
            ApiError::validation("Invalid form submission").into()
        })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(form_config())
        .service(
            web::scope("/api")
                .route("/session", web::get().to(pages::current_session))
                .route("/tools", web::get().to(pages::tools))
                .route("/tools/{slug}", web::get().to(pages::tool))
                .route("/blog", web::get().to(pages::blog_index))
                .route("/blog/tag/{slug}", web::get().to(pages::blog_tag))
                .route("/blog/author/{slug}", web::get().to(pages::blog_author))
                .route("/blog/{slug}", web::get().to(pages::blog_post))
                .route("/profile", web::get().to(pages::profile))
                .service(
                    web::scope("/actions")
                        .route("/like", web::post().to(actions::like))
                        .route("/save", web::post().to(actions::save))
                        .route("/comment", web::post().to(actions::comment))
                        .route("/reply", web::post().to(actions::reply))
                        .route("/review", web::post().to(actions::review))
                        .route("/newsletter", web::post().to(actions::newsletter)),
                ),
        )
        .route("/blog/write", web::post().to(blog::write_post))
        .route("/blog/register", web::post().to(blog::register_author))
        .route("/user/profile/edit", web::post().to(blog::edit_post))
        .route("/user/profile/delete", web::post().to(blog::delete_post));
}
