// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Email sign-in and sign-up, relayed to the auth provider.

use actix_web::web;

mod helpers;
mod session;
pub mod types;

/// Configure account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/sign-in")
            .app_data(crate::api::public_form_config())
            .route(web::post().to(session::sign_in)),
    )
    .service(
        web::resource("/sign-up")
            .app_data(crate::api::public_form_config())
            .route(web::post().to(session::sign_up)),
    );
}
