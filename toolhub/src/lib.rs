// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

pub mod account;
pub mod api;
pub mod app_state;
pub mod auth;
pub mod blog;
pub mod bootstrap;
pub mod cms;
pub mod config;
pub mod logging;
pub mod security;
pub mod store;
pub mod util;

/// Registers every route. Expects `Data<AppState>` and [`auth::SessionGateFactory`]
/// on the enclosing app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    account::configure(cfg);
    api::configure(cfg);
}
