// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use std::sync::Arc;
use toolhub::app_state::AppState;
use toolhub::auth::{SessionGateFactory, SessionUser};
use toolhub::config::ValidatedConfig;
use toolhub::store::MemoryStore;
use toolhub::util::{
    MemoryCms, SESSION_COOKIE, ScriptedAuthProvider, TestConfigBuilder, session_for,
};

pub const READER_TOKEN: &str = "reader-token";
pub const READER_EMAIL: &str = "reader@example.com";
pub const READER_NAME: &str = "Rita Reader";

pub const WRITER_TOKEN: &str = "writer-token";
pub const WRITER_EMAIL: &str = "writer@example.com";
pub const WRITER_NAME: &str = "Walt Writer";

pub struct TestHarness {
    pub config: Arc<ValidatedConfig>,
    pub auth: Arc<ScriptedAuthProvider>,
    pub store: Arc<MemoryStore>,
    pub cms: Arc<MemoryCms>,
}

pub struct SignedIn {
    pub token: &'static str,
    pub user: SessionUser,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(TestConfigBuilder::new().build())
    }

    pub fn with_config(config: ValidatedConfig) -> Self {
        Self {
            config: Arc::new(config),
            auth: Arc::new(ScriptedAuthProvider::new()),
            store: Arc::new(MemoryStore::new()),
            cms: Arc::new(MemoryCms::new()),
        }
    }

    pub fn app_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(
            self.config.clone(),
            self.auth.clone(),
            self.store.clone(),
            self.cms.clone(),
        ))
    }

    fn sign_in_as(&self, token: &'static str, user_id: &str, name: &str, email: &str) -> SignedIn {
        let session = session_for(token, user_id, name, email);
        let user = session.user.clone();
        self.auth.add_session(session);
        SignedIn { token, user }
    }

    pub fn reader(&self) -> SignedIn {
        self.sign_in_as(READER_TOKEN, "user-reader", READER_NAME, READER_EMAIL)
    }

    /// Signed-in user who is also a registered author.
    pub fn writer(&self) -> SignedIn {
        self.cms.seed_author(WRITER_NAME, WRITER_EMAIL);
        self.sign_in_as(WRITER_TOKEN, "user-writer", WRITER_NAME, WRITER_EMAIL)
    }
}

pub fn build_test_app(
    app_state: Arc<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let config_for_app = app_state.config.clone();

    App::new()
        .app_data(web::Data::from(config_for_app))
        .app_data(web::Data::from(app_state))
        .wrap(SessionGateFactory)
        .configure(toolhub::configure)
}

pub fn with_session(request: test::TestRequest, signed_in: &SignedIn) -> test::TestRequest {
    request.insert_header((
        header::COOKIE,
        format!("{}={}", SESSION_COOKIE, signed_in.token),
    ))
}

pub fn location(resp: &ServiceResponse) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub async fn body_text(resp: ServiceResponse) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
