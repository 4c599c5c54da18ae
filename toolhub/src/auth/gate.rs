// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::web::Data;
use actix_web::{HttpMessage, HttpRequest};
use chrono::Utc;
use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use super::cookies::propagate_cookies;
use super::provider::AuthProvider;
use super::types::{RequestCredentials, Session, SessionLookup};
use crate::api::ApiError;
use crate::app_state::AppState;

/// Session access for handlers running behind [`SessionGateFactory`].
pub trait AuthRequest {
    fn session(&self) -> Option<Session>;

    /// The session, or `ApiError::Unauthenticated` for anonymous requests.
    fn require_session(&self) -> Result<Session, ApiError>;

    fn is_authenticated(&self) -> bool;
}

impl AuthRequest for HttpRequest {
    fn session(&self) -> Option<Session> {
        self.extensions().get::<Session>().cloned()
    }

    fn require_session(&self) -> Result<Session, ApiError> {
        self.session().ok_or_else(ApiError::unauthenticated)
    }

    fn is_authenticated(&self) -> bool {
        self.extensions().get::<Session>().is_some()
    }
}

/// Asks the provider for the session behind `credentials`.
/// Provider failures and expired sessions both count as "no session".
pub async fn resolve_session(
    provider: &dyn AuthProvider,
    credentials: &RequestCredentials,
) -> SessionLookup {
    if credentials.is_empty() {
        return SessionLookup::default();
    }

    match provider.get_session(credentials).await {
        Ok(SessionLookup {
            session: Some(session),
            set_cookie,
        }) if session.is_expired_at(Utc::now()) => {
            log::debug!(
                "Ignoring expired session {} for user {}",
                session.session.id,
                session.user.id
            );
            SessionLookup {
                session: None,
                set_cookie,
            }
        }
        Ok(lookup) => lookup,
        Err(err) => {
            log::warn!("Session lookup failed, continuing anonymously: {}", err);
            SessionLookup::default()
        }
    }
}

pub struct SessionGateFactory;

impl<S, B> Transform<S, ServiceRequest> for SessionGateFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGate<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGate {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionGate<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionGate<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let app_state = req.app_data::<Data<AppState>>().cloned();
        let service = self.service.clone();

        Box::pin(async move {
            let mut rotated = Vec::new();

            if let Some(state) = app_state {
                let credentials = RequestCredentials::from_headers(req.headers());
                let lookup = resolve_session(state.auth.as_ref(), &credentials).await;
                if let Some(session) = lookup.session {
                    req.extensions_mut().insert(session);
                }
                if !lookup.set_cookie.is_empty() {
                    rotated = propagate_cookies(&lookup.set_cookie, state.cookie_defaults());
                }
            }

            let mut res = service.call(req).await?;

            // The provider may rotate the session cookie on lookup; relay it.
            for cookie in &rotated {
                res.response_mut().add_cookie(cookie).map_err(|e| {
                    log::error!("Failed to relay session cookie {}: {}", cookie.name(), e);
                    actix_web::error::ErrorInternalServerError("Failed to set session cookie")
                })?;
            }

            Ok(res)
        })
    }
}
