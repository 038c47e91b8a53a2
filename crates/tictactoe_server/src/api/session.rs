//! Cookie-backed client sessions.

use super::AppState;
use crate::store::{GameStore, SessionId};
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use std::convert::Infallible;
use tracing::warn;

/// The calling client's session, resolved from its cookie.
#[derive(Debug, Clone)]
pub struct ClientSession {
    /// Session identifier.
    pub id: SessionId,
    /// The session's games.
    pub games: GameStore,
    set_cookie: Option<HeaderValue>,
}

impl ClientSession {
    /// Response part that hands a newly issued session to the client.
    pub fn cookie(&self) -> SessionCookie {
        SessionCookie(self.set_cookie.clone())
    }
}

impl FromRequestParts<AppState> for ClientSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let name = state.config.session_cookie();
        let presented = cookie_value(&parts.headers, name);
        let attached = state.sessions.attach(presented.as_deref());

        let set_cookie = if attached.issued {
            let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, attached.id);
            HeaderValue::from_str(&cookie)
                .inspect_err(|e| warn!(error = %e, "Session cookie is not a valid header"))
                .ok()
        } else {
            None
        };

        Ok(Self {
            id: attached.id,
            games: attached.games,
            set_cookie,
        })
    }
}

/// `Set-Cookie` for a newly issued session; empty for a resumed one.
#[derive(Debug, Clone)]
pub struct SessionCookie(Option<HeaderValue>);

impl IntoResponseParts for SessionCookie {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(value) = self.0 {
            res.headers_mut().append(SET_COOKIE, value);
        }
        Ok(res)
    }
}

/// Value of the cookie called `name`, if the request carries one.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}
