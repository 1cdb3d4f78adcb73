//! Browser session context.
//!
//! The session token lives in an HttpOnly cookie. It is resolved into a
//! [`Session`] once per request and cached in the request extensions, so the
//! gate and the handler never hit the user store twice.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use uuid::Uuid;

use crate::{
    auth::{claims::TokenKind, repo_types::Identity, services::AuthService},
    error::AppError,
    state::AppState,
};

pub const SESSION_COOKIE: &str = "pinboard_session";

/// Explicit per-request session. Anonymous when no valid cookie was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.identity.as_ref().map(|i| i.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        if let Some(cached) = parts.extensions.get::<Session>() {
            return Ok(cached.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let identity = match session_token(&jar) {
            Some(token) => {
                AuthService::from_ref(state)
                    .current_user(token, TokenKind::Session)
                    .await?
            }
            None => None,
        };
        let session = identity.map_or_else(Session::anonymous, Session::signed_in);

        parts.extensions.insert(session.clone());
        Ok(session)
    }
}

/// Gate for protected pages: anonymous visitors are sent to `/login`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        match session.identity {
            Some(identity) => Ok(CurrentUser(identity)),
            None => Err(Redirect::to("/login").into_response()),
        }
    }
}

/// Value of the session cookie, if present. Surrounding quotes are dropped.
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(Cookie::value_trimmed)
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .secure(secure)
        .build()
}

pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    session_cookie(String::new(), Duration::ZERO, secure)
}

/// Only same-site absolute paths are accepted as post-auth targets.
pub fn safe_redirect_target(target: Option<&str>) -> &str {
    match target.map(str::trim) {
        Some(t) if t.starts_with('/') && !t.starts_with("//") && !t.contains('\\') => t,
        _ => "/app",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar(values: &[&'static str]) -> CookieJar {
        let mut headers = HeaderMap::new();
        for &value in values {
            headers.append(header::COOKIE, HeaderValue::from_static(value));
        }
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let jar = jar(&["theme=dark", "a=1; pinboard_session=tok.en.value; b=2"]);
        assert_eq!(session_token(&jar), Some("tok.en.value"));
    }

    #[test]
    fn quoted_cookie_value_is_unquoted() {
        let jar = jar(&["pinboard_session=\"abc.def.ghi\""]);
        assert_eq!(session_token(&jar), Some("abc.def.ghi"));
    }

    #[test]
    fn empty_or_missing_cookie_is_none() {
        assert_eq!(session_token(&jar(&[])), None);
        assert_eq!(session_token(&jar(&["pinboard_session="])), None);
    }

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("abc".into(), Duration::seconds(60), false);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(60)));
        assert_ne!(cookie.secure(), Some(true));

        let secure = session_cookie("abc".into(), Duration::seconds(60), true);
        assert!(secure.to_string().contains("Secure"));
        assert!(clear_session_cookie(false).to_string().contains("Max-Age=0"));
    }

    #[test]
    fn redirect_targets() {
        assert_eq!(safe_redirect_target(None), "/app");
        assert_eq!(safe_redirect_target(Some("/app/boards")), "/app/boards");
        assert_eq!(safe_redirect_target(Some("//evil.example")), "/app");
        assert_eq!(safe_redirect_target(Some("https://evil.example")), "/app");
        assert_eq!(safe_redirect_target(Some("/\\evil")), "/app");
    }
}
