//! Router test helpers.

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use axum_extra::extract::cookie::Cookie;
use tower::ServiceExt;

use crate::{
    auth::{repo_types::Identity, services::AuthService, session::SESSION_COOKIE},
    state::AppState,
};
use axum::extract::FromRef;

pub const TEST_PASSWORD: &str = "correct-horse";

pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Page {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// `name=value` of a non-empty session cookie, ready for a `Cookie` header.
    pub fn session_cookie(&self) -> Option<String> {
        let cookie = Cookie::parse(self.header("set-cookie")?).ok()?;
        (cookie.name() == SESSION_COOKIE && !cookie.value().is_empty())
            .then(|| cookie.stripped().to_string())
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> Page {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    Page {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub async fn get_page(app: &Router, uri: &str, cookie: Option<&str>) -> Page {
    let mut req = Request::get(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    send(app, req.body(Body::empty()).unwrap()).await
}

pub async fn post_form(app: &Router, uri: &str, cookie: Option<&str>, body: &str) -> Page {
    let mut req = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    send(app, req.body(Body::from(body.to_string())).unwrap()).await
}

/// Registers `email` and returns its identity plus a `Cookie` header value.
pub async fn signed_in(state: &AppState, email: &str) -> (Identity, String) {
    let signed = AuthService::from_ref(state)
        .sign_up(email, TEST_PASSWORD)
        .await
        .unwrap();
    let cookie = Cookie::new(SESSION_COOKIE, signed.session_token)
        .stripped()
        .to_string();
    (signed.identity, cookie)
}
