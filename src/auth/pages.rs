//! Login, signup and logout screens.

use axum::{
    extract::{FromRef, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use minijinja::context;
use time::Duration;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AuthForm, RedirectQuery},
        services::{AuthError, AuthService, SignedIn},
        session::{clear_session_cookie, safe_redirect_target, session_cookie, Session},
    },
    error::AppError,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", post(logout))
}

#[derive(Clone, Copy)]
enum Screen {
    Login,
    Signup,
}

impl Screen {
    fn render(
        self,
        state: &AppState,
        form: &AuthForm,
        error: Option<String>,
    ) -> Result<Response, AppError> {
        let (heading, action, submit) = match self {
            Screen::Login => ("Sign in", "/login", "Sign in"),
            Screen::Signup => ("Create your account", "/signup", "Create account"),
        };
        let status = if error.is_some() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::OK
        };
        let html = state.templates.render(
            "auth.html",
            context! {
                heading,
                action,
                submit,
                signup => matches!(self, Screen::Signup),
                email => form.email,
                redirect => form.redirect,
                error,
            },
        )?;
        Ok((status, html).into_response())
    }
}

pub async fn root(session: Session) -> Redirect {
    if session.is_signed_in() {
        Redirect::to("/app")
    } else {
        Redirect::to("/login")
    }
}

#[instrument(skip(state, session))]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    Query(q): Query<RedirectQuery>,
) -> Result<Response, AppError> {
    if session.is_signed_in() {
        return Ok(Redirect::to("/app").into_response());
    }
    let form = AuthForm {
        redirect: q.redirect,
        ..AuthForm::default()
    };
    Screen::Login.render(&state, &form, None)
}

#[instrument(skip(state, session))]
pub async fn signup_page(
    State(state): State<AppState>,
    session: Session,
    Query(q): Query<RedirectQuery>,
) -> Result<Response, AppError> {
    if session.is_signed_in() {
        return Ok(Redirect::to("/app").into_response());
    }
    let form = AuthForm {
        redirect: q.redirect,
        ..AuthForm::default()
    };
    Screen::Signup.render(&state, &form, None)
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<AuthForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::from_ref(&state);
    let result = auth.sign_in(&form.email, &form.password).await;
    finish(&state, &auth, Screen::Login, form, result)
}

#[instrument(skip(state, form))]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<AuthForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::from_ref(&state);
    let result = auth.sign_up(&form.email, &form.password).await;
    finish(&state, &auth, Screen::Signup, form, result)
}

/// Sets the session cookie and follows the redirect target, or re-renders the
/// form with the failure message.
fn finish(
    state: &AppState,
    auth: &AuthService,
    screen: Screen,
    form: AuthForm,
    result: Result<SignedIn, AuthError>,
) -> Result<Response, AppError> {
    match result {
        Ok(signed) => {
            let max_age = Duration::try_from(auth.keys().session_ttl())
                .map_err(|e| AppError::Internal(e.into()))?;
            let jar = CookieJar::new().add(session_cookie(
                signed.session_token,
                max_age,
                state.config.cookie_secure,
            ));
            let target = safe_redirect_target(form.redirect.as_deref());
            info!(user_id = %signed.identity.id, %target, "session started");
            Ok((jar, Redirect::to(target)).into_response())
        }
        Err(AuthError::Internal(e)) => Err(AppError::Internal(e)),
        Err(e) => screen.render(state, &form, Some(e.to_string())),
    }
}

#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Some(user_id) = session.user_id() {
        info!(%user_id, "session ended");
    }
    (
        CookieJar::new().add(clear_session_cookie(state.config.cookie_secure)),
        [(header::CACHE_CONTROL, "no-store")],
        Redirect::to("/login"),
    )
        .into_response()
}
