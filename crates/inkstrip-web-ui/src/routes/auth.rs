pub mod session;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use inkstrip_core::password::check_password_strength;
use inkstrip_db::InsertUserOutcome;
use maud::{Markup, html};
use serde::Deserialize;
use session::{OptionalUserSession, SESSION_KEY, UserSessionData};
use snafu::ResultExt as _;
use tower_sessions::Session;
use tracing::info;

use super::Maud;
use crate::error::{
    AuthError, DuplicateUsernameSnafu, EmptyUsernameSnafu, InvalidPasswordSnafu,
    InvalidUsernameSnafu, OtherSnafu, RegistrationClosedSnafu, RequestResult, WeakPasswordSnafu,
};
use crate::serde_util::empty_string_as_none;
use crate::{LOG_TARGET, SharedState, UiState};

const DEFAULT_LOGIN_REDIRECT: &str = "/admin";

#[derive(Deserialize)]
pub struct RedirectQuery {
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    redirect: Option<String>,
}

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    redirect: Option<String>,
}

/// Only same-site paths, so the login form can't bounce users elsewhere
fn local_redirect_target(redirect: Option<String>) -> String {
    redirect
        .filter(|p| p.starts_with('/') && !p.starts_with("//"))
        .unwrap_or_else(|| DEFAULT_LOGIN_REDIRECT.to_string())
}

async fn hash_password(password: String) -> RequestResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
    })
    .await
    .boxed()
    .context(OtherSnafu)?
    .boxed()
    .context(OtherSnafu)
}

async fn verify_password(password: String, password_hash: String) -> RequestResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&password_hash)?;
        Ok::<_, argon2::password_hash::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
        )
    })
    .await
    .boxed()
    .context(OtherSnafu)?
    .boxed()
    .context(OtherSnafu)
}

async fn start_user_session(session: &Session, user: &UserSessionData) -> RequestResult<()> {
    session.cycle_id().await.boxed().context(OtherSnafu)?;
    session
        .insert(SESSION_KEY, user)
        .await
        .boxed()
        .context(OtherSnafu)?;
    Ok(())
}

pub async fn get_register(
    state: State<SharedState>,
    OptionalUserSession(user): OptionalUserSession,
) -> RequestResult<impl IntoResponse> {
    Ok(Maud(state.register_page(user.as_ref(), "", None).await?))
}

pub async fn post_register(
    state: State<SharedState>,
    OptionalUserSession(user): OptionalUserSession,
    session: Session,
    Form(form): Form<Credentials>,
) -> RequestResult<Response> {
    match state.register(&form.username, form.password).await? {
        Ok(new_user) => {
            start_user_session(&session, &new_user).await?;
            Ok(Redirect::to(DEFAULT_LOGIN_REDIRECT).into_response())
        }
        Err(err) => Ok(Maud(
            state
                .register_page(user.as_ref(), &form.username, Some(err))
                .await?,
        )
        .into_response()),
    }
}

pub async fn get_login(
    state: State<SharedState>,
    OptionalUserSession(user): OptionalUserSession,
    Query(query): Query<RedirectQuery>,
) -> RequestResult<Response> {
    if !state.db.has_users().await? {
        return Ok(Redirect::to("/register").into_response());
    }

    Ok(Maud(
        state
            .login_page(user.as_ref(), "", None, query.redirect.as_deref())
            .await?,
    )
    .into_response())
}

pub async fn post_login(
    state: State<SharedState>,
    OptionalUserSession(user): OptionalUserSession,
    session: Session,
    Form(form): Form<Credentials>,
) -> RequestResult<Response> {
    if !state.db.has_users().await? {
        return Ok(Redirect::to("/register").into_response());
    }

    match state.login(&form.username, form.password).await? {
        Ok(logged_in) => {
            start_user_session(&session, &logged_in).await?;
            Ok(Redirect::to(&local_redirect_target(form.redirect)).into_response())
        }
        Err(err) => Ok(Maud(
            state
                .login_page(
                    user.as_ref(),
                    &form.username,
                    Some(err),
                    form.redirect.as_deref(),
                )
                .await?,
        )
        .into_response()),
    }
}

pub async fn logout(session: Session) -> RequestResult<impl IntoResponse> {
    session.flush().await.boxed().context(OtherSnafu)?;

    Ok(Redirect::to("/"))
}

impl UiState {
    /// Create an account
    ///
    /// The outer result is for internal failures, the inner one for
    /// refusals to show on the form.
    async fn register(
        &self,
        username: &str,
        password: String,
    ) -> RequestResult<Result<UserSessionData, AuthError>> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(EmptyUsernameSnafu.fail());
        }
        if !self.opts.allow_registration && self.db.has_users().await? {
            return Ok(RegistrationClosedSnafu.fail());
        }
        if self.db.get_user(username).await?.is_some() {
            return Ok(DuplicateUsernameSnafu { username }.fail());
        }
        if let Err(err) = check_password_strength(&password).context(WeakPasswordSnafu) {
            return Ok(Err(err));
        }

        let password_hash = hash_password(password).await?;

        match self.db.insert_user(username, password_hash).await? {
            InsertUserOutcome::Inserted(user_id) => {
                info!(target: LOG_TARGET, %user_id, %username, "Registered");
                Ok(Ok(UserSessionData {
                    user_id,
                    username: username.to_owned(),
                }))
            }
            InsertUserOutcome::AlreadyExists => Ok(DuplicateUsernameSnafu { username }.fail()),
        }
    }

    async fn login(
        &self,
        username: &str,
        password: String,
    ) -> RequestResult<Result<UserSessionData, AuthError>> {
        let username = username.trim();
        let Some(user) = self.db.get_user(username).await? else {
            return Ok(InvalidUsernameSnafu.fail());
        };

        if !verify_password(password, user.password_hash).await? {
            return Ok(InvalidPasswordSnafu.fail());
        }

        info!(target: LOG_TARGET, user_id = %user.id, %username, "Logged in");
        Ok(Ok(UserSessionData {
            user_id: user.id,
            username: username.to_owned(),
        }))
    }

    async fn register_page(
        &self,
        user: Option<&session::UserSessionData>,
        username: &str,
        notice: Option<AuthError>,
    ) -> RequestResult<Markup> {
        let ctx = self.page_ctx(user).await?;
        let closed = !self.opts.allow_registration && self.db.has_users().await?;
        let content = html! {
            div ."o-authForm" {
                h2 { "Register" }
                @if closed {
                    p ."o-notice" { "Registration is closed." }
                } @else {
                    (render_credentials_form("/register", "Register", username, notice.as_ref(), None))
                }
            }
        };
        Ok(self.render_html_page(&ctx, "Register", content))
    }

    async fn login_page(
        &self,
        user: Option<&session::UserSessionData>,
        username: &str,
        notice: Option<AuthError>,
        redirect: Option<&str>,
    ) -> RequestResult<Markup> {
        let ctx = self.page_ctx(user).await?;
        let content = html! {
            div ."o-authForm" {
                h2 { "Login" }
                (render_credentials_form("/login", "Login", username, notice.as_ref(), redirect))
            }
        };
        Ok(self.render_html_page(&ctx, "Login", content))
    }
}

fn render_credentials_form(
    action: &str,
    submit_label: &str,
    username: &str,
    notice: Option<&AuthError>,
    redirect: Option<&str>,
) -> Markup {
    html! {
        form ."o-authForm__form" action=(action) method="post" autocomplete="on" {
            @if let Some(notice) = notice {
                p ."o-authForm__error" { (notice) }
            }
            @if let Some(redirect) = redirect {
                input type="hidden" name="redirect" value=(redirect);
            }
            label {
                "Username"
                input type="text" name="username" autocomplete="username" value=(username);
            }
            label {
                "Password"
                input type="password" name="password" autocomplete="current-password";
            }
            button type="submit" ."u-button" { (submit_label) }
        }
    }
}
