use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use inkstrip_core::date::InvalidDateError;
use inkstrip_core::error::{BoxedError, FmtCompact as _};
use inkstrip_core::password::WeakPasswordError;
use inkstrip_db::DbError;
use snafu::Snafu;
use tracing::{debug, warn};

use crate::LOG_TARGET;

/// Why a registration or login form was refused, shown on the form
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AuthError {
    #[snafu(display("Username \"{username}\" already exists"))]
    DuplicateUsername { username: String },
    #[snafu(display("Username can't be empty"))]
    EmptyUsername,
    #[snafu(display(
        "Your password must contain a mixture of at least 8 characters: numbers, and lowercase/uppercase letters"
    ))]
    WeakPassword { source: WeakPasswordError },
    #[snafu(display("Invalid username"))]
    InvalidUsername,
    #[snafu(display("Invalid password"))]
    InvalidPassword,
    #[snafu(display("Registration is closed"))]
    RegistrationClosed,
}

/// Why a post form was refused, shown on the form
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AuthoringError {
    #[snafu(display("Invalid date"))]
    InvalidDate { source: InvalidDateError },
}

#[derive(Debug, Snafu)]
pub enum RequestError {
    #[snafu(transparent)]
    Db { source: DbError },
    #[snafu(visibility(pub(crate)))]
    Other { source: BoxedError },
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("InternalServerError: {msg}"))]
    InternalServer { msg: &'static str },
    #[snafu(visibility(pub(crate)))]
    LoginRequired { redirect: Option<String> },
}
pub type RequestResult<T> = std::result::Result<T, RequestError>;

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        debug!(
            target: LOG_TARGET,
            err = %self.fmt_compact(),
            "Request Error"
        );

        match self {
            RequestError::LoginRequired { redirect } => {
                let url = match redirect {
                    Some(ref path) => {
                        format!("/login?redirect={}", urlencoding::encode(path))
                    }
                    None => "/login".to_string(),
                };
                Redirect::to(&url).into_response()
            }
            err => {
                warn!(
                    target: LOG_TARGET,
                    err = %err.fmt_compact(),
                    "Unexpected Request Error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_owned(),
                )
                    .into_response()
            }
        }
    }
}
