use axum::extract::FromRequestParts;
use axum::http::request;
use inkstrip_core::UserId;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{InternalServerSnafu, LoginRequiredSnafu, RequestError};

pub const SESSION_KEY: &str = "user";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserSessionData {
    pub user_id: UserId,
    pub username: String,
}

async fn load_session_user<S>(
    req: &mut request::Parts,
    state: &S,
) -> Result<Option<UserSessionData>, RequestError>
where
    S: Send + Sync,
{
    let session = Session::from_request_parts(req, state)
        .await
        .map_err(|(_, msg)| InternalServerSnafu { msg }.build())?;

    session.get(SESSION_KEY).await.map_err(|_| {
        InternalServerSnafu {
            msg: "session store error",
        }
        .build()
    })
}

/// Logged in user, or a redirect to the login page coming back here
pub struct AuthenticatedUser(pub UserSessionData);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(
        req: &mut request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = load_session_user(req, state).await?.ok_or_else(|| {
            LoginRequiredSnafu {
                redirect: req.uri.path_and_query().map(|p| p.as_str().to_owned()),
            }
            .build()
        })?;

        Ok(AuthenticatedUser(user))
    }
}

pub struct OptionalUserSession(pub Option<UserSessionData>);

impl<S> FromRequestParts<S> for OptionalUserSession
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(
        req: &mut request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUserSession(load_session_user(req, state).await?))
    }
}
