use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use inkstrip_core::ViewerKind;

/// Who is asking, judging by the `User-Agent` header
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub ViewerKind);

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok());

        Ok(Viewer(ViewerKind::from_user_agent(user_agent)))
    }
}
