use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Extractor that returns `true` if a fronting proxy reports https
///
/// The server itself only speaks plain http, so `X-Forwarded-Proto` is the
/// only signal honoured.
#[derive(Debug, Clone, Copy)]
pub struct IsSecure(pub bool);

impl IsSecure {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        IsSecure(
            headers
                .get("X-Forwarded-Proto")
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("https")),
        )
    }

    pub fn scheme(self) -> &'static str {
        if self.0 { "https" } else { "http" }
    }
}

impl<S> FromRequestParts<S> for IsSecure
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
