mod admin;
pub(crate) mod auth;
mod comic;
mod edit;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::{self, CONTENT_TYPE, HOST};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use maud::{Markup, html};
use tower_http::services::{ServeDir, ServeFile};

use super::SharedState;
use crate::error::RequestResult;
use crate::routes::auth::session::OptionalUserSession;
use crate::util::extractors::IsSecure;

#[derive(Clone, Debug)]
#[must_use]
pub struct Maud(pub Markup);

impl IntoResponse for Maud {
    fn into_response(self) -> Response {
        (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            )],
            self.0.0,
        )
            .into_response()
    }
}

pub async fn cache_control(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
        const NON_CACHEABLE_CONTENT_TYPES: &[&str] = &["text/html"];
        const SHORT_CACHE_CONTENT_TYPES: &[&str] = &["text/css"];

        let cache_duration_secs = if SHORT_CACHE_CONTENT_TYPES
            .iter()
            .any(|&ct| content_type.as_bytes().starts_with(ct.as_bytes()))
        {
            Some(10 * 60)
        } else if NON_CACHEABLE_CONTENT_TYPES
            .iter()
            .any(|&ct| content_type.as_bytes().starts_with(ct.as_bytes()))
        {
            None
        } else {
            Some(60 * 60)
        };

        if let Some(dur) = cache_duration_secs {
            let value = format!("public, max-age={dur}");

            response.headers_mut().insert(
                "cache-control",
                HeaderValue::from_str(&value).expect("Can't fail"),
            );
        } else {
            response
                .headers_mut()
                .insert("cache-control", HeaderValue::from_static("no-store"));
        }
    }

    response
}

/// Send `www.` hosts to the bare domain, same path
pub async fn redirect_www(request: Request, next: Next) -> Response {
    let bare_host = request
        .headers()
        .get(HOST)
        .and_then(|host| host.to_str().ok())
        .and_then(|host| host.strip_prefix("www."))
        .filter(|bare| !bare.is_empty());

    if let Some(bare_host) = bare_host {
        let scheme = IsSecure::from_headers(request.headers()).scheme();
        let path = request
            .uri()
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or("/");
        return Redirect::permanent(&format!("{scheme}://{bare_host}{path}")).into_response();
    }

    next.run(request).await
}

pub async fn not_found(
    state: State<SharedState>,
    OptionalUserSession(user): OptionalUserSession,
) -> RequestResult<impl IntoResponse> {
    let ctx = state.page_ctx(user.as_ref()).await?;
    Ok((
        StatusCode::NOT_FOUND,
        Maud(state.render_html_page(
            &ctx,
            "Not Found",
            html! {
                div ."o-notice" {
                    h2 { "Not Found" }
                    p { "There is no page here. " a href="/" { "Back to the comic" } }
                }
            },
        )),
    ))
}

pub fn route_handler(state: SharedState) -> Router {
    let static_dir = state.opts.static_dir.clone();

    Router::new()
        .route("/", get(comic::get_latest))
        .route("/about", get(comic::get_about))
        .route(
            "/register",
            get(auth::get_register).post(auth::post_register),
        )
        .route("/login", get(auth::get_login).post(auth::post_login))
        .route("/logout", get(auth::logout))
        .route("/admin", get(admin::get_admin).post(admin::post_admin))
        .route("/edit/{id}", get(edit::get_edit).post(edit::post_edit))
        .route_service("/robots.txt", ServeFile::new(static_dir.join("robots.txt")))
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/{id}", get(comic::get_post))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(cache_control))
        .layer(middleware::from_fn(redirect_www))
}
