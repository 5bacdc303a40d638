use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use inkstrip_core::{Post, PostId, PostNav, ViewerKind};
use maud::{Markup, html};

use super::Maud;
use super::auth::session::{OptionalUserSession, UserSessionData};
use crate::content::render_post_body;
use crate::error::RequestResult;
use crate::util::extractors::Viewer;
use crate::{SharedState, UiState};

pub async fn get_latest(
    state: State<SharedState>,
    OptionalUserSession(user): OptionalUserSession,
    Viewer(viewer): Viewer,
) -> RequestResult<Response> {
    let Some(id) = state.db.get_latest_published_id().await? else {
        return state.placeholder_page(user.as_ref()).await;
    };

    state.post_page(id, user.as_ref(), viewer).await
}

pub async fn get_post(
    state: State<SharedState>,
    Path(id): Path<String>,
    OptionalUserSession(user): OptionalUserSession,
    Viewer(viewer): Viewer,
) -> RequestResult<Response> {
    let Ok(id) = id.parse::<PostId>() else {
        return Ok(Redirect::to("/").into_response());
    };

    if !state.db.has_posts().await? {
        return state.placeholder_page(user.as_ref()).await;
    }

    state.post_page(id, user.as_ref(), viewer).await
}

pub async fn get_about(
    state: State<SharedState>,
    OptionalUserSession(user): OptionalUserSession,
) -> RequestResult<impl IntoResponse> {
    let ctx = state.page_ctx(user.as_ref()).await?;
    let content = html! {
        div ."o-about" {
            h2 { "About" }
            p {
                (ctx.site_title) " is a web comic, published one page at a time. "
                "Start from the " a href="/" { "latest page" } " and use the arrows to move around."
            }
        }
    };
    Ok(Maud(state.render_html_page(&ctx, "About", content)))
}

impl UiState {
    /// Show a published post, counting the view for anonymous visitors
    async fn post_page(
        &self,
        id: PostId,
        user: Option<&UserSessionData>,
        viewer: ViewerKind,
    ) -> RequestResult<Response> {
        let counted_as = user.is_none().then_some(viewer);
        let Some(record) = self.db.view_published_post(id, counted_as).await? else {
            return Ok(Redirect::to("/").into_response());
        };

        let nav = self.db.get_post_nav(id).await?;
        let ctx = self.page_ctx(user).await?;
        let title = record.title.clone();
        let content = render_post(&Post::new(id, record), &nav);

        Ok(Maud(self.render_html_page(&ctx, &title, content)).into_response())
    }

    async fn placeholder_page(&self, user: Option<&UserSessionData>) -> RequestResult<Response> {
        let ctx = self.page_ctx(user).await?;
        let content = render_post(&Post::placeholder(), &PostNav::default());

        Ok(Maud(self.render_html_page(&ctx, "", content)).into_response())
    }
}

fn render_post(post: &Post, nav: &PostNav) -> Markup {
    html! {
        article ."o-comic" data-post-id=(post.id) {
            @if !post.record.title.is_empty() {
                h2 ."o-comic__title" { (post.record.title) }
            }
            p ."o-comic__date" { (post.record.date.fmt_long()) }
            div ."o-comic__body" { (render_post_body(&post.record.body)) }
            (render_nav(nav))
        }
    }
}

fn render_nav(nav: &PostNav) -> Markup {
    html! {
        nav ."o-comicNav" {
            (render_nav_link("first", nav.oldest))
            (render_nav_link("previous", nav.previous))
            (render_nav_link("random", nav.random))
            (render_nav_link("next", nav.next))
            (render_nav_link("latest", nav.newest))
        }
    }
}

fn render_nav_link(label: &str, target: Option<PostId>) -> Markup {
    html! {
        @if let Some(id) = target {
            a ."o-comicNav__link" href=(format!("/{id}")) { (label) }
        } @else {
            span ."o-comicNav__link -disabled" { (label) }
        }
    }
}
