use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use inkstrip_core::site::{SETTING_BANNER_URL, SETTING_SITE_TITLE, upgrade_insecure_scheme};
use inkstrip_core::{Post, PostDate, PostId, PostRecord};
use maud::{Markup, html};
use serde::Deserialize;
use snafu::ResultExt as _;
use tracing::info;

use super::Maud;
use super::auth::session::AuthenticatedUser;
use crate::error::{AuthoringError, InvalidDateSnafu, RequestResult};
use crate::serde_util::empty_string_as_none;
use crate::util::extractors::IsSecure;
use crate::{LOG_TARGET, SharedState, UiState};

#[derive(Deserialize)]
pub struct SwapQuery {
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    pid1: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    pid2: Option<String>,
}

pub async fn get_admin(
    state: State<SharedState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Query(query): Query<SwapQuery>,
) -> RequestResult<Response> {
    if let (Some(pid1), Some(pid2)) = (query.pid1, query.pid2) {
        // Unparsable ids are ignored like missing posts
        if let (Ok(id1), Ok(id2)) = (pid1.parse::<PostId>(), pid2.parse::<PostId>()) {
            state.db.swap_posts(id1, id2).await?;
        }
        return Ok(Redirect::to("/admin").into_response());
    }

    Ok(Maud(state.admin_page(None, &NewPostDraft::default()).await?).into_response())
}

/// Everything the admin page can submit
#[derive(Deserialize)]
pub struct AdminForm {
    banner_url: Option<String>,
    site_title: Option<String>,
    #[serde(default)]
    date: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

pub enum AdminAction {
    UpdateSettings {
        banner_url: Option<String>,
        site_title: Option<String>,
    },
    CreatePost(NewPostDraft),
}

impl From<AdminForm> for AdminAction {
    fn from(form: AdminForm) -> Self {
        if form.banner_url.is_some() || form.site_title.is_some() {
            AdminAction::UpdateSettings {
                banner_url: form.banner_url,
                site_title: form.site_title,
            }
        } else {
            AdminAction::CreatePost(NewPostDraft {
                date: form.date,
                title: form.title,
                body: form.body,
            })
        }
    }
}

/// New post form contents, kept to refill the form after a refusal
#[derive(Default)]
pub struct NewPostDraft {
    date: String,
    title: String,
    body: String,
}

impl NewPostDraft {
    fn to_record(&self) -> Result<PostRecord, AuthoringError> {
        let date = self.date.parse::<PostDate>().context(InvalidDateSnafu)?;
        Ok(PostRecord::new(date, self.title.clone(), self.body.clone()))
    }
}

pub async fn post_admin(
    state: State<SharedState>,
    AuthenticatedUser(user): AuthenticatedUser,
    IsSecure(is_secure): IsSecure,
    Form(form): Form<AdminForm>,
) -> RequestResult<Response> {
    match AdminAction::from(form) {
        AdminAction::UpdateSettings {
            banner_url,
            site_title,
        } => {
            if let Some(banner_url) = banner_url {
                let banner_url = if is_secure {
                    upgrade_insecure_scheme(banner_url.trim())
                } else {
                    banner_url.trim().to_owned()
                };
                state.set_or_clear_setting(SETTING_BANNER_URL, &banner_url).await?;
            }
            if let Some(site_title) = site_title {
                state
                    .set_or_clear_setting(SETTING_SITE_TITLE, site_title.trim())
                    .await?;
            }
            Ok(Redirect::to("/").into_response())
        }
        AdminAction::CreatePost(draft) => match draft.to_record() {
            Ok(record) => {
                let id = state.db.insert_post(record).await?;
                info!(target: LOG_TARGET, %id, username = %user.username, "Post created");
                Ok(Redirect::to("/").into_response())
            }
            Err(err) => Ok(Maud(state.admin_page(Some(err), &draft).await?).into_response()),
        },
    }
}

impl UiState {
    /// Empty values drop the setting, bringing back its default
    async fn set_or_clear_setting(&self, key: &str, value: &str) -> RequestResult<()> {
        if value.is_empty() {
            self.db.remove_setting(key).await?;
        } else {
            self.db.set_setting(key, value).await?;
        }
        Ok(())
    }

    async fn admin_page(
        &self,
        notice: Option<AuthoringError>,
        draft: &NewPostDraft,
    ) -> RequestResult<Markup> {
        let ctx = self.admin_page_ctx().await?;
        let site_title_override = self.db.get_site_settings().await?.site_title;
        let posts = self.db.list_posts().await?;

        let draft_date = if draft.date.is_empty() {
            PostDate::today().to_string()
        } else {
            draft.date.clone()
        };

        let content = html! {
            div ."o-admin" {
                section ."o-admin__settings" {
                    h2 { "Settings" }
                    form action="/admin" method="post" {
                        label {
                            "Banner URL"
                            input type="text" name="banner_url" value=(ctx.banner_url);
                        }
                        label {
                            "Site title"
                            input type="text" name="site_title"
                                placeholder=(self.opts.site_title)
                                value=(site_title_override.unwrap_or_default());
                        }
                        button type="submit" ."u-button" { "Save" }
                    }
                }
                section ."o-admin__newPost" {
                    h2 { "New comic" }
                    form action="/admin" method="post" {
                        @if let Some(notice) = notice {
                            p ."o-admin__error" { (notice) }
                        }
                        label {
                            "Date (dd/mm/yyyy)"
                            input type="text" name="date" value=(draft_date);
                        }
                        label {
                            "Title"
                            input type="text" name="title" value=(draft.title);
                        }
                        label {
                            "Body"
                            textarea name="body" rows="8" { (draft.body) }
                        }
                        button type="submit" ."u-button" { "Publish" }
                    }
                }
                section ."o-admin__posts" {
                    h2 { "Comics" }
                    (render_post_list(&posts))
                }
            }
        };

        Ok(self.render_html_page(&ctx, "Admin", content))
    }
}

fn render_post_list(posts: &[Post]) -> Markup {
    let top = posts.first().map(|p| p.id);
    let bottom = posts.last().map(|p| p.id);

    html! {
        table ."o-postList" {
            thead {
                tr {
                    th { "#" }
                    th { "date" }
                    th { "title" }
                    th { "published" }
                    th { "views" }
                    th { "bot views" }
                    th { "order" }
                }
            }
            tbody {
                @for post in posts {
                    tr class=(if post.record.published { "o-postList__row" } else { "o-postList__row -draft" }) {
                        td { (post.id) }
                        td { (post.record.date) }
                        td { a href=(format!("/edit/{}", post.id)) { (post.record.display_title()) } }
                        td { @if post.record.published { "yes" } @else { "no" } }
                        td { (post.record.views) }
                        td { (post.record.bot_views) }
                        td {
                            @if Some(post.id) != top {
                                @if let Some(up) = post.id.next() {
                                    a ."o-postList__move" href=(swap_url(post.id, up)) { "move up" }
                                }
                            }
                            " "
                            @if Some(post.id) != bottom {
                                @if let Some(down) = post.id.prev() {
                                    a ."o-postList__move" href=(swap_url(post.id, down)) { "move down" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn swap_url(id1: PostId, id2: PostId) -> String {
    format!("/admin?pid1={id1}&pid2={id2}")
}

#[cfg(test)]
mod tests {
    use inkstrip_core::{Post, PostId, PostRecord};

    use super::render_post_list;

    fn post(id: u64) -> Post {
        Post::new(
            PostId::new(id),
            PostRecord::new(
                "05/03/2024".parse().expect("valid date"),
                format!("p{id}"),
                String::new(),
            ),
        )
    }

    #[test]
    fn high_ids_edge_rows_compare_by_value() {
        let posts: Vec<Post> = (300..303).rev().map(post).collect();
        let html = render_post_list(&posts).into_string();

        assert_eq!(html.matches("move up").count(), 2, "{html}");
        assert_eq!(html.matches("move down").count(), 2, "{html}");

        // Top row can't go up, bottom row can't go down
        assert!(!html.contains("pid1=302&amp;pid2=303"), "{html}");
        assert!(!html.contains("pid1=300&amp;pid2=299"), "{html}");
        assert!(html.contains("pid1=301&amp;pid2=302"), "{html}");
        assert!(html.contains("pid1=301&amp;pid2=300"), "{html}");
    }
}
