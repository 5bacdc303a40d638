use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use inkstrip_core::{PostDate, PostId, PostRecord};
use inkstrip_db::PostEdit;
use maud::{Markup, html};
use serde::Deserialize;
use snafu::ResultExt as _;
use tracing::info;

use super::Maud;
use super::auth::session::AuthenticatedUser;
use crate::error::{AuthoringError, InvalidDateSnafu, RequestResult};
use crate::serde_util::form_bool;
use crate::{LOG_TARGET, SharedState, UiState};

fn back_to_admin() -> Response {
    Redirect::to("/admin").into_response()
}

pub async fn get_edit(
    state: State<SharedState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> RequestResult<Response> {
    let Ok(id) = id.parse::<PostId>() else {
        return Ok(back_to_admin());
    };
    let Some(record) = state.db.get_post(id).await? else {
        return Ok(back_to_admin());
    };

    let form = EditForm {
        date: record.date.to_string(),
        title: record.title.clone(),
        published: record.published,
        body: record.body.clone(),
    };
    Ok(Maud(state.edit_page(id, &record, &form, None).await?).into_response())
}

#[derive(Deserialize)]
pub struct EditForm {
    #[serde(default)]
    date: String,
    #[serde(default)]
    title: String,
    /// Required, forms without it are rejected
    #[serde(deserialize_with = "form_bool")]
    published: bool,
    #[serde(default)]
    body: String,
}

impl EditForm {
    fn to_edit(&self) -> Result<PostEdit, AuthoringError> {
        Ok(PostEdit {
            date: self.date.parse::<PostDate>().context(InvalidDateSnafu)?,
            title: self.title.clone(),
            published: self.published,
            body: self.body.clone(),
        })
    }
}

pub async fn post_edit(
    state: State<SharedState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Form(form): Form<EditForm>,
) -> RequestResult<Response> {
    let Ok(id) = id.parse::<PostId>() else {
        return Ok(back_to_admin());
    };

    let edit = match form.to_edit() {
        Ok(edit) => edit,
        Err(err) => {
            let Some(record) = state.db.get_post(id).await? else {
                return Ok(back_to_admin());
            };
            return Ok(Maud(state.edit_page(id, &record, &form, Some(err)).await?).into_response());
        }
    };

    if state.db.update_post(id, edit).await?.is_some() {
        info!(target: LOG_TARGET, %id, username = %user.username, "Post updated");
    }
    Ok(back_to_admin())
}

impl UiState {
    async fn edit_page(
        &self,
        id: PostId,
        stored: &PostRecord,
        form: &EditForm,
        notice: Option<AuthoringError>,
    ) -> RequestResult<Markup> {
        let ctx = self.admin_page_ctx().await?;
        let content = html! {
            div ."o-edit" {
                h2 { "Edit #" (id) }
                p ."o-edit__stats" {
                    "views: " (stored.views) ", bot views: " (stored.bot_views)
                }
                form action=(format!("/edit/{id}")) method="post" {
                    @if let Some(notice) = notice {
                        p ."o-edit__error" { (notice) }
                    }
                    label {
                        "Date (dd/mm/yyyy)"
                        input type="text" name="date" value=(form.date);
                    }
                    label {
                        "Title"
                        input type="text" name="title" value=(form.title);
                    }
                    label {
                        "Published"
                        select name="published" {
                            option value="1" selected[form.published] { "yes" }
                            option value="0" selected[!form.published] { "no" }
                        }
                    }
                    label {
                        "Body"
                        textarea name="body" rows="8" { (form.body) }
                    }
                    button type="submit" ."u-button" { "Save" }
                    " "
                    a href="/admin" { "cancel" }
                }
            }
        };

        Ok(self.render_html_page(&ctx, &format!("Edit #{id}"), content))
    }
}
