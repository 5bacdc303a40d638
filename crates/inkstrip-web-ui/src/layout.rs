use maud::{DOCTYPE, Markup, html};

use crate::UiState;
use crate::error::RequestResult;
use crate::routes::auth::session::UserSessionData;

/// The button in the top right corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderButton {
    Admin,
    Login,
    Register,
    Logout,
}

impl HeaderButton {
    fn href(self) -> &'static str {
        match self {
            HeaderButton::Admin => "/admin",
            HeaderButton::Login => "/login",
            HeaderButton::Register => "/register",
            HeaderButton::Logout => "/logout",
        }
    }

    fn label(self) -> &'static str {
        match self {
            HeaderButton::Admin => "admin",
            HeaderButton::Login => "login",
            HeaderButton::Register => "register",
            HeaderButton::Logout => "logout",
        }
    }
}

/// Site-wide bits every page shows
pub(crate) struct PageCtx {
    pub site_title: String,
    pub banner_url: String,
    pub button: HeaderButton,
}

impl UiState {
    pub(crate) async fn page_ctx(&self, user: Option<&UserSessionData>) -> RequestResult<PageCtx> {
        let button = if user.is_some() {
            HeaderButton::Admin
        } else if self.db.has_users().await? {
            HeaderButton::Login
        } else {
            HeaderButton::Register
        };
        self.page_ctx_with_button(button).await
    }

    /// For pages that are only reachable when logged in
    pub(crate) async fn admin_page_ctx(&self) -> RequestResult<PageCtx> {
        self.page_ctx_with_button(HeaderButton::Logout).await
    }

    async fn page_ctx_with_button(&self, button: HeaderButton) -> RequestResult<PageCtx> {
        let settings = self.db.get_site_settings().await?;
        Ok(PageCtx {
            site_title: settings
                .site_title
                .unwrap_or_else(|| self.opts.site_title.clone()),
            banner_url: settings.banner_url,
            button,
        })
    }

    /// Html page header
    pub(crate) fn render_html_head(&self, page_title: &str) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en";
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="color-scheme" content="light dark";
                link rel="stylesheet" type="text/css" href="/static/style.css";
                link rel="icon" type="image/png" href="/static/images/favicon.png";
                title { (page_title) }
            }
        }
    }

    pub(crate) fn render_html_page(&self, ctx: &PageCtx, title: &str, content: Markup) -> Markup {
        let page_title = if title.is_empty() {
            ctx.site_title.clone()
        } else {
            format!("{} - {title}", ctx.site_title)
        };
        html! {
            (self.render_html_head(&page_title))
            body ."o-body" {
                header ."o-header" {
                    a ."o-header__banner" href="/" {
                        img ."img-responsive" src=(ctx.banner_url) alt=(ctx.site_title);
                    }
                    nav ."o-header__nav" {
                        a ."o-header__link" href="/" { "comic" }
                        a ."o-header__link" href="/about" { "about" }
                        a ."o-header__link -button" href=(ctx.button.href()) { (ctx.button.label()) }
                    }
                }
                main ."o-main" { (content) }
                (render_html_footer(ctx))
            }
        }
    }
}

fn render_html_footer(ctx: &PageCtx) -> Markup {
    html! {
        footer ."o-footer" {
            p { (ctx.site_title) }
        }
    }
}
