use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use clap::{Args, Parser, Subcommand};

/// Publishing tool for serial web comics
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Opts {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub cmd: OptsCmd,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Directory holding the database
    #[arg(env = "INKSTRIP_DATA_DIR", long, global = true)]
    pub data_dir: Option<PathBuf>,
}

static PROJECTS_DIR: LazyLock<directories::ProjectDirs> = LazyLock::new(|| {
    directories::ProjectDirs::from("org", "Inkstrip", "inkstrip")
        .expect("Unable to determine project's dir")
});

impl GlobalOpts {
    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_deref().unwrap_or_else(|| {
            PROJECTS_DIR
                .state_dir()
                .unwrap_or_else(|| PROJECTS_DIR.data_local_dir())
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum OptsCmd {
    /// Run the site
    WebUi(WebUiOpts),

    /// Development and debugging commands
    #[command(subcommand)]
    Dev(DevCmd),
}

#[derive(Debug, Args)]
pub struct WebUiOpts {
    /// Listen address
    #[arg(long, short, default_value = "127.0.0.1:3000", env = "INKSTRIP_LISTEN")]
    pub listen: String,

    /// Set SO_REUSEPORT
    #[arg(long, env = "INKSTRIP_REUSEPORT")]
    pub reuseport: bool,

    /// Directory served under `/static`, must contain `robots.txt`
    #[arg(long, default_value = "static", env = "INKSTRIP_STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Site title, unless overridden on the admin page
    #[arg(long, env = "INKSTRIP_SITE_TITLE")]
    pub site_title: Option<String>,

    /// Let anyone register an account
    #[arg(
        long,
        env = "INKSTRIP_ALLOW_REGISTRATION",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub allow_registration: bool,

    /// Mark session cookies `Secure` (site served over https)
    #[arg(long, env = "INKSTRIP_SECURE_COOKIES")]
    pub secure_cookies: bool,
}

pub fn make_web_opts(data_dir: &Path, opts: &WebUiOpts) -> inkstrip_web_ui::Opts {
    let mut web_opts = inkstrip_web_ui::Opts::new(
        opts.listen.clone(),
        data_dir.to_owned(),
        opts.static_dir.clone(),
    );
    web_opts.reuseport = opts.reuseport;
    web_opts.allow_registration = opts.allow_registration;
    web_opts.secure_cookies = opts.secure_cookies;
    if let Some(site_title) = opts.site_title.as_ref() {
        web_opts.site_title = site_title.clone();
    }
    web_opts
}

#[derive(Debug, Subcommand)]
pub enum DevCmd {
    /// Print all posts, unpublished included
    DumpPosts,
    /// Print site settings overrides
    DumpSettings,
    /// Print registered usernames
    DumpUsers,
}
