mod cli;

use std::io;

use clap::Parser;
use cli::{Opts, make_web_opts};
use inkstrip_core::error::WhateverResult;
use inkstrip_core::post::Post;
use inkstrip_db::{Database, DbError};
use inkstrip_web_ui::{Server, WebUiServerError};
use snafu::{FromString, ResultExt, Snafu, Whatever};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const PROJECT_NAME: &str = "inkstrip";
pub const LOG_TARGET: &str = "inkstrip::cli";

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("WebUI Server error: {source}"))]
    WebUiServer { source: WebUiServerError },
    #[snafu(display("Miscellaneous error: {source}"))]
    Whatever { source: Whatever },
    #[snafu(display("Data dir error: {source:?}"))]
    DataDir { source: io::Error },
    #[snafu(display("Database error: {source}"))]
    Database { source: DbError },
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[snafu::report]
#[tokio::main]
async fn main() -> CliResult<()> {
    init_logging().context(WhateverSnafu)?;

    let opts = Opts::parse();
    let v = handle_cmd(opts).await?;
    if !v.is_null() {
        println!("{}", serde_json::to_string_pretty(&v).expect("Can't fail"));
    }
    Ok(())
}

async fn open_db(opts: &Opts) -> CliResult<Database> {
    let db_path = Database::mk_db_path(opts.global.data_dir())
        .await
        .context(DataDirSnafu)?;
    Database::open(db_path).await.context(DatabaseSnafu)
}

async fn handle_cmd(opts: Opts) -> CliResult<serde_json::Value> {
    Ok(match opts.cmd {
        cli::OptsCmd::Dev(ref cmd) => {
            let db = open_db(&opts).await?;
            match cmd {
                cli::DevCmd::DumpPosts => {
                    let posts: Vec<Post> = db
                        .dump_posts()
                        .await
                        .context(DatabaseSnafu)?
                        .into_iter()
                        .map(|(id, record)| Post::new(id, record))
                        .collect();
                    serde_json::to_value(posts).expect("Can't fail")
                }
                cli::DevCmd::DumpSettings => {
                    let settings: serde_json::Map<String, serde_json::Value> = db
                        .dump_settings()
                        .await
                        .context(DatabaseSnafu)?
                        .into_iter()
                        .map(|(k, v)| (k, serde_json::Value::String(v)))
                        .collect();
                    serde_json::Value::Object(settings)
                }
                cli::DevCmd::DumpUsers => {
                    let users: serde_json::Map<String, serde_json::Value> = db
                        .dump_users()
                        .await
                        .context(DatabaseSnafu)?
                        .into_iter()
                        .map(|(username, record)| {
                            (username, serde_json::to_value(record).expect("Can't fail"))
                        })
                        .collect();
                    serde_json::Value::Object(users)
                }
            }
        }
        cli::OptsCmd::WebUi(ref web_opts) => {
            let server = Server::init(make_web_opts(opts.global.data_dir(), web_opts))
                .await
                .context(WebUiServerSnafu)?;

            info!(
                target: LOG_TARGET,
                addr = %server.addr().context(WebUiServerSnafu)?,
                project = PROJECT_NAME,
                "Serving"
            );
            server.run().await.context(WebUiServerSnafu)?;

            serde_json::Value::Null
        }
    })
}

pub fn init_logging() -> WhateverResult<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|_| Whatever::without_source("Failed to initialize logging".to_string()))?;

    Ok(())
}
