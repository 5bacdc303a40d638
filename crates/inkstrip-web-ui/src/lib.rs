mod content;
mod error;
mod layout;
mod routes;
mod serde_util;
mod util;

use std::future::Future;
use std::io;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr as _;
use std::sync::Arc;

use axum::Router;
use inkstrip_core::error::FmtCompact as _;
use inkstrip_db::{Database, DbError, RedbSessionStore};
use snafu::{ResultExt as _, Snafu};
use tokio::net::{TcpListener, TcpSocket};
use tokio::signal;
use tower_http::CompressionLevel;
use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::SizeAbove;
use tower_sessions::session_store::ExpiredDeletion as _;
use tower_sessions::{Expiry, SessionManagerLayer};
use tracing::{info, warn};

const LOG_TARGET: &str = "inkstrip::web-ui";

/// How long a login lasts without any requests
const SESSION_INACTIVITY_DAYS: i64 = 30;
const EXPIRED_SESSIONS_CLEANUP_INTERVAL: std::time::Duration =
    std::time::Duration::from_secs(60 * 60);

#[derive(Clone, Debug)]
pub struct Opts {
    pub listen: String,
    pub reuseport: bool,
    pub data_dir: PathBuf,
    /// Served under `/static`, also holds `robots.txt`
    pub static_dir: PathBuf,
    /// Used unless an admin set a title override
    pub site_title: String,
    /// Allow creating accounts once one exists
    pub allow_registration: bool,
    pub secure_cookies: bool,
}

impl Opts {
    pub fn new(listen: String, data_dir: PathBuf, static_dir: PathBuf) -> Self {
        Self {
            listen,
            reuseport: false,
            data_dir,
            static_dir,
            site_title: inkstrip_core::site::DEFAULT_SITE_TITLE.to_owned(),
            allow_registration: true,
            secure_cookies: false,
        }
    }
}

pub struct UiState {
    db: Arc<Database>,
    opts: Opts,
}

impl UiState {
    pub fn db(&self) -> &Database {
        &self.db
    }
}

pub type SharedState = Arc<UiState>;

pub struct Server {
    listener: TcpListener,
    state: SharedState,
}

#[derive(Debug, Snafu)]
pub enum WebUiServerError {
    #[snafu(transparent)]
    IO {
        source: io::Error,
    },

    ListenAddr {
        source: AddrParseError,
    },

    Database {
        source: DbError,
    },
}

pub type ServerResult<T> = std::result::Result<T, WebUiServerError>;

impl Server {
    pub async fn init(opts: Opts) -> ServerResult<Server> {
        let listener = Self::get_listener(&opts).await?;

        let db_path = Database::mk_db_path(&opts.data_dir).await?;
        let db = Database::open(db_path).await.context(DatabaseSnafu)?;

        let state = Arc::new(UiState {
            db: Arc::new(db),
            opts,
        });

        info!(target: LOG_TARGET, addr = %listener.local_addr()?, "Listening");
        Ok(Self { listener, state })
    }

    pub async fn get_listener(opts: &Opts) -> ServerResult<TcpListener> {
        let socket = {
            let addr = SocketAddr::from_str(&opts.listen).context(ListenAddrSnafu)?;

            let socket = if addr.is_ipv4() {
                TcpSocket::new_v4()?
            } else {
                TcpSocket::new_v6()?
            };
            if opts.reuseport {
                #[cfg(unix)]
                socket.set_reuseport(true)?;
            }
            socket.set_nodelay(true)?;

            socket.bind(addr)?;

            socket
        };

        Ok(socket.listen(1024)?)
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> ServerResult<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes, then finish in-flight requests
    pub async fn run_until(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> ServerResult<()> {
        let session_store = RedbSessionStore::new(self.state.db.clone());
        let session_layer = SessionManagerLayer::new(session_store.clone())
            .with_secure(self.state.opts.secure_cookies)
            .with_expiry(Expiry::OnInactivity(time::Duration::days(
                SESSION_INACTIVITY_DAYS,
            )));

        let cleanup = tokio::spawn(async move {
            let mut interval = tokio::time::interval(EXPIRED_SESSIONS_CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                if let Err(err) = session_store.delete_expired().await {
                    warn!(target: LOG_TARGET, err = %err.fmt_compact(), "Failed to delete expired sessions");
                }
            }
        });

        let router = Router::new()
            .merge(routes::route_handler(self.state.clone()))
            .layer(session_layer)
            .layer(compression_layer());

        info!(target: LOG_TARGET, "Starting server");
        let res = axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        cleanup.abort();
        info!(target: LOG_TARGET, "Server stopped");

        Ok(res?)
    }

    pub fn addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }
}

fn compression_layer() -> CompressionLayer<SizeAbove> {
    CompressionLayer::new()
        .quality(CompressionLevel::Precise(4))
        .compress_when(SizeAbove::new(512))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
