mod migration_ops;
mod nav_ops;
mod post_ops;
pub mod session_store;
mod settings_ops;
mod table_ops;
mod tables;
mod user_ops;

use std::ops;
use std::path::{Path, PathBuf};

use redb_bincode::{ReadTransaction, ReadableTable, WriteTransaction};
use snafu::{Location, ResultExt as _, Snafu};
use tokio::task::JoinError;
use tracing::{debug, instrument};

pub use self::post_ops::{PostEdit, SwapOutcome};
pub use self::session_store::RedbSessionStore;
pub use self::settings_ops::SiteSettings;
pub use self::tables::*;
pub use self::user_ops::InsertUserOutcome;

const LOG_TARGET: &str = "inkstrip::db";

#[derive(Debug, Snafu)]
pub enum DbError {
    Database {
        source: redb::DatabaseError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(transparent)]
    Table {
        source: redb::TableError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(transparent)]
    Storage {
        source: redb::StorageError,
        #[snafu(implicit)]
        location: Location,
    },
    Transaction {
        source: redb::TransactionError,
        #[snafu(implicit)]
        location: Location,
    },
    Commit {
        source: redb::CommitError,
        #[snafu(implicit)]
        location: Location,
    },
    DbVersionTooHigh {
        db_ver: u64,
        code_ver: u64,
        #[snafu(implicit)]
        location: Location,
    },
    Join {
        source: JoinError,
        #[snafu(implicit)]
        location: Location,
    },
    Overflow,
}
pub type DbResult<T> = std::result::Result<T, DbError>;

/// The comic site's database: posts, accounts, settings and sessions in one
/// redb file.
#[derive(Debug)]
pub struct Database {
    inner: redb_bincode::Database,
}

impl Database {
    pub const FILE_NAME: &str = "inkstrip.redb";

    pub async fn mk_db_path(data_dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&data_dir).await?;
        Ok(data_dir.join(Self::FILE_NAME))
    }

    #[instrument(skip_all)]
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Database> {
        let path = path.into();
        debug!(target: LOG_TARGET, path = %path.display(), "Opening database");
        let inner = tokio::task::spawn_blocking(move || redb_bincode::Database::create(path))
            .await
            .context(JoinSnafu)?
            .context(DatabaseSnafu)?;

        Self::write_with_inner(&inner, |tx| {
            Self::init_tables_tx(tx)?;
            Self::handle_db_ver_migrations(tx)?;
            Ok(())
        })
        .await?;

        Ok(Self { inner })
    }
}

impl Database {
    pub async fn write_with_inner<T>(
        inner: &redb_bincode::Database,
        f: impl FnOnce(&'_ WriteTransaction) -> DbResult<T>,
    ) -> DbResult<T> {
        tokio::task::block_in_place(|| {
            let dbtx = inner.begin_write().context(TransactionSnafu)?;
            let res = f(&dbtx)?;

            dbtx.commit().context(CommitSnafu)?;

            Ok(res)
        })
    }

    /// Run `f` in a write transaction, committed only if `f` succeeds
    pub async fn write_with<T>(
        &self,
        f: impl FnOnce(&'_ WriteTransaction) -> DbResult<T>,
    ) -> DbResult<T> {
        Self::write_with_inner(&self.inner, f).await
    }

    pub async fn read_with_inner<T>(
        inner: &redb_bincode::Database,
        f: impl FnOnce(&'_ ReadTransaction) -> DbResult<T>,
    ) -> DbResult<T> {
        tokio::task::block_in_place(|| {
            let dbtx = inner.begin_read().context(TransactionSnafu)?;

            f(&dbtx)
        })
    }

    pub async fn read_with<T>(
        &self,
        f: impl FnOnce(&'_ ReadTransaction) -> DbResult<T>,
    ) -> DbResult<T> {
        Self::read_with_inner(&self.inner, f).await
    }
}

fn get_first_in_range<K, V>(
    table: &impl ReadableTable<K, V>,
    range: impl ops::RangeBounds<K>,
) -> DbResult<Option<K>>
where
    K: bincode::Decode<()> + bincode::Encode,
    V: bincode::Decode<()> + bincode::Encode,
{
    Ok(table
        .range(range)?
        .next()
        .transpose()?
        .map(|(k, _)| k.value()))
}

fn get_last_in_range<K, V>(
    table: &impl ReadableTable<K, V>,
    range: impl ops::RangeBounds<K>,
) -> DbResult<Option<K>>
where
    K: bincode::Decode<()> + bincode::Encode,
    V: bincode::Decode<()> + bincode::Encode,
{
    Ok(table
        .range(range)?
        .next_back()
        .transpose()?
        .map(|(k, _)| k.value()))
}
