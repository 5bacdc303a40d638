use tracing::{debug, info};

use crate::{
    Database, DbResult, DbVersionTooHighSnafu, LOG_TARGET, db_version, posts, posts_published,
    sessions, settings, users, users_by_id,
};

impl Database {
    pub(crate) fn init_tables_tx(tx: &redb_bincode::WriteTransaction) -> DbResult<()> {
        tx.open_table(&db_version::TABLE)?;

        tx.open_table(&posts::TABLE)?;
        tx.open_table(&posts_published::TABLE)?;

        tx.open_table(&users::TABLE)?;
        tx.open_table(&users_by_id::TABLE)?;

        tx.open_table(&settings::TABLE)?;
        tx.open_table(&sessions::TABLE)?;
        Ok(())
    }

    pub(crate) fn handle_db_ver_migrations(dbtx: &redb_bincode::WriteTransaction) -> DbResult<()> {
        const DB_VER: u64 = 1;

        let mut table_db_ver = dbtx.open_table(&db_version::TABLE)?;

        let Some(cur_db_ver) = table_db_ver.first()?.map(|g| g.1.value()) else {
            info!(target: LOG_TARGET, "Initializing new database");
            table_db_ver.insert(&(), &DB_VER)?;

            return Ok(());
        };

        if DB_VER < cur_db_ver {
            return DbVersionTooHighSnafu {
                db_ver: cur_db_ver,
                code_ver: DB_VER,
            }
            .fail();
        }

        debug!(target: LOG_TARGET, db_ver = cur_db_ver, "Db version");

        Ok(())
    }
}
