use inkstrip_core::UserId;
use redb_bincode::ReadableTable as _;
use tracing::info;

use crate::{
    Database, DbResult, LOG_TARGET, OverflowSnafu, UserRecord, get_last_in_range, users,
    users_by_id,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InsertUserOutcome {
    Inserted(UserId),
    AlreadyExists,
}

impl Database {
    /// Store a new account, unless `username` is already taken
    pub async fn insert_user(
        &self,
        username: &str,
        password_hash: String,
    ) -> DbResult<InsertUserOutcome> {
        let outcome = self
            .write_with(|tx| {
                let mut users_tbl = tx.open_table(&users::TABLE)?;
                let mut users_by_id_tbl = tx.open_table(&users_by_id::TABLE)?;

                if users_tbl.get(&username.to_owned())?.is_some() {
                    return Ok(InsertUserOutcome::AlreadyExists);
                }

                let id = match get_last_in_range(&users_by_id_tbl, ..)? {
                    Some(last) => last.next().ok_or_else(|| OverflowSnafu.build())?,
                    None => UserId::FIRST,
                };

                users_tbl.insert(&username.to_owned(), &UserRecord { id, password_hash })?;
                users_by_id_tbl.insert(&id, &username.to_owned())?;

                Ok(InsertUserOutcome::Inserted(id))
            })
            .await?;

        if let InsertUserOutcome::Inserted(id) = outcome {
            info!(target: LOG_TARGET, %id, %username, "New user");
        }
        Ok(outcome)
    }

    pub async fn get_user(&self, username: &str) -> DbResult<Option<UserRecord>> {
        self.read_with(|tx| {
            let users_tbl = tx.open_table(&users::TABLE)?;
            Ok(users_tbl.get(&username.to_owned())?.map(|g| g.value()))
        })
        .await
    }

    pub async fn has_users(&self) -> DbResult<bool> {
        self.read_with(|tx| {
            let users_by_id_tbl = tx.open_table(&users_by_id::TABLE)?;
            Ok(users_by_id_tbl.first()?.is_some())
        })
        .await
    }
}
