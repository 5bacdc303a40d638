//! Browser sessions for `tower-sessions`, persisted next to the posts.

use std::sync::Arc;

use async_trait::async_trait;
use inkstrip_core::error::FmtCompact as _;
use redb_bincode::ReadableTable as _;
use time::OffsetDateTime;
use tower_sessions_core::session::{Id, Record};
use tower_sessions_core::session_store::{self, ExpiredDeletion, SessionStore};
use tracing::debug;

use crate::{Database, DbError, LOG_TARGET, SessionRecord, sessions};

impl SessionRecord {
    fn from_record(record: &Record) -> session_store::Result<Self> {
        let data = serde_json::to_vec(&record.data)
            .map_err(|e| session_store::Error::Encode(e.to_string()))?;
        Ok(Self {
            data,
            expiry_unix: record.expiry_date.unix_timestamp(),
        })
    }

    fn into_record(self, id: Id) -> session_store::Result<Record> {
        let data = serde_json::from_slice(&self.data)
            .map_err(|e| session_store::Error::Decode(e.to_string()))?;
        let expiry_date = OffsetDateTime::from_unix_timestamp(self.expiry_unix)
            .map_err(|e| session_store::Error::Decode(e.to_string()))?;
        Ok(Record {
            id,
            data,
            expiry_date,
        })
    }

    fn is_expired_at(&self, now_unix: i64) -> bool {
        self.expiry_unix < now_unix
    }
}

fn backend_err(err: DbError) -> session_store::Error {
    session_store::Error::Backend(err.fmt_compact().to_string())
}

#[derive(Debug, Clone)]
pub struct RedbSessionStore {
    db: Arc<Database>,
}

impl RedbSessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for RedbSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let stored = SessionRecord::from_record(record)?;

        let id = self
            .db
            .write_with(|tx| {
                let mut sessions_tbl = tx.open_table(&sessions::TABLE)?;

                let mut id = record.id;
                while sessions_tbl.get(&id.0)?.is_some() {
                    id = Id::default();
                }
                sessions_tbl.insert(&id.0, &stored)?;
                Ok(id)
            })
            .await
            .map_err(backend_err)?;

        record.id = id;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let stored = SessionRecord::from_record(record)?;
        let id = record.id.0;

        self.db
            .write_with(|tx| {
                let mut sessions_tbl = tx.open_table(&sessions::TABLE)?;
                sessions_tbl.insert(&id, &stored)?;
                Ok(())
            })
            .await
            .map_err(backend_err)
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let id = session_id.0;

        let stored = self
            .db
            .read_with(|tx| {
                let sessions_tbl = tx.open_table(&sessions::TABLE)?;
                Ok(sessions_tbl.get(&id)?.map(|g| g.value()))
            })
            .await
            .map_err(backend_err)?;

        let Some(stored) = stored else {
            return Ok(None);
        };

        if stored.is_expired_at(OffsetDateTime::now_utc().unix_timestamp()) {
            return Ok(None);
        }

        stored.into_record(*session_id).map(Some)
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        let id = session_id.0;

        self.db
            .write_with(|tx| {
                let mut sessions_tbl = tx.open_table(&sessions::TABLE)?;
                sessions_tbl.remove(&id)?;
                Ok(())
            })
            .await
            .map_err(backend_err)
    }
}

#[async_trait]
impl ExpiredDeletion for RedbSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now_unix = OffsetDateTime::now_utc().unix_timestamp();

        let removed = self
            .db
            .write_with(|tx| {
                let mut sessions_tbl = tx.open_table(&sessions::TABLE)?;

                let mut expired = vec![];
                for record in sessions_tbl.range(..)? {
                    let (k, v) = record?;
                    if v.value().is_expired_at(now_unix) {
                        expired.push(k.value());
                    }
                }
                for id in &expired {
                    sessions_tbl.remove(id)?;
                }
                Ok(expired.len())
            })
            .await
            .map_err(backend_err)?;

        debug!(target: LOG_TARGET, removed, "Deleted expired sessions");
        Ok(())
    }
}
