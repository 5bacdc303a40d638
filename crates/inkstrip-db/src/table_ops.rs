use redb_bincode::ReadTransaction;

use crate::{Database, DbResult, posts, settings, users};

impl Database {
    fn dump_table_dbtx<K, V>(
        dbtx: &ReadTransaction,
        def: &redb_bincode::TableDefinition<'_, K, V>,
    ) -> DbResult<Vec<(K, V)>>
    where
        V: bincode::Decode<()> + bincode::Encode,
        K: bincode::Decode<()> + bincode::Encode,
    {
        let tbl = dbtx.open_table(def)?;
        let mut ret = vec![];
        for record in tbl.range(..)? {
            let (k, v) = record?;
            ret.push((k.value(), v.value()));
        }
        Ok(ret)
    }

    /// Every stored post, drafts included, in reading order
    pub async fn dump_posts(&self) -> DbResult<Vec<(posts::Key, posts::Value)>> {
        self.read_with(|tx| Self::dump_table_dbtx(tx, &posts::TABLE))
            .await
    }

    pub async fn dump_settings(&self) -> DbResult<Vec<(settings::Key, settings::Value)>> {
        self.read_with(|tx| Self::dump_table_dbtx(tx, &settings::TABLE))
            .await
    }

    pub async fn dump_users(&self) -> DbResult<Vec<(users::Key, users::Value)>> {
        self.read_with(|tx| Self::dump_table_dbtx(tx, &users::TABLE))
            .await
    }
}
