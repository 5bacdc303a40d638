use bincode::{Decode, Encode};
pub use inkstrip_core::PostRecord;
use inkstrip_core::{PostId, UserId};
use serde::Serialize;

#[macro_export]
macro_rules! def_table {
    ($(#[$outer:meta])*
        $name:ident : $k:ty => $v:ty) => {
        #[allow(unused)]
        $(#[$outer])*
        pub mod $name {
            use super::*;
            pub type Key = $k;
            pub type Value = $v;
            pub type Definition<'a> = redb_bincode::TableDefinition<'a, Key, Value>;
            pub trait ReadableTable: redb_bincode::ReadableTable<Key, Value> {}
            impl<RT> ReadableTable for RT where RT: redb_bincode::ReadableTable<Key, Value> {}
            pub type Table<'a> = redb_bincode::Table<'a, Key, Value>;
            pub const TABLE: Definition = redb_bincode::TableDefinition::new(stringify!($name));
        }
    };
}

def_table! {
    /// Tracks database/schema version
    db_version: () => u64
}

def_table! {
    /// All posts, keyed by their reading-order position
    posts: PostId => PostRecord
}

def_table! {
    /// Ids of published posts only
    ///
    /// Navigation runs range queries over this table, so it must always
    /// mirror `PostRecord::published` of [`posts`].
    posts_published: PostId => ()
}

// ACCOUNTS
def_table!(users: String => UserRecord);
def_table!(users_by_id: UserId => String);

// SITE
def_table!(settings: String => String);
def_table!(sessions: i128 => SessionRecord);

#[derive(Debug, Encode, Decode, Clone, Serialize)]
pub struct UserRecord {
    pub id: UserId,
    /// PHC string of the password hash
    #[serde(skip)]
    pub password_hash: String,
}

#[derive(Debug, Encode, Decode, Clone, Serialize)]
pub struct SessionRecord {
    /// `serde_json` encoded session data
    pub data: Vec<u8>,
    pub expiry_unix: i64,
}
