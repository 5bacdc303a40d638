use inkstrip_core::{Post, PostDate, PostId, PostRecord, ViewerKind};
use redb_bincode::ReadableTable as _;
use tracing::{debug, info};

use crate::{Database, DbResult, LOG_TARGET, OverflowSnafu, get_last_in_range, posts, posts_published};

/// Author-editable fields of a post
#[derive(Debug, Clone)]
pub struct PostEdit {
    pub date: PostDate,
    pub title: String,
    pub published: bool,
    pub body: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped,
    /// At least one of the ids has no stored post
    Missing,
    SameId,
}

impl Database {
    fn put_post_tx(
        id: PostId,
        record: &PostRecord,
        posts_tbl: &mut posts::Table,
        posts_published_tbl: &mut posts_published::Table,
    ) -> DbResult<()> {
        posts_tbl.insert(&id, record)?;
        if record.published {
            posts_published_tbl.insert(&id, &())?;
        } else {
            posts_published_tbl.remove(&id)?;
        }
        Ok(())
    }

    pub async fn insert_post(&self, record: PostRecord) -> DbResult<PostId> {
        let id = self
            .write_with(|tx| {
                let mut posts_tbl = tx.open_table(&posts::TABLE)?;
                let mut posts_published_tbl = tx.open_table(&posts_published::TABLE)?;

                let id = match get_last_in_range(&posts_tbl, ..)? {
                    Some(last) => last.next().ok_or_else(|| OverflowSnafu.build())?,
                    None => PostId::FIRST,
                };

                Self::put_post_tx(id, &record, &mut posts_tbl, &mut posts_published_tbl)?;
                Ok(id)
            })
            .await?;

        info!(target: LOG_TARGET, %id, "New post");
        Ok(id)
    }

    /// Overwrite the editable fields of an existing post
    ///
    /// View counters are kept. Returns `None` if there is no post `id`.
    pub async fn update_post(&self, id: PostId, edit: PostEdit) -> DbResult<Option<PostRecord>> {
        self.write_with(|tx| {
            let mut posts_tbl = tx.open_table(&posts::TABLE)?;
            let mut posts_published_tbl = tx.open_table(&posts_published::TABLE)?;

            let Some(mut record) = posts_tbl.get(&id)?.map(|g| g.value()) else {
                return Ok(None);
            };

            let PostEdit {
                date,
                title,
                published,
                body,
            } = edit;
            record.date = date;
            record.title = title;
            record.published = published;
            record.body = body;

            Self::put_post_tx(id, &record, &mut posts_tbl, &mut posts_published_tbl)?;
            Ok(Some(record))
        })
        .await
    }

    pub async fn get_post(&self, id: PostId) -> DbResult<Option<PostRecord>> {
        self.read_with(|tx| {
            let posts_tbl = tx.open_table(&posts::TABLE)?;
            Ok(posts_tbl.get(&id)?.map(|g| g.value()))
        })
        .await
    }

    /// Like [`Self::get_post`], but drafts read as missing
    pub async fn get_published_post(&self, id: PostId) -> DbResult<Option<PostRecord>> {
        Ok(self.get_post(id).await?.filter(|record| record.published))
    }

    /// Fetch a published post for display, counting the view if `viewer`
    /// is set
    ///
    /// Lookup and counter bump share one write transaction, so concurrent
    /// views never lose an increment.
    pub async fn view_published_post(
        &self,
        id: PostId,
        viewer: Option<ViewerKind>,
    ) -> DbResult<Option<PostRecord>> {
        let Some(viewer) = viewer else {
            return self.get_published_post(id).await;
        };

        self.write_with(|tx| {
            let mut posts_tbl = tx.open_table(&posts::TABLE)?;

            let Some(mut record) = posts_tbl.get(&id)?.map(|g| g.value()) else {
                return Ok(None);
            };
            if !record.published {
                return Ok(None);
            }

            record.count_view(viewer);
            posts_tbl.insert(&id, &record)?;
            Ok(Some(record))
        })
        .await
    }

    pub async fn get_latest_published_id(&self) -> DbResult<Option<PostId>> {
        self.read_with(|tx| {
            let posts_published_tbl = tx.open_table(&posts_published::TABLE)?;
            get_last_in_range(&posts_published_tbl, ..)
        })
        .await
    }

    pub async fn has_posts(&self) -> DbResult<bool> {
        self.read_with(|tx| {
            let posts_tbl = tx.open_table(&posts::TABLE)?;
            Ok(posts_tbl.first()?.is_some())
        })
        .await
    }

    /// All posts, drafts included, newest first
    pub async fn list_posts(&self) -> DbResult<Vec<Post>> {
        self.read_with(|tx| {
            let posts_tbl = tx.open_table(&posts::TABLE)?;

            let mut ret = vec![];
            for record in posts_tbl.range(..)?.rev() {
                let (k, v) = record?;
                ret.push(Post::new(k.value(), v.value()));
            }
            Ok(ret)
        })
        .await
    }

    /// Exchange the reading-order positions of two posts
    ///
    /// Both records move to the other's id in a single transaction. Missing
    /// posts or identical ids leave storage untouched.
    pub async fn swap_posts(&self, id1: PostId, id2: PostId) -> DbResult<SwapOutcome> {
        if id1 == id2 {
            return Ok(SwapOutcome::SameId);
        }

        let outcome = self
            .write_with(|tx| {
                let mut posts_tbl = tx.open_table(&posts::TABLE)?;
                let mut posts_published_tbl = tx.open_table(&posts_published::TABLE)?;

                let record1 = posts_tbl.get(&id1)?.map(|g| g.value());
                let record2 = posts_tbl.get(&id2)?.map(|g| g.value());
                let (Some(record1), Some(record2)) = (record1, record2) else {
                    return Ok(SwapOutcome::Missing);
                };

                Self::put_post_tx(id1, &record2, &mut posts_tbl, &mut posts_published_tbl)?;
                Self::put_post_tx(id2, &record1, &mut posts_tbl, &mut posts_published_tbl)?;
                Ok(SwapOutcome::Swapped)
            })
            .await?;

        debug!(target: LOG_TARGET, %id1, %id2, ?outcome, "Swap posts");
        Ok(outcome)
    }
}
