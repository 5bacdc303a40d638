use std::ops::Bound;

use inkstrip_core::nav::pick_random_other;
use inkstrip_core::{PostId, PostNav};
use rand::Rng;
use redb_bincode::ReadableTable as _;

use crate::{Database, DbResult, get_first_in_range, get_last_in_range, posts_published};

impl Database {
    pub(crate) fn count_published_tx(
        posts_published_tbl: &impl posts_published::ReadableTable,
    ) -> DbResult<usize> {
        let mut count = 0;
        for record in posts_published_tbl.range(..)? {
            record?;
            count += 1;
        }
        Ok(count)
    }

    pub(crate) fn get_published_at_offset_tx(
        posts_published_tbl: &impl posts_published::ReadableTable,
        offset: usize,
    ) -> DbResult<Option<PostId>> {
        Ok(posts_published_tbl
            .range(..)?
            .nth(offset)
            .transpose()?
            .map(|(k, _)| k.value()))
    }

    pub(crate) fn get_post_nav_tx(
        current: PostId,
        posts_published_tbl: &impl posts_published::ReadableTable,
        rng: &mut impl Rng,
    ) -> DbResult<PostNav> {
        let oldest = get_first_in_range(posts_published_tbl, ..)?;
        let newest = get_last_in_range(posts_published_tbl, ..)?;
        let previous = get_last_in_range(posts_published_tbl, ..current)?;
        let next = get_first_in_range(
            posts_published_tbl,
            (Bound::Excluded(current), Bound::Unbounded),
        )?;

        let published_count = Self::count_published_tx(posts_published_tbl)?;
        let random = pick_random_other(rng, published_count, current, |offset| {
            Self::get_published_at_offset_tx(posts_published_tbl, offset)
        })?;

        Ok(PostNav {
            oldest,
            previous,
            next,
            newest,
            random,
        })
    }

    /// Navigation targets around `current`, among published posts only
    pub async fn get_post_nav(&self, current: PostId) -> DbResult<PostNav> {
        self.read_with(|tx| {
            let posts_published_tbl = tx.open_table(&posts_published::TABLE)?;
            Self::get_post_nav_tx(current, &posts_published_tbl, &mut rand::rng())
        })
        .await
    }
}
