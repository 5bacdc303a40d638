use rand::Rng;

use crate::PostId;

/// Reading-order neighbours of the post being shown, among published posts
///
/// `None` means there is no such post and the matching control is
/// disabled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct PostNav {
    pub oldest: Option<PostId>,
    pub previous: Option<PostId>,
    pub next: Option<PostId>,
    pub newest: Option<PostId>,
    pub random: Option<PostId>,
}

/// Pick a random published post other than `current`
///
/// Draws a zero-based offset into the ordered set of `published_count`
/// published posts, resolves it with `id_at_offset`, and draws again while
/// it lands on `current`. With fewer than two published posts there is
/// nothing else to pick and `None` is returned without drawing.
pub fn pick_random_other<E>(
    rng: &mut impl Rng,
    published_count: usize,
    current: PostId,
    mut id_at_offset: impl FnMut(usize) -> Result<Option<PostId>, E>,
) -> Result<Option<PostId>, E> {
    if published_count < 2 {
        return Ok(None);
    }

    loop {
        let offset = rng.random_range(0..published_count);
        match id_at_offset(offset)? {
            Some(id) if id != current => return Ok(Some(id)),
            Some(_) => continue,
            // Offset past the end, the set shrank under us
            None => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    fn ids(raw: &[u64]) -> Vec<PostId> {
        raw.iter().copied().map(PostId::new).collect()
    }

    fn pick(rng: &mut StdRng, published: &[PostId], current: PostId) -> Option<PostId> {
        pick_random_other::<Infallible>(rng, published.len(), current, |offset| {
            Ok(published.get(offset).copied())
        })
        .expect("infallible")
    }

    #[test]
    fn needs_two_published_posts() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pick(&mut rng, &[], PostId::FIRST), None);
        assert_eq!(pick(&mut rng, &ids(&[3]), PostId::new(3)), None);
    }

    #[test]
    fn never_picks_current() {
        let mut rng = StdRng::seed_from_u64(7);
        let published = ids(&[1, 2, 5, 9]);
        for _ in 0..500 {
            let picked = pick(&mut rng, &published, PostId::new(5)).expect("some");
            assert_ne!(picked, PostId::new(5));
            assert!(published.contains(&picked));
        }
    }

    #[test]
    fn with_two_posts_picks_the_other() {
        let mut rng = StdRng::seed_from_u64(42);
        let published = ids(&[4, 8]);
        for _ in 0..50 {
            assert_eq!(pick(&mut rng, &published, PostId::new(8)), Some(PostId::new(4)));
        }
    }

    #[test]
    fn reaches_every_other_post() {
        let mut rng = StdRng::seed_from_u64(1);
        let published = ids(&[1, 2, 3, 4]);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..500 {
            seen.extend(pick(&mut rng, &published, PostId::new(1)));
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), ids(&[2, 3, 4]));
    }
}
