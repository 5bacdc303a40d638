use crate::{PostDate, PostId, ViewerKind};

/// Title shown in the admin listing for posts without one
pub const UNTITLED_LABEL: &str = "(untitled)";

pub const PLACEHOLDER_TITLE: &str = "Placeholder";
pub const PLACEHOLDER_BODY: &str = "You need to add a comic!";

/// A stored comic post, without its id (the id is the table key)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "bincode", derive(::bincode::Encode, ::bincode::Decode))]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct PostRecord {
    pub date: PostDate,
    pub title: String,
    pub published: bool,
    /// Djot markup
    pub body: String,
    pub views: u64,
    pub bot_views: u64,
}

impl PostRecord {
    /// A fresh post: published, nobody has seen it yet
    pub fn new(date: PostDate, title: String, body: String) -> Self {
        Self {
            date,
            title,
            published: true,
            body,
            views: 0,
            bot_views: 0,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_LABEL
        } else {
            &self.title
        }
    }

    pub fn count_view(&mut self, viewer: ViewerKind) {
        let counter = match viewer {
            ViewerKind::Human => &mut self.views,
            ViewerKind::Bot => &mut self.bot_views,
        };
        *counter = counter.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Post {
    pub id: PostId,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub record: PostRecord,
}

impl Post {
    pub fn new(id: PostId, record: PostRecord) -> Self {
        Self { id, record }
    }

    /// Stand-in shown while there is nothing to show. Never stored.
    pub fn placeholder() -> Self {
        Self {
            id: PostId::FIRST,
            record: PostRecord::new(
                PostDate::today(),
                PLACEHOLDER_TITLE.to_owned(),
                PLACEHOLDER_BODY.to_owned(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> PostRecord {
        PostRecord::new(
            "01/01/2024".parse().expect("valid"),
            title.to_owned(),
            String::new(),
        )
    }

    #[test]
    fn new_posts_are_published_and_unseen() {
        let r = record("x");
        assert!(r.published);
        assert_eq!((r.views, r.bot_views), (0, 0));
    }

    #[test]
    fn empty_title_gets_label() {
        assert_eq!(record("").display_title(), UNTITLED_LABEL);
        assert_eq!(record("Pilot").display_title(), "Pilot");
    }

    #[test]
    fn count_view_touches_one_counter() {
        let mut r = record("x");
        r.count_view(ViewerKind::Human);
        assert_eq!((r.views, r.bot_views), (1, 0));
        r.count_view(ViewerKind::Bot);
        r.count_view(ViewerKind::Bot);
        assert_eq!((r.views, r.bot_views), (1, 2));
    }

    #[test]
    fn placeholder_is_first_post() {
        let p = Post::placeholder();
        assert_eq!(p.id, PostId::FIRST);
        assert_eq!(p.record.title, PLACEHOLDER_TITLE);
    }
}
