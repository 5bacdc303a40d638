use crate::define_seq_id_type;

define_seq_id_type!(
    /// Identifier of a comic post
    ///
    /// It is also the reading-order position of the post: navigation walks
    /// posts by ascending id, and reordering posts swaps their ids.
    struct PostId
);

define_seq_id_type!(
    /// Identifier of a registered account
    struct UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_id_parses_only_plain_numbers() {
        assert_eq!("12".parse::<PostId>().ok(), Some(PostId::new(12)));
        assert!("-1".parse::<PostId>().is_err());
        assert!("12a".parse::<PostId>().is_err());
        assert!("".parse::<PostId>().is_err());
    }

    #[test]
    fn post_id_neighbours() {
        assert_eq!(PostId::ZERO.prev(), None);
        assert_eq!(PostId::FIRST.prev(), Some(PostId::ZERO));
        assert_eq!(PostId::new(4).next(), Some(PostId::new(5)));
        assert_eq!(PostId::MAX.next(), None);
    }
}
