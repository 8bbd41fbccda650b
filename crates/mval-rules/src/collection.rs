//! # Collection Rules
//!
//! Item-count checks for members implementing
//! [`Collection`](mval_engine::Collection). They look at the collection as a
//! whole; per-item rules go through `as_collection`.

use mval_core::{Arg, Error};
use mval_engine::{Collection, MemberSpec};

use crate::messages;

/// Count checks on a collection member.
pub trait CollectionRules {
    /// At least one item.
    fn not_empty(&mut self) -> &mut Self;

    /// At least `min` items.
    fn min_count(&mut self, min: usize) -> &mut Self;

    /// At most `max` items.
    fn max_count(&mut self, max: usize) -> &mut Self;

    /// Exactly `count` items.
    fn exact_count(&mut self, count: usize) -> &mut Self;
}

impl<M, V> CollectionRules for MemberSpec<M, V>
where
    M: 'static,
    V: Collection + 'static,
{
    fn not_empty(&mut self) -> &mut Self {
        self.rule_with_error(
            |v: &V| v.items().next().is_some(),
            Error::new(messages::COLLECTION_NOT_EMPTY),
        )
    }

    fn min_count(&mut self, min: usize) -> &mut Self {
        self.rule_with_error(
            move |v: &V| v.items().count() >= min,
            Error::with_args(messages::MIN_COUNT, vec![Arg::number("min", min)]),
        )
    }

    fn max_count(&mut self, max: usize) -> &mut Self {
        self.rule_with_error(
            move |v: &V| v.items().count() <= max,
            Error::with_args(messages::MAX_COUNT, vec![Arg::number("max", max)]),
        )
    }

    fn exact_count(&mut self, count: usize) -> &mut Self {
        self.rule_with_error(
            move |v: &V| v.items().count() == count,
            Error::with_args(messages::EXACT_COUNT, vec![Arg::number("count", count)]),
        )
    }
}
