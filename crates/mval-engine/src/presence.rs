//! # Presence and Collections
//!
//! The executor needs two facts about a member value that Rust types do not
//! state uniformly: whether the value "exists" (drives required-error
//! semantics) and, for collection rules, how to enumerate its items.
//!
//! [`Presence`] answers the first. `Option<T>` is present iff `Some`, smart
//! pointers delegate to their target, and everything else is present by
//! default. Model types used as members opt in with an empty impl:
//!
//! ```
//! use mval_engine::Presence;
//!
//! struct Address {
//!     street: String,
//! }
//!
//! impl Presence for Address {}
//! ```
//!
//! [`Collection`] answers the second for the std sequence and set types.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Whether a member value exists for validation purposes.
pub trait Presence {
    /// True unless the value represents absence.
    fn is_present(&self) -> bool {
        true
    }
}

impl<T> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

impl<T: Presence + ?Sized> Presence for Box<T> {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

impl<T: Presence + ?Sized> Presence for Arc<T> {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

impl<T: Presence + ?Sized> Presence for Rc<T> {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

impl<T: Presence + ?Sized> Presence for &T {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

macro_rules! always_present {
    ($($t:ty),* $(,)?) => {
        $(impl Presence for $t {})*
    };
}

always_present!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    str, String,
);

impl<T> Presence for [T] {}
impl<T, const N: usize> Presence for [T; N] {}
impl<T> Presence for Vec<T> {}
impl<T> Presence for VecDeque<T> {}
impl<T> Presence for LinkedList<T> {}
impl<T> Presence for BTreeSet<T> {}
impl<T, S> Presence for HashSet<T, S> {}
impl<K, V> Presence for BTreeMap<K, V> {}
impl<K, V, S> Presence for HashMap<K, V, S> {}

/// A value whose items can be validated one by one.
pub trait Collection {
    /// Item type.
    type Item;

    /// Iterator over borrowed items.
    type Iter<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;

    /// Items in iteration order. Their position becomes the error key.
    fn items(&self) -> Self::Iter<'_>;
}

impl<T> Collection for Vec<T> {
    type Item = T;
    type Iter<'a> = std::slice::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T, const N: usize> Collection for [T; N] {
    type Item = T;
    type Iter<'a> = std::slice::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T> Collection for Box<[T]> {
    type Item = T;
    type Iter<'a> = std::slice::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T> Collection for VecDeque<T> {
    type Item = T;
    type Iter<'a> = std::collections::vec_deque::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T> Collection for LinkedList<T> {
    type Item = T;
    type Iter<'a> = std::collections::linked_list::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T> Collection for BTreeSet<T> {
    type Item = T;
    type Iter<'a> = std::collections::btree_set::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl<T, S> Collection for HashSet<T, S> {
    type Item = T;
    type Iter<'a> = std::collections::hash_set::Iter<'a, T> where Self: 'a;

    fn items(&self) -> Self::Iter<'_> {
        self.iter()
    }
}
