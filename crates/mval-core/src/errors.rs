//! # Error Tree
//!
//! [`ErrorsCollection`] is the hierarchical result of a validation run: a
//! node holds its own errors plus named child nodes (member names, collection
//! indices, or the collection force key).
//!
//! ## Invariants
//!
//! - A node is empty iff it has no own errors and every child is empty.
//! - Empty children are never inserted. Every grafting operation prunes.
//! - [`ErrorsCollection::include`] merges children first, then appends the
//!   other node's own errors. This is how model-level findings combine with
//!   member-level findings at the same node.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::TemplateError;
use crate::message::{self, Arg};

/// A single validation finding: a message template and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    message: String,
    args: Vec<Arg>,
}

impl Error {
    /// An error without arguments.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            args: Vec::new(),
        }
    }

    /// An error whose message references the given arguments.
    pub fn with_args(message: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            message: message.into(),
            args,
        }
    }

    /// The unrendered message template.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Arguments available to the message template.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// The same arguments under a different message. Used when a message
    /// override applies to a rule that already carries arguments.
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            args: self.args.clone(),
        }
    }

    /// Render the message template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::DuplicateArgument`] if two arguments share a name.
    pub fn render(&self) -> Result<String, TemplateError> {
        message::render(&self.message, &self.args)
    }

    /// Render a substitute template (e.g. a translation) with this error's arguments.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::DuplicateArgument`] if two arguments share a name.
    pub fn render_as(&self, template: &str) -> Result<String, TemplateError> {
        message::render(template, &self.args)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}


/// A node of the error tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorsCollection {
    errors: Vec<Error>,
    members: BTreeMap<String, ErrorsCollection>,
}

impl ErrorsCollection {
    /// A fresh, empty node. Does not allocate, so "nothing found" results
    /// are built with this rather than shared through a static.
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            members: BTreeMap::new(),
        }
    }

    /// A node holding exactly one own error.
    pub fn with_single(error: Error) -> Self {
        Self {
            errors: vec![error],
            members: BTreeMap::new(),
        }
    }

    /// A one-error node, or `None` when there is no error.
    pub fn with_single_or_none(error: Option<Error>) -> Option<Self> {
        error.map(Self::with_single)
    }

    /// True iff no error exists anywhere in this subtree.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.members.values().all(ErrorsCollection::is_empty)
    }

    /// Own errors, in rule execution order.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Child nodes keyed by member name.
    pub fn members(&self) -> &BTreeMap<String, ErrorsCollection> {
        &self.members
    }

    /// Look up a direct child.
    pub fn member(&self, name: &str) -> Option<&ErrorsCollection> {
        self.members.get(name)
    }

    /// Follow a path of member names.
    pub fn at<'a, I>(&self, path: I) -> Option<&ErrorsCollection>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter()
            .try_fold(self, |node, segment| node.members.get(segment))
    }

    /// Total number of errors in the subtree.
    pub fn error_count(&self) -> usize {
        self.errors.len()
            + self
                .members
                .values()
                .map(ErrorsCollection::error_count)
                .sum::<usize>()
    }

    /// Dotted paths of every node that holds own errors, in key order.
    /// The root's own errors appear under the empty path.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths("", &mut out);
        out
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        if !self.errors.is_empty() {
            out.push(prefix.to_string());
        }
        for (name, child) in &self.members {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            child.collect_paths(&path, out);
        }
    }

    /// Append an own error.
    pub fn add_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Append an error to a child, creating the child on demand.
    pub fn add_member_error(&mut self, name: impl Into<String>, error: Error) {
        self.members.entry(name.into()).or_default().add_error(error);
    }

    /// Graft a subtree under `name`, merging if the child already exists.
    /// An empty subtree is ignored.
    pub fn add_member(&mut self, name: impl Into<String>, subtree: ErrorsCollection) {
        if subtree.is_empty() {
            return;
        }
        match self.members.entry(name.into()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(subtree);
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                slot.get_mut().include(subtree);
            }
        }
    }

    /// Merge another tree into this one: children first, then own errors.
    pub fn include(&mut self, other: ErrorsCollection) {
        if other.is_empty() {
            return;
        }
        for (name, child) in other.members {
            self.add_member(name, child);
        }
        self.errors.extend(other.errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(m: &str) -> Error {
        Error::new(m)
    }

    #[test]
    fn test_new_node_is_empty() {
        assert!(ErrorsCollection::new().is_empty());
        assert_eq!(ErrorsCollection::new(), ErrorsCollection::default());
    }

    #[test]
    fn test_add_member_prunes_empty_subtree() {
        let mut c = ErrorsCollection::new();
        c.add_member("Name", ErrorsCollection::new());
        assert!(c.members().is_empty());
        assert!(c.is_empty());
    }

    #[test]
    fn test_add_member_error_creates_child() {
        let mut c = ErrorsCollection::new();
        c.add_member_error("Email", err("bad"));
        assert!(!c.is_empty());
        assert_eq!(c.member("Email").unwrap().errors()[0].message(), "bad");
    }

    #[test]
    fn test_include_merges_members_then_errors() {
        let mut a = ErrorsCollection::with_single(err("a"));
        a.add_member_error("X", err("x1"));

        let mut b = ErrorsCollection::with_single(err("b"));
        b.add_member_error("X", err("x2"));
        b.add_member_error("Y", err("y"));

        a.include(b);
        let msgs: Vec<&str> = a.errors().iter().map(Error::message).collect();
        assert_eq!(msgs, ["a", "b"]);
        let x: Vec<&str> = a.member("X").unwrap().errors().iter().map(Error::message).collect();
        assert_eq!(x, ["x1", "x2"]);
        assert_eq!(a.member("Y").unwrap().errors().len(), 1);
    }

    #[test]
    fn test_include_empty_is_noop() {
        let mut a = ErrorsCollection::with_single(err("a"));
        let before = a.clone();
        a.include(ErrorsCollection::new());
        assert_eq!(a, before);
    }

    #[test]
    fn test_with_single_or_none() {
        assert!(ErrorsCollection::with_single_or_none(None).is_none());
        let c = ErrorsCollection::with_single_or_none(Some(err("e"))).unwrap();
        assert_eq!(c.error_count(), 1);
    }

    #[test]
    fn test_with_message_keeps_arguments() {
        let e = Error::with_args("at least {min}", vec![Arg::number("min", 3)]);
        let replaced = e.with_message("need {min}+");
        assert_eq!(replaced.args(), e.args());
        assert_eq!(replaced.render().unwrap(), "need 3+");
    }

    #[test]
    fn test_paths_and_at() {
        let mut tags = ErrorsCollection::new();
        tags.add_member_error("1", err("empty"));
        let mut root = ErrorsCollection::with_single(err("root"));
        root.add_member("Tags", tags);
        assert_eq!(root.paths(), vec!["".to_string(), "Tags.1".to_string()]);
        assert_eq!(root.at(["Tags", "1"]).unwrap().errors()[0].message(), "empty");
        assert!(root.at(["Tags", "0"]).is_none());
        assert_eq!(root.error_count(), 2);
    }
}
