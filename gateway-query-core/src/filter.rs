//! Exclusion filter over dot-path prefixes.
//!
//! Keys whose path starts with a reserved prefix are skipped by the binder,
//! typically because the router already bound them from path-template
//! variables.

use std::collections::HashMap;

/// A set of reserved path prefixes stored as a segment trie.
///
/// A path is excluded if any reserved prefix is a component-wise prefix of
/// it: reserving `book.name` excludes `book.name` and `book.name.first`, but
/// not `book` or `book.names`.
///
/// # Example
///
/// ```
/// use gateway_query_core::ExclusionFilter;
///
/// let filter = ExclusionFilter::from_dotted(["parent", "book.name"]);
///
/// assert!(filter.excludes(&["parent"]));
/// assert!(filter.excludes(&["book", "name", "first"]));
/// assert!(!filter.excludes(&["book"]));
/// assert!(!filter.excludes(&["book", "title"]));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExclusionFilter {
    root: Node,
}

#[derive(Clone, Debug, Default)]
struct Node {
    /// A reserved prefix ends here.
    terminal: bool,
    children: HashMap<String, Node>,
}

impl ExclusionFilter {
    /// Create a filter that excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from dot-separated prefixes such as `book.name`.
    pub fn from_dotted<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::new();
        for prefix in prefixes {
            filter.insert_dotted(prefix.as_ref());
        }
        filter
    }

    /// Reserve a prefix given as segments. Empty prefixes are ignored.
    pub fn insert<I, S>(&mut self, prefix: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node = &mut self.root;
        let mut depth = 0;
        for segment in prefix {
            node = node.children.entry(segment.into()).or_default();
            depth += 1;
        }
        if depth > 0 {
            node.terminal = true;
        }
    }

    /// Reserve a dot-separated prefix.
    pub fn insert_dotted(&mut self, prefix: &str) {
        if prefix.is_empty() {
            return;
        }
        self.insert(prefix.split('.'));
    }

    /// Returns whether some reserved prefix is a prefix of `path`.
    pub fn excludes<S: AsRef<str>>(&self, path: &[S]) -> bool {
        let mut node = &self.root;
        for segment in path {
            match node.children.get(segment.as_ref()) {
                Some(child) if child.terminal => return true,
                Some(child) => node = child,
                None => return false,
            }
        }
        false
    }

    /// Returns whether no prefix is reserved.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}
