//! Scope chains for field resolution.
//!
//! A [`ScopeChain`] is the list of data mappings visible at one point of a
//! template, innermost first. Entering a section row pushes that row in front
//! of the chain; leaving it drops the link again. The chain lives on the stack
//! and links borrow their parents, so pushing a row never copies data.
//!
//! Resolution scans innermost to outermost and returns the first value that
//! is not an empty string. A row that maps a key to `""` does not hide a value
//! further out, while a row that maps it to an empty row list does.
//!
//! ## Examples
//!
//! ```rust
//! use sectionfmt::{data, ScopeChain, Value};
//!
//! let root = data!({ "a": "outer", "b": "root" });
//! let row = data!({ "a": "inner", "b": "" });
//!
//! let scopes = ScopeChain::root(&root);
//! let scopes = scopes.push(&row);
//!
//! assert_eq!(scopes.resolve("a"), Some(&Value::from("inner")));
//! assert_eq!(scopes.resolve("b"), Some(&Value::from("root")));
//! assert_eq!(scopes.resolve("missing"), None);
//! ```

use crate::{DataMap, Value};

/// An innermost-first chain of data mappings.
#[derive(Clone, Copy, Debug)]
pub struct ScopeChain<'s, 'd> {
    head: &'d DataMap,
    parent: Option<&'s ScopeChain<'s, 'd>>,
}

impl<'s, 'd> ScopeChain<'s, 'd> {
    /// Creates a chain holding only the root data.
    #[must_use]
    pub fn root(data: &'d DataMap) -> Self {
        ScopeChain {
            head: data,
            parent: None,
        }
    }

    /// Returns a new chain with `row` in front of this one.
    #[must_use]
    pub fn push<'a>(&'a self, row: &'d DataMap) -> ScopeChain<'a, 'd> {
        ScopeChain {
            head: row,
            parent: Some(self),
        }
    }

    /// Iterates the mappings of this chain, innermost first.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'d DataMap> + 'a {
        let innermost: &'a ScopeChain<'a, 'd> = self;
        std::iter::successors(Some(innermost), |scope| scope.parent).map(|scope| scope.head)
    }

    /// The chain enclosing the innermost row, or `self` at the root.
    #[must_use]
    pub fn parent(&self) -> &Self {
        match self.parent {
            Some(parent) => parent,
            None => self,
        }
    }

    /// Number of mappings in the chain.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Resolves `name` to its innermost value, skipping empty strings.
    ///
    /// Returns `None` when no mapping holds anything but `""` for `name`;
    /// callers treat that as an empty string or zero rows.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&'d Value> {
        self.iter()
            .filter_map(|scope| scope.get(name))
            .find(|value| value.as_str() != Some(""))
    }
}
