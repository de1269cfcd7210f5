/*
Rendering of composite trees for display.

termtree::Tree is a foreign type, so conversions live behind a local trait
instead of inherent impls (E0116).
 */
use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{Component, OptionalBox};

/// Label used for composites that carry no value of their own.
pub const UNNAMED_COMPOSITE: &str = "*";

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T: Display> TreeNodeConvert for Component<T> {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let label = match self.value() {
            OptionalBox::Present(value) => value.to_string(),
            OptionalBox::Absent => UNNAMED_COMPOSITE.to_string(),
        };

        // Recursively construct the children
        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|c| c.to_tree_string())
            .collect();

        Tree::new(label).with_leaves(leaves)
    }
}
