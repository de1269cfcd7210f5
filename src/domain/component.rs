//! Composite trees with predicate queries and lazy pre-order cursors.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::cursor::{Aggregate, Cursor};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::optional::OptionalBox;

/// A node of a composite tree: a leaf with one value, or a composite owning
/// an ordered list of children and optionally a value of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component<T> {
    Leaf {
        value: T,
    },
    Composite {
        value: OptionalBox<T>,
        children: Vec<Component<T>>,
    },
}

/// Whether a childless composite takes part in `count` and `first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountPolicy {
    /// Only leaves are tested; composites aggregate their children.
    #[default]
    LeafOnly,
    /// A composite without children is tested against its own value.
    SelfCountsIfChildless,
}

impl CountPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeafOnly => "leaf-only",
            Self::SelfCountsIfChildless => "self-counts-if-childless",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "leaf-only" => Some(Self::LeafOnly),
            "self-counts-if-childless" => Some(Self::SelfCountsIfChildless),
            _ => None,
        }
    }
}

/// Outcome of [`Component::remove_child`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal<T> {
    Removed(Component<T>),
    NothingToRemove,
}

impl<T> Removal<T> {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }
}

impl<T> Component<T> {
    pub fn leaf(value: T) -> Self {
        Self::Leaf { value }
    }

    pub fn composite() -> Self {
        Self::Composite {
            value: OptionalBox::empty(),
            children: Vec::new(),
        }
    }

    pub fn composite_with(value: T) -> Self {
        Self::Composite {
            value: OptionalBox::of(value),
            children: Vec::new(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite { .. })
    }

    pub fn value(&self) -> OptionalBox<&T> {
        match self {
            Self::Leaf { value } => OptionalBox::of(value),
            Self::Composite { value, .. } => value.as_ref(),
        }
    }

    pub fn children(&self) -> &[Component<T>] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Composite { children, .. } => children,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Append `child` to this composite.
    ///
    /// Leaves cannot hold children; asking them to is a structural violation.
    pub fn add_child(&mut self, child: Component<T>) -> DomainResult<&mut Self> {
        if let Self::Composite { children, .. } = self {
            children.push(child);
            return Ok(self);
        }
        Err(DomainError::structural("cannot add a child to a leaf"))
    }

    /// Builder-style variant of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: Component<T>) -> DomainResult<Self> {
        self.add_child(child)?;
        Ok(self)
    }

    /// Remove the first child structurally equal to `child`.
    ///
    /// Never fails: a missing child (or a leaf receiver) reports
    /// [`Removal::NothingToRemove`] and leaves the tree untouched.
    pub fn remove_child(&mut self, child: &Component<T>) -> Removal<T>
    where
        T: PartialEq,
    {
        let Self::Composite { children, .. } = self else {
            return Removal::NothingToRemove;
        };
        match children.iter().position(|c| c == child) {
            Some(idx) => Removal::Removed(children.remove(idx)),
            None => {
                debug!("nothing to remove");
                Removal::NothingToRemove
            }
        }
    }

    fn tests_self<P: Fn(&T) -> bool>(&self, policy: CountPolicy, predicate: &P) -> bool {
        match self {
            Self::Leaf { value } => predicate(value),
            Self::Composite { value, children } => {
                policy == CountPolicy::SelfCountsIfChildless
                    && children.is_empty()
                    && matches!(value, OptionalBox::Present(v) if predicate(v))
            }
        }
    }

    /// Number of nodes satisfying `predicate` under the given policy.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn count<P: Fn(&T) -> bool>(&self, policy: CountPolicy, predicate: P) -> usize {
        let mut stack = vec![self];
        let mut n = 0;
        while let Some(node) = stack.pop() {
            n += usize::from(node.tests_self(policy, &predicate));
            stack.extend(node.children());
        }
        n
    }

    /// First value in depth-first insertion order satisfying `predicate`.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn first<P: Fn(&T) -> bool>(&self, policy: CountPolicy, predicate: P) -> OptionalBox<&T> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.tests_self(policy, &predicate) {
                return node.value();
            }
            push_children(&mut stack, node);
        }
        OptionalBox::empty()
    }

    /// Cursor over every value in pre-order (own value before children).
    pub fn cursor(&self) -> PreOrderCursor<'_, T> {
        PreOrderCursor::new(self)
    }

    /// Cursor over leaf values only, in the same order.
    pub fn leaf_cursor(&self) -> LeafCursor<'_, T> {
        LeafCursor::new(self)
    }

    pub fn leaves(&self) -> Vec<&T> {
        self.leaf_cursor().collect()
    }

    /// Number of values a pre-order cursor yields.
    pub fn len(&self) -> usize {
        self.cursor().count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cursor().has_next()
    }

    pub fn depth(&self) -> usize {
        let mut stack = vec![(self, 1)];
        let mut deepest = 0;
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children().iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    pub fn fold_leaves<A, F: FnMut(A, &T) -> A>(&self, init: A, f: F) -> A {
        self.leaf_cursor().fold(init, f)
    }

    pub fn sum<'a, S>(&'a self) -> S
    where
        S: std::iter::Sum<&'a T>,
    {
        self.leaf_cursor().sum()
    }

    /// Same shape, every value passed through `f`.
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Component<U> {
        self.map_with(&mut f)
    }

    fn map_with<U, F: FnMut(&T) -> U>(&self, f: &mut F) -> Component<U> {
        match self {
            Self::Leaf { value } => Component::Leaf { value: f(value) },
            Self::Composite { value, children } => Component::Composite {
                value: value.as_ref().map(&mut *f),
                children: children.iter().map(|c| c.map_with(f)).collect(),
            },
        }
    }
}

// Descendants are moved onto a heap stack; dropping never recurses.
impl<T> Drop for Component<T> {
    fn drop(&mut self) {
        let Self::Composite { children, .. } = self else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut node) = pending.pop() {
            if let Self::Composite { children, .. } = &mut node {
                pending.append(children);
            }
        }
    }
}

impl<T> Aggregate for Component<T> {
    type Cursor<'a>
        = PreOrderCursor<'a, T>
    where
        Self: 'a;

    fn cursor(&self) -> PreOrderCursor<'_, T> {
        PreOrderCursor::new(self)
    }
}

fn push_children<'a, T>(stack: &mut Vec<&'a Component<T>>, node: &'a Component<T>) {
    // reversed so the first child is popped first
    stack.extend(node.children().iter().rev());
}

/// Depth-first pre-order cursor over all values of a tree.
///
/// The stack is kept settled: its top, if any, is always a node carrying a
/// value, which makes `has_next` exact without moving the cursor.
#[derive(Debug, Clone)]
pub struct PreOrderCursor<'a, T> {
    stack: Vec<&'a Component<T>>,
}

impl<'a, T> PreOrderCursor<'a, T> {
    #[instrument(level = "trace", skip(root))]
    fn new(root: &'a Component<T>) -> Self {
        let mut cursor = Self { stack: vec![root] };
        cursor.settle();
        cursor
    }

    fn settle(&mut self) {
        while let Some(&top) = self.stack.last() {
            if top.value().has_value() {
                break;
            }
            self.stack.pop();
            push_children(&mut self.stack, top);
        }
    }
}

impl<'a, T> Cursor for PreOrderCursor<'a, T> {
    type Item = &'a T;

    fn has_next(&self) -> bool {
        !self.stack.is_empty()
    }

    fn next_value(&mut self) -> OptionalBox<&'a T> {
        let Some(node) = self.stack.pop() else {
            return OptionalBox::empty();
        };
        push_children(&mut self.stack, node);
        self.settle();
        node.value()
    }
}

impl<'a, T> Iterator for PreOrderCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value().into_option()
    }
}

/// Depth-first cursor over leaf values only.
#[derive(Debug, Clone)]
pub struct LeafCursor<'a, T> {
    stack: Vec<&'a Component<T>>,
}

impl<'a, T> LeafCursor<'a, T> {
    #[instrument(level = "trace", skip(root))]
    fn new(root: &'a Component<T>) -> Self {
        let mut cursor = Self { stack: vec![root] };
        cursor.settle();
        cursor
    }

    fn settle(&mut self) {
        while let Some(&top) = self.stack.last() {
            if !top.is_composite() {
                break;
            }
            self.stack.pop();
            push_children(&mut self.stack, top);
        }
    }
}

impl<'a, T> Cursor for LeafCursor<'a, T> {
    type Item = &'a T;

    fn has_next(&self) -> bool {
        !self.stack.is_empty()
    }

    fn next_value(&mut self) -> OptionalBox<&'a T> {
        let Some(node) = self.stack.pop() else {
            return OptionalBox::empty();
        };
        self.settle();
        node.value()
    }
}

impl<'a, T> Iterator for LeafCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value().into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_leaf_when_adding_child_then_structural_violation() {
        let mut leaf = Component::leaf(1);
        let result = leaf.add_child(Component::leaf(2));
        assert!(matches!(result, Err(DomainError::StructuralViolation(_))));
    }

    #[test]
    fn given_composite_without_value_when_walking_then_only_children_yielded() {
        let tree = Component::composite()
            .with_child(Component::leaf(1))
            .unwrap()
            .with_child(Component::composite())
            .unwrap();
        let mut cursor = tree.cursor();
        assert!(cursor.has_next());
        assert_eq!(cursor.next_value(), OptionalBox::of(&1));
        assert!(!cursor.has_next());
    }

    #[test]
    fn given_tree_of_empty_composites_when_walking_then_has_next_is_false() {
        let tree = Component::<u8>::composite()
            .with_child(Component::composite())
            .unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn given_leaf_receiver_when_removing_then_nothing_to_remove() {
        let mut leaf = Component::leaf("a");
        assert_eq!(
            leaf.remove_child(&Component::leaf("a")),
            Removal::NothingToRemove
        );
    }
}
