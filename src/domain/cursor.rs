//! External cursors (Iterator pattern) yielding `OptionalBox` values.
//!
//! A cursor is created fresh from its aggregate and is single-pass: restart
//! by asking the aggregate for a new one. Asking a cursor whether it has more
//! elements never moves it, and advancing past the end keeps returning empty
//! boxes.

use tracing::instrument;

use crate::domain::optional::OptionalBox;

/// Forward cursor over an aggregate.
pub trait Cursor {
    type Item;

    fn has_next(&self) -> bool;

    /// Advance by exactly one element; empty box past the end.
    fn next_value(&mut self) -> OptionalBox<Self::Item>;
}

/// Cursor that can also walk backwards.
pub trait BidirectionalCursor: Cursor {
    fn has_previous(&self) -> bool;

    /// Step back by exactly one element; empty box before the start.
    fn previous_value(&mut self) -> OptionalBox<Self::Item>;
}

/// Anything that hands out independent cursors over its elements.
pub trait Aggregate {
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    fn cursor(&self) -> Self::Cursor<'_>;
}

/// Bidirectional cursor over a slice.
///
/// `position` is the gap before the element the next forward step returns,
/// so `0..=len` are all valid positions.
#[derive(Debug, Clone)]
pub struct ArrayCursor<'a, T> {
    items: &'a [T],
    position: usize,
}

impl<'a, T> ArrayCursor<'a, T> {
    #[instrument(level = "trace", skip(items), fields(len = items.len()))]
    pub fn new(items: &'a [T]) -> Self {
        Self { items, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a, T> Cursor for ArrayCursor<'a, T> {
    type Item = &'a T;

    fn has_next(&self) -> bool {
        self.position < self.items.len()
    }

    fn next_value(&mut self) -> OptionalBox<&'a T> {
        match self.items.get(self.position) {
            Some(item) => {
                self.position += 1;
                OptionalBox::of(item)
            }
            None => OptionalBox::empty(),
        }
    }
}

impl<'a, T> BidirectionalCursor for ArrayCursor<'a, T> {
    fn has_previous(&self) -> bool {
        self.position > 0
    }

    fn previous_value(&mut self) -> OptionalBox<&'a T> {
        if !self.has_previous() {
            return OptionalBox::empty();
        }
        self.position -= 1;
        OptionalBox::of(&self.items[self.position])
    }
}

impl<'a, T> Iterator for ArrayCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value().into_option()
    }
}

impl<T> Aggregate for [T] {
    type Cursor<'a>
        = ArrayCursor<'a, T>
    where
        Self: 'a;

    fn cursor(&self) -> ArrayCursor<'_, T> {
        ArrayCursor::new(self)
    }
}
