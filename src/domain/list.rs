//! Singly linked list whose links are `OptionalBox`es, with a forward cursor.

use tracing::instrument;

use crate::domain::cursor::{Aggregate, Cursor};
use crate::domain::optional::OptionalBox;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode<T> {
    pub data: T,
    pub next: OptionalBox<Box<ListNode<T>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedList<T> {
    head: OptionalBox<Box<ListNode<T>>>,
    len: usize,
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self {
            head: OptionalBox::empty(),
            len: 0,
        }
    }

    pub fn push_front(&mut self, data: T) {
        let next = std::mem::take(&mut self.head);
        self.head = OptionalBox::of(Box::new(ListNode { data, next }));
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn front(&self) -> OptionalBox<&T> {
        self.head.as_ref().map(|node| &node.data)
    }

    pub fn cursor(&self) -> ListCursor<'_, T> {
        ListCursor::new(self)
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    /// Keeps iteration order: the first item becomes the head.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        let mut list = Self::new();
        for item in items.into_iter().rev() {
            list.push_front(item);
        }
        list
    }
}

impl<T> Aggregate for LinkedList<T> {
    type Cursor<'a>
        = ListCursor<'a, T>
    where
        Self: 'a;

    fn cursor(&self) -> ListCursor<'_, T> {
        ListCursor::new(self)
    }
}

/// Follows `next` links from the head.
#[derive(Debug, Clone)]
pub struct ListCursor<'a, T> {
    current: OptionalBox<&'a ListNode<T>>,
}

impl<'a, T> ListCursor<'a, T> {
    #[instrument(level = "trace", skip(list), fields(len = list.len()))]
    fn new(list: &'a LinkedList<T>) -> Self {
        Self {
            current: list.head.as_ref().map(|node| &**node),
        }
    }
}

impl<'a, T> Cursor for ListCursor<'a, T> {
    type Item = &'a T;

    fn has_next(&self) -> bool {
        self.current.has_value()
    }

    fn next_value(&mut self) -> OptionalBox<&'a T> {
        let current = std::mem::take(&mut self.current);
        current.map(|node| {
            self.current = node.next.as_ref().map(|next| &**next);
            &node.data
        })
    }
}

impl<'a, T> Iterator for ListCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value().into_option()
    }
}
