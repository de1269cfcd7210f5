//! Explicit zero-or-one value container.
//!
//! `OptionalBox<T>` replaces nullable references: the variant carries the
//! presence, so there is no flag that can disagree with the stored value.

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// A box holding either exactly one value or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalBox<T> {
    Present(T),
    Absent,
}

impl<T> Default for OptionalBox<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> OptionalBox<T> {
    /// Box holding `value`. Zero, empty strings and `false` are present values.
    pub fn of(value: T) -> Self {
        Self::Present(value)
    }

    pub fn empty() -> Self {
        Self::Absent
    }

    pub fn has_value(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Borrow the wrapped value.
    ///
    /// Fails with [`DomainError::EmptyValueAccess`] when the box is empty,
    /// so callers are expected to check [`has_value`](Self::has_value) first.
    pub fn get_value(&self) -> DomainResult<&T> {
        match self {
            Self::Present(value) => Ok(value),
            Self::Absent => Err(DomainError::EmptyValueAccess),
        }
    }

    /// Hand the wrapped value over to the caller.
    pub fn into_value(self) -> DomainResult<T> {
        match self {
            Self::Present(value) => Ok(value),
            Self::Absent => Err(DomainError::EmptyValueAccess),
        }
    }

    pub fn as_ref(&self) -> OptionalBox<&T> {
        match self {
            Self::Present(value) => OptionalBox::Present(value),
            Self::Absent => OptionalBox::Absent,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> OptionalBox<U> {
        match self {
            Self::Present(value) => OptionalBox::Present(f(value)),
            Self::Absent => OptionalBox::Absent,
        }
    }

    pub fn value_or(self, default: T) -> T {
        match self {
            Self::Present(value) => value,
            Self::Absent => default,
        }
    }

    pub fn into_option(self) -> Option<T> {
        self.into()
    }
}

impl<T: Truthy> OptionalBox<T> {
    /// Legacy construction rule: falsy values produce an empty box.
    ///
    /// Only for callers that depend on `0`, `""` or `false` meaning "no value".
    pub fn from_truthy(value: T) -> Self {
        if value.is_truthy() {
            Self::Present(value)
        } else {
            Self::Absent
        }
    }
}

impl<T: Clone> OptionalBox<&T> {
    pub fn cloned(self) -> OptionalBox<T> {
        self.map(Clone::clone)
    }
}

impl<T> From<Option<T>> for OptionalBox<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Absent,
        }
    }
}

impl<T> From<OptionalBox<T>> for Option<T> {
    fn from(value: OptionalBox<T>) -> Self {
        match value {
            OptionalBox::Present(v) => Some(v),
            OptionalBox::Absent => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for OptionalBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(value) => write!(f, "{value}"),
            Self::Absent => write!(f, "<empty>"),
        }
    }
}

/// Truthiness as used by [`OptionalBox::from_truthy`].
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

macro_rules! impl_truthy_for_numbers {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            fn is_truthy(&self) -> bool {
                *self != 0
            }
        })*
    };
}

impl_truthy_for_numbers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Truthy for f32 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for &str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(42)]
    fn given_any_number_when_boxed_then_present(#[case] value: i64) {
        let boxed = OptionalBox::of(value);
        assert!(boxed.has_value());
        assert_eq!(boxed.get_value(), Ok(&value));
    }

    #[test]
    fn given_empty_box_when_reading_then_empty_value_access() {
        let boxed: OptionalBox<String> = OptionalBox::empty();
        assert!(!boxed.has_value());
        assert_eq!(boxed.get_value(), Err(DomainError::EmptyValueAccess));
        assert_eq!(boxed.into_value(), Err(DomainError::EmptyValueAccess));
    }

    #[rstest]
    #[case(0, false)]
    #[case(7, true)]
    fn given_legacy_rule_when_boxing_number_then_zero_is_absent(
        #[case] value: i32,
        #[case] present: bool,
    ) {
        assert_eq!(OptionalBox::from_truthy(value).has_value(), present);
    }

    #[test]
    fn given_legacy_rule_when_boxing_falsy_values_then_absent() {
        assert!(!OptionalBox::from_truthy("").has_value());
        assert!(!OptionalBox::from_truthy(false).has_value());
        assert!(!OptionalBox::from_truthy(0.0_f64).has_value());
        assert!(OptionalBox::from_truthy("x").has_value());
    }

    #[test]
    fn given_option_when_converting_then_presence_preserved() {
        assert_eq!(OptionalBox::from(Some(false)), OptionalBox::Present(false));
        assert_eq!(OptionalBox::<u8>::from(None), OptionalBox::Absent);
        assert_eq!(OptionalBox::of(3).map(|v| v * 2).into_option(), Some(6));
        assert_eq!(OptionalBox::<i32>::empty().value_or(9), 9);
    }

    #[test]
    fn given_box_when_displayed_then_shows_value_or_marker() {
        assert_eq!(OptionalBox::of(5).to_string(), "5");
        assert_eq!(OptionalBox::<i32>::empty().to_string(), "<empty>");
    }
}
