//! Merge algebra used to layer configuration overlays.
//!
//! Every partial configuration record in this crate implements [`Combine`]:
//! an associative combination whose identity is the type's [`Default`]. Two
//! building blocks cover the field-level policies:
//!
//! - [`Merge`] wraps a combinable payload and records whether later layers
//!   should splice into it or replace it wholesale.
//! - [`Last`] keeps the most recently supplied value.
//!
//! ```
//! use tmp_postgres::merge::{Combine, Merge};
//!
//! let defaults = Merge::Splice(vec![String::from("fsync = off")]);
//! let overlay = Merge::Splice(vec![String::from("port = 5432")]);
//! assert_eq!(
//!     defaults.clone().combine(overlay).into_inner(),
//!     vec![String::from("fsync = off"), String::from("port = 5432")],
//! );
//!
//! let replaced = defaults.combine(Merge::Replace(Vec::new()));
//! assert!(replaced.into_inner().is_empty());
//! ```

use std::collections::BTreeMap;

/// Associative combination with [`Default`] as the two-sided identity.
///
/// Implementations must satisfy
/// `a.combine(b).combine(c) == a.combine(b.combine(c))` and
/// `Self::default().combine(a) == a == a.combine(Self::default())`.
/// Overlays are layered left to right, so the right operand is the later
/// layer.
pub trait Combine: Default {
    /// Combine `self` with a later layer.
    #[must_use]
    fn combine(self, later: Self) -> Self;

    /// Fold an iterator of layers, starting from the identity.
    #[must_use]
    fn combine_all<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        layers.into_iter().fold(Self::default(), Self::combine)
    }
}

/// Override container that either extends or replaces earlier layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Merge<T> {
    /// Combine with the surrounding layers using the payload's own
    /// [`Combine`] implementation.
    Splice(T),
    /// Discard every earlier layer.
    Replace(T),
}

impl<T> Merge<T> {
    /// Returns the wrapped payload, discarding the merge mode.
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Splice(value) | Self::Replace(value) => value,
        }
    }

    /// Borrows the wrapped payload.
    #[must_use]
    pub const fn get(&self) -> &T {
        match self {
            Self::Splice(value) | Self::Replace(value) => value,
        }
    }

    /// Returns `true` for [`Merge::Replace`].
    #[must_use]
    pub const fn is_replace(&self) -> bool {
        matches!(self, Self::Replace(_))
    }

    /// Applies `f` to the payload, keeping the merge mode.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Merge<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Splice(value) => Merge::Splice(f(value)),
            Self::Replace(value) => Merge::Replace(f(value)),
        }
    }
}

impl<T: Default> Default for Merge<T> {
    fn default() -> Self {
        Self::Splice(T::default())
    }
}

/// Combine two merge cells using `combine` for the payloads.
///
/// A later `Replace` always wins. An earlier `Replace` absorbs a later
/// `Splice` and stays a `Replace`.
pub fn combine_with<T, F>(earlier: Merge<T>, later: Merge<T>, combine: F) -> Merge<T>
where
    F: FnOnce(T, T) -> T,
{
    match (earlier, later) {
        (_, Merge::Replace(value)) => Merge::Replace(value),
        (Merge::Replace(a), Merge::Splice(b)) => Merge::Replace(combine(a, b)),
        (Merge::Splice(a), Merge::Splice(b)) => Merge::Splice(combine(a, b)),
    }
}

impl<T: Combine> Combine for Merge<T> {
    fn combine(self, later: Self) -> Self {
        combine_with(self, later, T::combine)
    }
}

/// Last-value-wins optional.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Last<T>(Option<T>);

impl<T> Last<T> {
    /// A layer that supplies `value`.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self(Some(value))
    }

    /// A layer that leaves the value untouched.
    #[must_use]
    pub const fn unset() -> Self {
        Self(None)
    }

    /// Borrows the value, if any layer supplied one.
    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Consumes the wrapper.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        self.0
    }

    /// Returns `true` when no layer supplied a value.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.0.is_none()
    }
}

impl<T> Default for Last<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> From<Option<T>> for Last<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> Combine for Last<T> {
    fn combine(self, later: Self) -> Self {
        Self(later.0.or(self.0))
    }
}

/// Sequences append.
impl<T> Combine for Vec<T> {
    fn combine(mut self, later: Self) -> Self {
        self.extend(later);
        self
    }
}

/// Keyed union; the later layer wins on conflicting keys.
impl<K: Ord, V> Combine for BTreeMap<K, V> {
    fn combine(mut self, later: Self) -> Self {
        self.extend(later);
        self
    }
}

/// `None` is the identity; two `Some` payloads combine.
impl<T: Combine> Combine for Option<T> {
    fn combine(self, later: Self) -> Self {
        match (self, later) {
            (Some(a), Some(b)) => Some(a.combine(b)),
            (a, None) => a,
            (None, b) => b,
        }
    }
}
