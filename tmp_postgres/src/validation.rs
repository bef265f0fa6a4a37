//! Accumulating validation for completing partial records.
//!
//! Completion never stops at the first gap. Independent fields are checked
//! separately and combined with [`Accumulate::and_also`], which concatenates
//! both error lists instead of short-circuiting.
//!
//! ```
//! use tmp_postgres::merge::Last;
//! use tmp_postgres::validation::{Accumulate, required};
//!
//! let host = required("host", Last::<String>::unset());
//! let port = required("port", Last::<u16>::unset());
//! let missing = host.and_also(port).unwrap_err();
//! assert_eq!(missing.len(), 2);
//! ```

use crate::{MissingOptions, merge::Last};

/// Outcome of completing a partial record.
pub type Validated<T> = Result<T, MissingOptions>;

/// Applicative combination of independent validations.
pub trait Accumulate<A> {
    /// Pair two validations, keeping every error from both sides.
    ///
    /// # Errors
    ///
    /// Returns the concatenated [`MissingOptions`] when either side failed.
    fn and_also<B>(self, other: Validated<B>) -> Validated<(A, B)>;

    /// Prefix every error with `context`.
    ///
    /// # Errors
    ///
    /// Returns the original errors, tagged, when validation failed.
    fn context(self, context: &str) -> Validated<A>;
}

impl<A> Accumulate<A> for Validated<A> {
    fn and_also<B>(self, other: Validated<B>) -> Validated<(A, B)> {
        match (self, other) {
            (Ok(a), Ok(b)) => Ok((a, b)),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            (Err(a), Err(b)) => Err(a.append(b)),
        }
    }

    fn context(self, context: &str) -> Validated<A> {
        self.map_err(|missing| missing.with_context(context))
    }
}

/// Require that some layer supplied `value`.
///
/// # Errors
///
/// Reports `option` as missing when the value is unset.
pub fn required<T>(option: &str, value: Last<T>) -> Validated<T> {
    value
        .into_option()
        .ok_or_else(|| MissingOptions::single(option))
}
