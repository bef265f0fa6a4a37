//! Accumulated missing-option reports.

use std::{error::Error, fmt};

/// A required option that no overlay supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingOption {
    option: String,
}

impl MissingOption {
    /// Report `option` as missing.
    #[must_use]
    pub fn new(option: impl Into<String>) -> Self {
        Self {
            option: option.into(),
        }
    }

    /// Dotted path naming the option, outermost context first.
    #[must_use]
    pub fn option(&self) -> &str {
        &self.option
    }

    fn with_context(self, context: &str) -> Self {
        Self {
            option: format!("{context}.{}", self.option),
        }
    }
}

impl fmt::Display for MissingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required option `{}`", self.option)
    }
}

/// Non-empty collection of [`MissingOption`]s gathered in one completion pass.
///
/// # Examples
///
/// ```
/// use tmp_postgres::MissingOptions;
///
/// let errors = MissingOptions::single("stdout")
///     .with_context("postgres")
///     .append(MissingOptions::single("logger"));
/// assert_eq!(errors.len(), 2);
/// assert!(errors.contains("postgres.stdout"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingOptions(Vec<MissingOption>);

impl MissingOptions {
    /// A report holding exactly one missing option.
    #[must_use]
    pub fn single(option: impl Into<String>) -> Self {
        Self(vec![MissingOption::new(option)])
    }

    /// Concatenate two reports, keeping their order.
    #[must_use]
    pub fn append(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Prefix every entry with `context`.
    #[must_use]
    pub fn with_context(self, context: &str) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|missing| missing.with_context(context))
                .collect(),
        )
    }

    /// Iterate over the contained entries.
    #[must_use = "iterators should be consumed to inspect missing options"]
    pub fn iter(&self) -> impl Iterator<Item = &MissingOption> {
        self.0.iter()
    }

    /// Number of missing options. Never zero.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no entries.
    ///
    /// Every constructor yields at least one entry and no operation removes
    /// one, so this is `false` for any report built through this API.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when `option` is among the entries.
    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        self.0.iter().any(|missing| missing.option == option)
    }
}

impl fmt::Display for MissingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {e}", i + 1)?;
        }
        Ok(())
    }
}

impl Error for MissingOptions {}

impl<'a> IntoIterator for &'a MissingOptions {
    type Item = &'a MissingOption;
    type IntoIter = std::slice::Iter<'a, MissingOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MissingOptions {
    type Item = MissingOption;
    type IntoIter = std::vec::IntoIter<MissingOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
