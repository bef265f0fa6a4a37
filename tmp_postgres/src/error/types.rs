//! Primary error enum for planning and provisioning flows.

use std::{io, path::PathBuf};

use camino::Utf8PathBuf;
use figment::Error as FigmentError;
use thiserror::Error;

use super::MissingOptions;

/// Result alias used throughout the crate.
pub type TmpPostgresResult<T> = Result<T, TmpPostgresError>;

/// Errors that can occur while building or releasing resources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TmpPostgresError {
    /// The merged overlays left required options unset.
    #[error("incomplete plan:\n{0}")]
    Incomplete(MissingOptions),

    /// A temporary directory could not be created.
    #[error("failed to create a '{prefix}' directory under '{root}': {source}")]
    CreateDirectory {
        /// Temporary root the directory was created under.
        root: Utf8PathBuf,
        /// Name hint passed to the temporary directory builder.
        prefix: String,
        /// Underlying filesystem failure.
        #[source]
        source: io::Error,
    },

    /// A temporary directory could not be removed.
    #[error("failed to remove '{path}': {source}")]
    RemoveDirectory {
        /// Directory that failed to be removed.
        path: Utf8PathBuf,
        /// Underlying filesystem failure.
        #[source]
        source: io::Error,
    },

    /// A file backing a standard stream could not be opened.
    #[error("failed to open stream file '{path}': {source}")]
    OpenStream {
        /// File the stream was bound to.
        path: Utf8PathBuf,
        /// Underlying filesystem failure.
        #[source]
        source: io::Error,
    },

    /// A provisioned path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// No free TCP port could be reserved.
    #[error("failed to find a free port: {0}")]
    FreePort(#[source] io::Error),

    /// Settings could not be extracted from their providers.
    #[error("failed to load settings: {0}")]
    Settings(#[from] Box<FigmentError>),

    /// An acquisition step failed and rolling back earlier steps failed too.
    #[error("{cause} (rollback also failed: {rollback})")]
    Rollback {
        /// Failure that triggered the rollback.
        cause: Box<TmpPostgresError>,
        /// Failure raised while releasing earlier resources.
        rollback: Box<TmpPostgresError>,
    },
}

impl From<MissingOptions> for TmpPostgresError {
    fn from(missing: MissingOptions) -> Self {
        Self::Incomplete(missing)
    }
}

impl From<FigmentError> for TmpPostgresError {
    fn from(e: FigmentError) -> Self {
        Self::Settings(Box::new(e))
    }
}

impl TmpPostgresError {
    /// Returns the missing options when this is an incomplete-plan error.
    #[must_use]
    pub const fn missing_options(&self) -> Option<&MissingOptions> {
        match self {
            Self::Incomplete(missing) => Some(missing),
            _ => None,
        }
    }
}
