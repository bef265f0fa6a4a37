//! Directory provisioning: caller-owned paths or throwaway temporaries.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::{TmpPostgresError, TmpPostgresResult, merge::Combine, provisioner::Provisioner};

/// Name hint for the data directory.
pub const DATA_DIRECTORY_PREFIX: &str = "tmp-postgres-data";

/// A provisioned directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directory {
    /// Supplied by the caller; never deleted.
    Permanent(Utf8PathBuf),
    /// Created during acquisition; deleted on release.
    Temporary(Utf8PathBuf),
}

impl Directory {
    /// Location of the directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Permanent(path) | Self::Temporary(path) => path,
        }
    }

    /// Delete the directory if it was created during acquisition.
    ///
    /// A temporary directory that is already gone counts as released.
    ///
    /// # Errors
    ///
    /// Returns [`TmpPostgresError::RemoveDirectory`] for any other removal
    /// failure.
    pub fn release(&self, provisioner: &impl Provisioner) -> TmpPostgresResult<()> {
        let Self::Temporary(path) = self else {
            return Ok(());
        };
        debug!(%path, "removing temporary directory");
        match provisioner.remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(%path, "temporary directory already removed");
                Ok(())
            }
            Err(source) => Err(TmpPostgresError::RemoveDirectory {
                path: path.clone(),
                source,
            }),
        }
    }
}

/// Directory overlay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PartialDirectory {
    /// Use this path as is.
    Permanent(Utf8PathBuf),
    /// Create a temporary directory.
    #[default]
    Unspecified,
}

impl PartialDirectory {
    /// Materialise the overlay, creating a directory named after `prefix`
    /// when no path was supplied.
    ///
    /// # Errors
    ///
    /// Propagates the provisioner's creation failure.
    pub fn provision(
        self,
        prefix: &str,
        provisioner: &impl Provisioner,
    ) -> TmpPostgresResult<Directory> {
        match self {
            Self::Permanent(path) => Ok(Directory::Permanent(path)),
            Self::Unspecified => {
                let path = provisioner.create_temp_dir(prefix)?;
                debug!(%path, prefix, "created temporary directory");
                Ok(Directory::Temporary(path))
            }
        }
    }
}

impl Combine for PartialDirectory {
    fn combine(self, later: Self) -> Self {
        match later {
            Self::Permanent(path) => Self::Permanent(path),
            Self::Unspecified => self,
        }
    }
}
