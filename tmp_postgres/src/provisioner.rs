//! Operating-system side effects needed to materialise a plan.

use std::{
    env, io,
    net::{Ipv4Addr, TcpListener},
};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::{TmpPostgresError, TmpPostgresResult};

/// Source of ports and temporary directories.
///
/// Acquisition and release route every side effect through this trait so the
/// temporary root can be relocated and failures injected.
pub trait Provisioner {
    /// Find a TCP port that is currently free.
    ///
    /// # Errors
    ///
    /// Returns [`TmpPostgresError::FreePort`] when no port can be reserved.
    fn free_port(&self) -> TmpPostgresResult<u16>;

    /// Create a fresh directory whose name starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`TmpPostgresError::CreateDirectory`] when creation fails.
    fn create_temp_dir(&self, prefix: &str) -> TmpPostgresResult<Utf8PathBuf>;

    /// Recursively remove `path`.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error, including `NotFound`.
    fn remove_dir_all(&self, path: &Utf8Path) -> io::Result<()>;
}

impl<P: Provisioner + ?Sized> Provisioner for &P {
    fn free_port(&self) -> TmpPostgresResult<u16> {
        (**self).free_port()
    }

    fn create_temp_dir(&self, prefix: &str) -> TmpPostgresResult<Utf8PathBuf> {
        (**self).create_temp_dir(prefix)
    }

    fn remove_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        (**self).remove_dir_all(path)
    }
}

/// Provisioner backed by the real filesystem and network stack.
#[derive(Clone, Debug, Default)]
pub struct SystemProvisioner {
    root: Option<Utf8PathBuf>,
}

impl SystemProvisioner {
    /// Create temporary directories under `root` instead of the system
    /// temporary directory.
    #[must_use]
    pub fn in_root(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Directory that temporary directories are created under.
    ///
    /// # Errors
    ///
    /// Returns [`TmpPostgresError::NonUtf8Path`] when the system temporary
    /// directory is not valid UTF-8.
    pub fn root(&self) -> TmpPostgresResult<Utf8PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => {
                Utf8PathBuf::from_path_buf(env::temp_dir()).map_err(TmpPostgresError::NonUtf8Path)
            }
        }
    }
}

impl Provisioner for SystemProvisioner {
    fn free_port(&self) -> TmpPostgresResult<u16> {
        let listener =
            TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).map_err(TmpPostgresError::FreePort)?;
        let addr = listener.local_addr().map_err(TmpPostgresError::FreePort)?;
        Ok(addr.port())
    }

    fn create_temp_dir(&self, prefix: &str) -> TmpPostgresResult<Utf8PathBuf> {
        let root = self.root()?;
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(&root)
            .map_err(|source| TmpPostgresError::CreateDirectory {
                root: root.clone(),
                prefix: prefix.to_owned(),
                source,
            })?;
        Utf8PathBuf::from_path_buf(dir.keep()).map_err(TmpPostgresError::NonUtf8Path)
    }

    fn remove_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to remove '{path}'"),
            ));
        };
        let base = if parent.as_str().is_empty() {
            Utf8Path::new(".")
        } else {
            parent
        };
        Dir::open_ambient_dir(base, ambient_authority())?.remove_dir_all(name)
    }
}
