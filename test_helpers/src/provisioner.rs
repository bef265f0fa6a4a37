//! A [`Provisioner`] rooted in a private temporary directory.
//!
//! Every created and removed directory is recorded. Creation can be made to
//! fail for a chosen name prefix, which is how tests force a failure after
//! earlier resources were acquired.
//!
//! # Examples
//!
//! ```
//! use tmp_postgres_test_helpers::RecordingProvisioner;
//! use tmp_postgres::Provisioner;
//!
//! let provisioner = RecordingProvisioner::new()?;
//! let dir = provisioner.create_temp_dir("tmp-postgres-data")?;
//! assert_eq!(provisioner.created(), vec![dir]);
//! # Ok::<_, anyhow::Error>(())
//! ```

use std::io;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use parking_lot::Mutex;
use tempfile::TempDir;
use tmp_postgres::{Provisioner, SystemProvisioner, TmpPostgresError, TmpPostgresResult};

#[derive(Debug, Default)]
struct Ledger {
    created: Vec<Utf8PathBuf>,
    removed: Vec<Utf8PathBuf>,
    port_queries: usize,
}

/// Provisioner that records its side effects.
///
/// The temporary root is deleted when the provisioner is dropped.
#[derive(Debug)]
pub struct RecordingProvisioner {
    _root: TempDir,
    root_path: Utf8PathBuf,
    system: SystemProvisioner,
    failing_prefix: Option<String>,
    ledger: Mutex<Ledger>,
}

impl RecordingProvisioner {
    /// Create a provisioner with a fresh temporary root.
    ///
    /// # Errors
    ///
    /// Returns an error when the root cannot be created or is not UTF-8.
    pub fn new() -> Result<Self> {
        let root = tempfile::tempdir().context("create provisioner root")?;
        let root_path = Utf8PathBuf::from_path_buf(root.path().to_path_buf())
            .map_err(|path| anyhow!("non-UTF-8 temp root: {}", path.display()))?;
        Ok(Self {
            system: SystemProvisioner::in_root(root_path.clone()),
            _root: root,
            root_path,
            failing_prefix: None,
            ledger: Mutex::new(Ledger::default()),
        })
    }

    /// Make directory creation fail for names starting with `prefix`.
    #[must_use]
    pub fn failing_creation_of(mut self, prefix: impl Into<String>) -> Self {
        self.failing_prefix = Some(prefix.into());
        self
    }

    /// Root that temporary directories are created under.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root_path
    }

    /// Directories created so far, in order.
    #[must_use]
    pub fn created(&self) -> Vec<Utf8PathBuf> {
        self.ledger.lock().created.clone()
    }

    /// Removal requests so far, in order, including repeated ones.
    #[must_use]
    pub fn removed(&self) -> Vec<Utf8PathBuf> {
        self.ledger.lock().removed.clone()
    }

    /// How often removal of `path` was requested.
    #[must_use]
    pub fn removals_of(&self, path: &Utf8Path) -> usize {
        self.ledger
            .lock()
            .removed
            .iter()
            .filter(|removed| removed.as_path() == path)
            .count()
    }

    /// How often a free port was requested.
    #[must_use]
    pub fn port_queries(&self) -> usize {
        self.ledger.lock().port_queries
    }

    /// Names of the entries still present under the root.
    ///
    /// # Errors
    ///
    /// Returns an error when the root cannot be listed.
    pub fn leftovers(&self) -> Result<Vec<String>> {
        let dir = Dir::open_ambient_dir(&self.root_path, ambient_authority())
            .with_context(|| format!("open {}", self.root_path))?;
        let mut names = dir
            .entries()?
            .map(|entry| Ok(entry?.file_name()?))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }
}

impl Provisioner for RecordingProvisioner {
    fn free_port(&self) -> TmpPostgresResult<u16> {
        self.ledger.lock().port_queries += 1;
        self.system.free_port()
    }

    fn create_temp_dir(&self, prefix: &str) -> TmpPostgresResult<Utf8PathBuf> {
        if self
            .failing_prefix
            .as_deref()
            .is_some_and(|failing| prefix.starts_with(failing))
        {
            return Err(TmpPostgresError::CreateDirectory {
                root: self.root_path.clone(),
                prefix: prefix.to_owned(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"),
            });
        }
        let path = self.system.create_temp_dir(prefix)?;
        self.ledger.lock().created.push(path.clone());
        Ok(path)
    }

    fn remove_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        self.ledger.lock().removed.push(path.to_path_buf());
        self.system.remove_dir_all(path)
    }
}
