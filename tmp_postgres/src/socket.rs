//! Socket provisioning: listen on an IP address or in a unix socket
//! directory.

use tracing::debug;

use crate::{
    TmpPostgresResult,
    directory::{Directory, PartialDirectory},
    merge::{Combine, Last},
    provisioner::Provisioner,
};

/// Address used when an IP socket is requested without a host.
pub const DEFAULT_IP_HOST: &str = "127.0.0.1";

/// Name hint for a temporary unix socket directory.
pub const SOCKET_DIRECTORY_PREFIX: &str = "tmp-postgres-socket";

/// A provisioned listen address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Socket {
    /// IP address or host name.
    Ip(String),
    /// Directory holding the unix domain socket.
    Unix(Directory),
}

impl Socket {
    /// Host clients should connect to: the address, or the socket directory.
    #[must_use]
    pub fn host(&self) -> &str {
        match self {
            Self::Ip(host) => host,
            Self::Unix(dir) => dir.path().as_str(),
        }
    }

    /// Server configuration lines binding the listener to this socket.
    #[must_use]
    pub fn listen_config_lines(&self) -> Vec<String> {
        match self {
            Self::Ip(host) => vec![format!("listen_addresses = '{host}'")],
            Self::Unix(dir) => vec![
                "listen_addresses = ''".to_owned(),
                format!("unix_socket_directories = '{}'", dir.path()),
            ],
        }
    }

    /// The `-h <host>` argument pair used by client tools.
    #[must_use]
    pub fn host_flag(&self) -> Vec<String> {
        vec!["-h".to_owned(), self.host().to_owned()]
    }

    /// Release the socket directory if it was created during acquisition.
    ///
    /// # Errors
    ///
    /// Propagates [`Directory::release`] failures.
    pub fn release(&self, provisioner: &impl Provisioner) -> TmpPostgresResult<()> {
        match self {
            Self::Ip(_) => Ok(()),
            Self::Unix(dir) => dir.release(provisioner),
        }
    }
}

/// Socket overlay.
///
/// An IP overlay beats a unix overlay from either side. The identity is a
/// unix socket in an unspecified (temporary) directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartialSocket {
    /// Listen on an IP address; unset means [`DEFAULT_IP_HOST`].
    Ip(Last<String>),
    /// Listen in a unix socket directory.
    Unix(PartialDirectory),
}

impl PartialSocket {
    /// An IP overlay for `host`.
    #[must_use]
    pub fn ip(host: impl Into<String>) -> Self {
        Self::Ip(Last::new(host.into()))
    }

    /// Materialise the overlay.
    ///
    /// # Errors
    ///
    /// Propagates the provisioner's failure to create a socket directory.
    pub fn provision(self, provisioner: &impl Provisioner) -> TmpPostgresResult<Socket> {
        let socket = match self {
            Self::Ip(host) => Socket::Ip(
                host.into_option()
                    .unwrap_or_else(|| DEFAULT_IP_HOST.to_owned()),
            ),
            Self::Unix(dir) => Socket::Unix(dir.provision(SOCKET_DIRECTORY_PREFIX, provisioner)?),
        };
        debug!(host = socket.host(), "provisioned socket");
        Ok(socket)
    }
}

impl Default for PartialSocket {
    fn default() -> Self {
        Self::Unix(PartialDirectory::default())
    }
}

impl Combine for PartialSocket {
    fn combine(self, later: Self) -> Self {
        match (self, later) {
            (Self::Ip(a), Self::Ip(b)) => Self::Ip(a.combine(b)),
            (ip @ Self::Ip(_), Self::Unix(_)) | (Self::Unix(_), ip @ Self::Ip(_)) => ip,
            (Self::Unix(a), Self::Unix(b)) => Self::Unix(a.combine(b)),
        }
    }
}
