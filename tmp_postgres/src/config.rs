//! Top-level configuration overlay.

use camino::Utf8PathBuf;

use crate::{
    client::PartialClientOptions,
    directory::PartialDirectory,
    merge::{Combine, Last, Merge},
    plan::{Logger, PartialPlan, PartialPostgresPlan},
    process::PartialProcessConfig,
    socket::PartialSocket,
};

/// Server configuration lines tuned for disposable test clusters.
pub const DEFAULT_POSTGRES_CONFIG: &[&str] = &[
    "shared_buffers = 12MB",
    "fsync = off",
    "synchronous_commit = off",
    "full_page_writes = off",
    "log_min_messages = PANIC",
    "log_min_error_statement = PANIC",
    "log_statement = none",
    "client_min_messages = ERROR",
];

/// Everything a caller can override before resources are acquired.
///
/// Overlays combine field by field; [`Config::default`] is the identity and
/// [`Config::standard`] holds the defaults for the common case.
///
/// ```
/// use tmp_postgres::{Config, PartialSocket, merge::Combine};
///
/// let config = Config::standard()
///     .combine(Config::fixed_port(5555))
///     .combine(Config {
///         socket: PartialSocket::ip("0.0.0.0"),
///         ..Config::default()
///     });
/// assert_eq!(config.port.get(), Some(&Some(5555)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Plan overlay, applied after the overlay derived from acquired
    /// resources.
    pub plan: PartialPlan,
    /// Socket overlay.
    pub socket: PartialSocket,
    /// Data directory overlay.
    pub directory: PartialDirectory,
    /// Port overlay: unset or `Some(None)` picks a free port, `Some(Some(p))`
    /// uses `p`.
    pub port: Last<Option<u16>>,
}

impl Config {
    /// Defaults for the common case.
    ///
    /// Events go to `tracing`; every role inherits the caller's environment
    /// and standard streams; `initdb` runs with `--no-sync`; `createdb` is
    /// skipped; clients connect to the `postgres` database; the server
    /// configuration starts from [`DEFAULT_POSTGRES_CONFIG`].
    #[must_use]
    pub fn standard() -> Self {
        let init = PartialProcessConfig::standard()
            .combine(PartialProcessConfig::arguments(["--no-sync"]));
        Self {
            plan: PartialPlan {
                logger: Last::new(Logger::tracing()),
                init: Merge::Splice(Some(init)),
                create: Merge::Replace(None),
                postgres: PartialPostgresPlan {
                    process: PartialProcessConfig::standard(),
                    client: PartialClientOptions {
                        dbname: Last::new("postgres".to_owned()),
                        ..PartialClientOptions::default()
                    },
                },
                config: Merge::Splice(
                    DEFAULT_POSTGRES_CONFIG
                        .iter()
                        .map(|line| (*line).to_owned())
                        .collect(),
                ),
                data_directory: Last::unset(),
            },
            ..Self::default()
        }
    }

    /// An overlay that pins the server port.
    #[must_use]
    pub fn fixed_port(port: u16) -> Self {
        Self {
            port: Last::new(Some(port)),
            ..Self::default()
        }
    }

    /// An overlay that keeps the cluster in `path`.
    #[must_use]
    pub fn data_directory(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            directory: PartialDirectory::Permanent(path.into()),
            ..Self::default()
        }
    }

    /// An overlay that appends server configuration lines.
    #[must_use]
    pub fn postgres_config<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            plan: PartialPlan {
                config: Merge::Splice(lines.into_iter().map(Into::into).collect()),
                ..PartialPlan::default()
            },
            ..Self::default()
        }
    }
}

impl Combine for Config {
    fn combine(self, later: Self) -> Self {
        Self {
            plan: self.plan.combine(later.plan),
            socket: self.socket.combine(later.socket),
            directory: self.directory.combine(later.directory),
            port: self.port.combine(later.port),
        }
    }
}
