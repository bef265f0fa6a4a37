//! Overlay settings loaded from a TOML file and the environment.
//!
//! Only the knobs that make sense outside code are covered; loggers and
//! stream bindings stay programmatic. Environment variables use the
//! `TMP_POSTGRES_` prefix and take precedence over the file. Text knobs are
//! read verbatim and `TMP_POSTGRES_POSTGRES_CONFIG` takes comma-separated
//! lines.
//!
//! ```toml
//! port = 5555
//! data_directory = "/srv/pg-test"
//! postgres_config = ["max_connections = 20"]
//! ```

mod env;

use camino::{Utf8Path, Utf8PathBuf};
use figment::{
    Figment,
    providers::{Format, Toml},
};
use serde::Deserialize;
use tracing::debug;

pub use self::env::SettingsEnv;
use crate::{
    TmpPostgresResult,
    client::PartialClientOptions,
    config::Config,
    directory::PartialDirectory,
    merge::{Last, Merge},
    plan::{PartialPlan, PartialPostgresPlan},
    socket::PartialSocket,
};

/// Prefix for environment variables read by [`Settings::figment`].
pub const ENV_PREFIX: &str = "TMP_POSTGRES_";

/// Serialisable subset of a [`Config`] overlay.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Fixed server port; unset picks a free one.
    pub port: Option<u16>,
    /// Listen on this IP address or host name.
    pub host: Option<String>,
    /// Listen in this existing unix socket directory. Ignored when `host` is
    /// set.
    pub socket_directory: Option<Utf8PathBuf>,
    /// Keep the cluster in this existing directory.
    pub data_directory: Option<Utf8PathBuf>,
    /// Extra server configuration lines.
    pub postgres_config: Vec<String>,
    /// Replace the default configuration lines instead of appending.
    pub replace_postgres_config: bool,
    /// Database clients connect to.
    pub dbname: Option<String>,
    /// Role clients connect as.
    pub user: Option<String>,
    /// Password clients connect with.
    pub password: Option<String>,
}

impl Settings {
    /// Providers for the settings: `file` (when given), then the environment.
    #[must_use]
    pub fn figment(file: Option<&Utf8Path>) -> Figment {
        let base = match file {
            Some(path) => Figment::from(Toml::file(path)),
            None => Figment::new(),
        };
        base.merge(SettingsEnv::prefixed(ENV_PREFIX))
    }

    /// Extract settings from `figment`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TmpPostgresError::Settings`] when a value has the
    /// wrong type or the file cannot be parsed.
    pub fn from_figment(figment: &Figment) -> TmpPostgresResult<Self> {
        let settings: Self = figment.extract()?;
        debug!(
            port = ?settings.port,
            host = ?settings.host,
            data_directory = ?settings.data_directory,
            "loaded settings"
        );
        Ok(settings)
    }

    /// Load settings from `file` and the environment.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_figment`].
    pub fn load(file: Option<&Utf8Path>) -> TmpPostgresResult<Self> {
        Self::from_figment(&Self::figment(file))
    }

    /// Convert into a [`Config`] overlay.
    #[must_use]
    pub fn into_config(self) -> Config {
        let socket = match (self.host, self.socket_directory) {
            (Some(host), _) => PartialSocket::ip(host),
            (None, Some(dir)) => PartialSocket::Unix(PartialDirectory::Permanent(dir)),
            (None, None) => PartialSocket::default(),
        };
        let config = if self.replace_postgres_config {
            Merge::Replace(self.postgres_config)
        } else {
            Merge::Splice(self.postgres_config)
        };
        Config {
            plan: PartialPlan {
                config,
                postgres: PartialPostgresPlan {
                    client: PartialClientOptions {
                        dbname: Last::from(self.dbname),
                        user: Last::from(self.user),
                        password: Last::from(self.password),
                        ..PartialClientOptions::default()
                    },
                    ..PartialPostgresPlan::default()
                },
                ..PartialPlan::default()
            },
            socket,
            directory: self
                .data_directory
                .map_or(PartialDirectory::Unspecified, PartialDirectory::Permanent),
            port: Last::from(self.port.map(Some)),
        }
    }
}
