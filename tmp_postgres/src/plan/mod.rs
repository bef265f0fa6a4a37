//! Execution plans for the init, server and create roles.
//!
//! A [`PartialPlan`] is layered from defaults, the overlay derived from the
//! acquired socket, port and data directory, and the caller's overlay. It is
//! then completed into a [`Plan`] in one pass that reports every missing
//! option across every role.

mod display;
mod logger;

use camino::Utf8PathBuf;

pub use logger::{Event, Logger};

use crate::{
    client::{ClientOptions, PartialClientOptions},
    merge::{Combine, Last, Merge},
    process::{PartialProcessConfig, ProcessConfig},
    validation::{Accumulate, Validated, required},
};

/// Server role overlay: how to run the server and how clients reach it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialPostgresPlan {
    /// Server process configuration.
    pub process: PartialProcessConfig,
    /// Connection options for clients of the server.
    pub client: PartialClientOptions,
}

impl PartialPostgresPlan {
    /// Resolve into a [`PostgresPlan`].
    ///
    /// # Errors
    ///
    /// Reports gaps in both the process configuration (tagged `process`) and
    /// the client options (tagged `client`).
    pub fn complete(self) -> Validated<PostgresPlan> {
        let (process, client) = self
            .process
            .complete()
            .context("process")
            .and_also(self.client.complete().context("client"))?;
        Ok(PostgresPlan { process, client })
    }
}

impl Combine for PartialPostgresPlan {
    fn combine(self, later: Self) -> Self {
        Self {
            process: self.process.combine(later.process),
            client: self.client.combine(later.client),
        }
    }
}

/// Resolved server role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostgresPlan {
    /// Server process configuration.
    pub process: ProcessConfig,
    /// Connection options for clients of the server.
    pub client: ClientOptions,
}

/// Plan overlay.
#[derive(Clone, Debug, Default)]
pub struct PartialPlan {
    /// Receives lifecycle events. Required.
    pub logger: Last<Logger>,
    /// Database cluster initialisation; `None` skips the role.
    pub init: Merge<Option<PartialProcessConfig>>,
    /// Database creation; `None` skips the role.
    pub create: Merge<Option<PartialProcessConfig>>,
    /// The server role.
    pub postgres: PartialPostgresPlan,
    /// Lines of the server configuration file.
    pub config: Merge<Vec<String>>,
    /// Data directory of the cluster. Required.
    pub data_directory: Last<Utf8PathBuf>,
}

impl PartialPlan {
    /// Resolve into a [`Plan`].
    ///
    /// Every field and role is validated independently; the error lists every
    /// gap, each tagged with the role or field it belongs to.
    ///
    /// # Errors
    ///
    /// Returns all missing options when any required value is unset.
    pub fn complete(self) -> Validated<Plan> {
        let Self {
            logger,
            init,
            create,
            postgres,
            config,
            data_directory,
        } = self;
        let ((((logger, init), create), postgres), data_directory) = required("logger", logger)
            .and_also(complete_role(init).context("init"))
            .and_also(complete_role(create).context("create"))
            .and_also(postgres.complete().context("postgres"))
            .and_also(required("data_directory", data_directory))?;
        Ok(Plan {
            logger,
            init,
            create,
            postgres,
            config: config.into_inner().join("\n"),
            data_directory,
        })
    }
}

fn complete_role(role: Merge<Option<PartialProcessConfig>>) -> Validated<Option<ProcessConfig>> {
    role.into_inner()
        .map(PartialProcessConfig::complete)
        .transpose()
}

impl Combine for PartialPlan {
    fn combine(self, later: Self) -> Self {
        Self {
            logger: self.logger.combine(later.logger),
            init: self.init.combine(later.init),
            create: self.create.combine(later.create),
            postgres: self.postgres.combine(later.postgres),
            config: self.config.combine(later.config),
            data_directory: self.data_directory.combine(later.data_directory),
        }
    }
}

/// Fully resolved plan.
#[derive(Clone, Debug)]
pub struct Plan {
    /// Receives lifecycle events.
    pub logger: Logger,
    /// Cluster initialisation, when enabled.
    pub init: Option<ProcessConfig>,
    /// Database creation, when enabled.
    pub create: Option<ProcessConfig>,
    /// The server role.
    pub postgres: PostgresPlan,
    /// Server configuration file contents.
    pub config: String,
    /// Data directory of the cluster.
    pub data_directory: Utf8PathBuf,
}
