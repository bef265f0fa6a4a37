//! Plans and provisions throwaway PostgreSQL instances.
//!
//! A [`Config`] overlay is layered over defaults with the [`merge`] algebra.
//! [`acquire_resources`] then picks a port, provisions a socket and a data
//! directory, derives the arguments and configuration lines those imply, and
//! completes a [`Plan`] describing how to run `initdb`, `postgres` and
//! `createdb`. Temporary resources are released by [`Resources::release`], or
//! immediately when acquisition fails partway through.
//!
//! ```no_run
//! use tmp_postgres::{Config, acquire_resources, merge::Combine};
//!
//! # fn main() -> Result<(), tmp_postgres::TmpPostgresError> {
//! let resources = acquire_resources(Config::standard().combine(Config::fixed_port(5555)))?;
//! println!("{}", resources.plan().postgres.client.to_connection_string());
//! resources.release()?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod directory;
mod error;
pub mod merge;
pub mod plan;
pub mod process;
pub mod provisioner;
pub mod resources;
pub mod settings;
pub mod socket;
pub mod validation;

pub use client::{ClientOptions, PartialClientOptions};
pub use config::{Config, DEFAULT_POSTGRES_CONFIG};
pub use directory::{Directory, PartialDirectory};
pub use error::{MissingOption, MissingOptions, TmpPostgresError, TmpPostgresResult};
pub use plan::{Event, Logger, PartialPlan, PartialPostgresPlan, Plan, PostgresPlan};
pub use process::{PartialProcessConfig, ProcessConfig, StdStream};
pub use provisioner::{Provisioner, SystemProvisioner};
pub use resources::{
    Resources, acquire_resources, acquire_resources_with, release_resources,
};
pub use settings::Settings;
pub use socket::{PartialSocket, Socket};
