//! Acquisition and release of the resources a plan depends on.
//!
//! [`acquire_resources`] resolves a port, provisions the socket and data
//! directory, derives the overlay those imply, layers the caller's plan
//! overlay on top and completes the plan. Every temporary resource acquired
//! before a failure is released again before the error is returned.

mod rollback;

use camino::Utf8Path;
use tracing::{debug, warn};

use self::rollback::Rollback;
use crate::{
    TmpPostgresResult,
    client::PartialClientOptions,
    config::Config,
    directory::{DATA_DIRECTORY_PREFIX, Directory},
    merge::{Combine, Last, Merge},
    plan::{Event, PartialPlan, PartialPostgresPlan, Plan},
    process::PartialProcessConfig,
    provisioner::{Provisioner, SystemProvisioner},
    socket::Socket,
};

/// A completed plan together with the resources it was built around.
///
/// Hand it back to [`Resources::release`] (or [`release_resources`]) once the
/// processes described by the plan have stopped.
#[derive(Debug)]
#[must_use = "temporary resources leak unless released"]
pub struct Resources {
    plan: Plan,
    socket: Socket,
    directory: Directory,
}

impl Resources {
    /// The completed plan.
    #[must_use]
    pub const fn plan(&self) -> &Plan {
        &self.plan
    }

    /// The provisioned socket.
    #[must_use]
    pub const fn socket(&self) -> &Socket {
        &self.socket
    }

    /// The provisioned data directory.
    #[must_use]
    pub const fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Release the resources using the system provisioner.
    ///
    /// # Errors
    ///
    /// See [`Resources::release_with`].
    pub fn release(self) -> TmpPostgresResult<()> {
        self.release_with(&SystemProvisioner::default())
    }

    /// Release the socket, then the data directory.
    ///
    /// Both releases are attempted even when the first fails.
    ///
    /// # Errors
    ///
    /// Returns the first release failure.
    pub fn release_with(self, provisioner: &impl Provisioner) -> TmpPostgresResult<()> {
        let Self {
            plan,
            socket,
            directory,
        } = self;
        debug!(host = socket.host(), directory = %directory.path(), "releasing resources");
        let socket_released = socket.release(provisioner);
        let directory_released = directory.release(provisioner);
        match (socket_released, directory_released) {
            (Ok(()), Ok(())) => {
                plan.logger.log(&Event::ResourcesReleased);
                Ok(())
            }
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Err(first), Err(second)) => {
                warn!(error = %second, "data directory release failed as well");
                Err(first)
            }
        }
    }
}

/// Acquire resources using the system provisioner.
///
/// # Errors
///
/// See [`acquire_resources_with`].
pub fn acquire_resources(config: Config) -> TmpPostgresResult<Resources> {
    acquire_resources_with(config, &SystemProvisioner::default())
}

/// Release resources using the system provisioner.
///
/// # Errors
///
/// See [`Resources::release_with`].
pub fn release_resources(resources: Resources) -> TmpPostgresResult<()> {
    resources.release()
}

/// Acquire the port, socket and data directory for `config` and complete its
/// plan.
///
/// # Errors
///
/// Returns [`crate::TmpPostgresError::Incomplete`] listing every missing
/// option when the plan cannot be completed, or the provisioner's failure.
/// Temporary resources acquired before the failure have been released by the
/// time the error is returned; if that release fails too, the error is a
/// [`crate::TmpPostgresError::Rollback`].
pub fn acquire_resources_with<P>(config: Config, provisioner: &P) -> TmpPostgresResult<Resources>
where
    P: Provisioner,
{
    let Config {
        plan: overlay,
        socket: socket_overlay,
        directory: directory_overlay,
        port: port_overlay,
    } = config;

    let port = match port_overlay.into_option().flatten() {
        Some(fixed) => fixed,
        None => provisioner.free_port()?,
    };
    debug!(port, "resolved port");

    let mut rollback = Rollback::new();
    let socket = socket_overlay.provision(provisioner)?;
    let socket_guard = socket.clone();
    rollback.push("socket", move || socket_guard.release(provisioner));

    let directory = match directory_overlay.provision(DATA_DIRECTORY_PREFIX, provisioner) {
        Ok(provisioned) => provisioned,
        Err(err) => return Err(rollback.fail(err)),
    };
    let directory_guard = directory.clone();
    rollback.push("data directory", move || directory_guard.release(provisioner));

    let partial = derived_plan(port, &socket, directory.path()).combine(overlay);
    let plan = match partial.complete() {
        Ok(completed) => completed,
        Err(missing) => return Err(rollback.fail(missing.into())),
    };
    rollback.disarm();

    plan.logger.log(&Event::PlanReady {
        plan: plan.to_string(),
    });
    Ok(Resources {
        plan,
        socket,
        directory,
    })
}

/// Overlay implied by the acquired port, socket and data directory.
fn derived_plan(port: u16, socket: &Socket, data_directory: &Utf8Path) -> PartialPlan {
    let port_arg = port.to_string();
    let mut create_args = socket.host_flag();
    create_args.extend(["-p".to_owned(), port_arg.clone()]);
    PartialPlan {
        logger: Last::unset(),
        init: Merge::Splice(Some(PartialProcessConfig::arguments([format!(
            "--pgdata={data_directory}"
        )]))),
        create: Merge::Splice(Some(PartialProcessConfig::arguments(create_args))),
        postgres: PartialPostgresPlan {
            process: PartialProcessConfig::arguments([
                "-p",
                port_arg.as_str(),
                "-D",
                data_directory.as_str(),
            ]),
            client: PartialClientOptions {
                host: Last::new(socket.host().to_owned()),
                port: Last::new(port),
                ..PartialClientOptions::default()
            },
        },
        config: Merge::Splice(socket.listen_config_lines()),
        data_directory: Last::new(data_directory.to_path_buf()),
    }
}
