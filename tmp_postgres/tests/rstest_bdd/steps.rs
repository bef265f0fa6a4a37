//! Step definitions for the acquisition scenarios.

use rstest_bdd_macros::{given, then, when};
use test_helpers::RecordingProvisioner;
use tmp_postgres::{
    Config, Logger, PartialPlan, PartialSocket, TmpPostgresError, acquire_resources_with,
    merge::{Combine, Last},
};

use super::fixtures::AcquisitionState;

fn overlay(state: &AcquisitionState, layer: Config) {
    let config = state.config.take().unwrap_or_default();
    state.config.set(config.combine(layer));
}

#[given("a recording provisioner")]
fn recording_provisioner(acquisition_state: &AcquisitionState) {
    let provisioner = RecordingProvisioner::new().expect("create recording provisioner");
    acquisition_state.provisioner.set(provisioner);
}

#[given("a recording provisioner that cannot create data directories")]
fn failing_provisioner(acquisition_state: &AcquisitionState) {
    let provisioner = RecordingProvisioner::new()
        .expect("create recording provisioner")
        .failing_creation_of("tmp-postgres-data");
    acquisition_state.provisioner.set(provisioner);
}

#[given("the standard configuration")]
fn standard_configuration(acquisition_state: &AcquisitionState) {
    overlay(acquisition_state, Config::standard());
    overlay(
        acquisition_state,
        Config {
            plan: PartialPlan {
                logger: Last::new(Logger::silent()),
                ..PartialPlan::default()
            },
            ..Config::default()
        },
    );
}

#[when("the server port is fixed at {port:u16}")]
fn fixed_port(acquisition_state: &AcquisitionState, port: u16) {
    overlay(acquisition_state, Config::fixed_port(port));
}

#[when("the cluster lives in a caller-owned directory")]
fn caller_owned_directory(acquisition_state: &AcquisitionState) {
    overlay(acquisition_state, Config::data_directory("/tmp/fixed-dir"));
}

#[when("the server listens on all IPv4 addresses")]
fn listen_everywhere(acquisition_state: &AcquisitionState) {
    overlay(
        acquisition_state,
        Config {
            socket: PartialSocket::ip("0.0.0.0"),
            ..Config::default()
        },
    );
}

#[when("resources are acquired")]
fn acquire(acquisition_state: &AcquisitionState) {
    let config = acquisition_state.config.take().unwrap_or_default();
    let outcome = acquisition_state
        .provisioner
        .with_ref(|provisioner| acquire_resources_with(config, provisioner))
        .expect("a provisioner must be configured");
    match outcome {
        Ok(resources) => acquisition_state.resources.set(resources),
        Err(err) => acquisition_state.failure.set(err),
    }
}

#[when("the resources are released")]
fn release(acquisition_state: &AcquisitionState) {
    let resources = acquisition_state
        .resources
        .take()
        .expect("resources must have been acquired");
    acquisition_state
        .provisioner
        .with_ref(|provisioner| resources.release_with(provisioner))
        .expect("a provisioner must be configured")
        .expect("release succeeds");
}

#[then("the server runs on port {port:u16} in the caller-owned directory")]
fn server_arguments(acquisition_state: &AcquisitionState, port: u16) {
    let actual = acquisition_state
        .resources
        .with_ref(|resources| resources.plan().postgres.process.arguments.clone())
        .expect("resources must have been acquired");
    let port = port.to_string();
    assert_eq!(actual, ["-p", port.as_str(), "-D", "/tmp/fixed-dir"]);
}

#[then("the configuration listens on all IPv4 addresses")]
fn listens_everywhere(acquisition_state: &AcquisitionState) {
    let listens = acquisition_state
        .resources
        .with_ref(|resources| {
            resources
                .plan()
                .config
                .lines()
                .any(|line| line == "listen_addresses = '0.0.0.0'")
        })
        .expect("resources must have been acquired");
    assert!(listens);
}

#[then("nothing was deleted")]
fn nothing_deleted(acquisition_state: &AcquisitionState) {
    let removed = acquisition_state
        .provisioner
        .with_ref(RecordingProvisioner::removed)
        .expect("a provisioner must be configured");
    assert!(removed.is_empty(), "{removed:?}");
}

#[then("acquisition fails creating a directory")]
fn fails_creating_directory(acquisition_state: &AcquisitionState) {
    let failed = acquisition_state
        .failure
        .with_ref(|err| matches!(err, TmpPostgresError::CreateDirectory { .. }))
        .expect("acquisition must have failed");
    assert!(failed);
}

#[then("the socket directory was removed once")]
fn socket_removed_once(acquisition_state: &AcquisitionState) {
    let (created, removals) = acquisition_state
        .provisioner
        .with_ref(|provisioner| {
            let created = provisioner.created();
            let removals = created
                .first()
                .map_or(0, |socket_dir| provisioner.removals_of(socket_dir));
            (created.len(), removals)
        })
        .expect("a provisioner must be configured");
    assert_eq!(created, 1);
    assert_eq!(removals, 1);
}

#[then("no temporary directories remain")]
fn nothing_remains(acquisition_state: &AcquisitionState) {
    let leftovers = acquisition_state
        .provisioner
        .with_ref(|provisioner| provisioner.leftovers().expect("list root"))
        .expect("a provisioner must be configured");
    assert!(leftovers.is_empty(), "{leftovers:?}");
}
