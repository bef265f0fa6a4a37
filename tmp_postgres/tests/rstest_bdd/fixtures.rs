//! Shared fixtures for the acquisition scenarios.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use test_helpers::RecordingProvisioner;
use tmp_postgres::{Config, Resources, TmpPostgresError};

/// Scenario state threaded through the acquisition steps.
#[derive(Debug, Default, ScenarioState)]
pub struct AcquisitionState {
    pub provisioner: Slot<RecordingProvisioner>,
    pub config: Slot<Config>,
    pub resources: Slot<Resources>,
    pub failure: Slot<TmpPostgresError>,
}

/// Fresh state for each scenario.
#[fixture]
pub fn acquisition_state() -> AcquisitionState {
    AcquisitionState::default()
}
