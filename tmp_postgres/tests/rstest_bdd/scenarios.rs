//! Binds the acquisition feature file to the shared fixtures.

use rstest_bdd_macros::scenario;

use super::fixtures::{AcquisitionState, acquisition_state};

#[scenario(path = "tests/features/caller_owned_resources.feature")]
fn caller_owned_resources_are_left_in_place(acquisition_state: AcquisitionState) {
    let _ = acquisition_state;
}

#[scenario(path = "tests/features/acquisition_rollback.feature")]
fn failed_data_directory_rolls_back(acquisition_state: AcquisitionState) {
    let _ = acquisition_state;
}
