//! `rstest-bdd` scenarios for resource acquisition.
//!
//! Steps share an `AcquisitionState` and drive acquisition through
//! a recording provisioner so deletions can be asserted on.

mod fixtures;
mod scenarios;
mod steps;
