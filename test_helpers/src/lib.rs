//! Test helpers shared across crates.
//!
//! This crate provides a provisioner that records every side effect and can
//! inject creation failures, so rollback and release can be asserted on.

pub mod provisioner;

pub use provisioner::RecordingProvisioner;
