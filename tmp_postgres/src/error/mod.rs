//! Error types produced while planning and provisioning an instance.

mod missing;
mod types;

pub use missing::{MissingOption, MissingOptions};
pub use types::{TmpPostgresError, TmpPostgresResult};

#[cfg(test)]
mod tests;
