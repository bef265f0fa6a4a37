//! Human-readable rendering of a completed plan.

use std::fmt;

use super::Plan;
use crate::process::ProcessConfig;

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "data directory: {}", self.data_directory)?;
        writeln!(f, "connection: {}", self.postgres.client.to_connection_string())?;
        write_role(f, "initdb", self.init.as_ref())?;
        write_role(f, "postgres", Some(&self.postgres.process))?;
        write_role(f, "createdb", self.create.as_ref())?;
        writeln!(f, "postgresql.conf:")?;
        for line in self.config.lines() {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

fn write_role(f: &mut fmt::Formatter<'_>, name: &str, role: Option<&ProcessConfig>) -> fmt::Result {
    match role {
        None => writeln!(f, "{name}: skipped"),
        Some(process) => writeln!(
            f,
            "{name}: args [{}], {} environment variables",
            process.arguments.join(" "),
            process.environment.len(),
        ),
    }
}
