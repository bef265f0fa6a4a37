//! Process configurations for the init, server and create roles.

use std::{
    collections::BTreeMap,
    env,
    ffi::OsString,
    fs::{File, OpenOptions},
    process::{Command, Stdio},
};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::{
    TmpPostgresError, TmpPostgresResult,
    merge::{Combine, Last, Merge},
    validation::{Accumulate, Validated, required},
};

/// Where a child's standard stream is connected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StdStream {
    /// Share the calling process's stream.
    Inherit,
    /// Discard output, or read end-of-file.
    Null,
    /// Create a pipe the caller can read or write.
    Piped,
    /// Read from or append to a file.
    File(Utf8PathBuf),
}

impl StdStream {
    fn to_stdio(&self, input: bool) -> TmpPostgresResult<Stdio> {
        Ok(match self {
            Self::Inherit => Stdio::inherit(),
            Self::Null => Stdio::null(),
            Self::Piped => Stdio::piped(),
            Self::File(path) => Stdio::from(open_stream_file(path, input)?),
        })
    }
}

fn open_stream_file(path: &Utf8Path, input: bool) -> TmpPostgresResult<File> {
    let mut options = OpenOptions::new();
    if input {
        options.read(true);
    } else {
        options.create(true).append(true);
    }
    options
        .open(path)
        .map_err(|source| TmpPostgresError::OpenStream {
            path: path.to_path_buf(),
            source,
        })
}

/// Environment variables passed to a child process.
pub type Environment = BTreeMap<String, String>;

/// Partially specified process configuration.
///
/// Environment and arguments are merge cells, so an overlay may extend or
/// replace them. Streams keep the last supplied value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialProcessConfig {
    /// Environment variables.
    pub environment: Merge<Environment>,
    /// Command-line arguments.
    pub arguments: Merge<Vec<String>>,
    /// Standard input.
    pub stdin: Last<StdStream>,
    /// Standard output.
    pub stdout: Last<StdStream>,
    /// Standard error.
    pub stderr: Last<StdStream>,
}

impl PartialProcessConfig {
    /// Inherit the caller's environment and standard streams.
    ///
    /// The environment replaces anything layered earlier.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_streams(StdStream::Inherit)
    }

    /// Inherit the caller's environment but discard all stream traffic.
    #[must_use]
    pub fn silent() -> Self {
        Self::with_streams(StdStream::Null)
    }

    fn with_streams(stream: StdStream) -> Self {
        Self {
            environment: Merge::Replace(current_environment()),
            arguments: Merge::default(),
            stdin: Last::new(stream.clone()),
            stdout: Last::new(stream.clone()),
            stderr: Last::new(stream),
        }
    }

    /// An overlay that only appends `arguments`.
    #[must_use]
    pub fn arguments<I, S>(arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            arguments: Merge::Splice(arguments.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Resolve into a [`ProcessConfig`].
    ///
    /// # Errors
    ///
    /// Reports every unset stream (`stdin`, `stdout`, `stderr`).
    pub fn complete(self) -> Validated<ProcessConfig> {
        let Self {
            environment,
            arguments,
            stdin,
            stdout,
            stderr,
        } = self;
        let ((stdin, stdout), stderr) = required("stdin", stdin)
            .and_also(required("stdout", stdout))
            .and_also(required("stderr", stderr))?;
        Ok(ProcessConfig {
            environment: environment.into_inner(),
            arguments: arguments.into_inner(),
            stdin,
            stdout,
            stderr,
        })
    }
}

impl Combine for PartialProcessConfig {
    fn combine(self, later: Self) -> Self {
        Self {
            environment: self.environment.combine(later.environment),
            arguments: self.arguments.combine(later.arguments),
            stdin: self.stdin.combine(later.stdin),
            stdout: self.stdout.combine(later.stdout),
            stderr: self.stderr.combine(later.stderr),
        }
    }
}

/// Snapshot of the calling process's environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped and logged at
/// debug level.
#[must_use]
pub fn current_environment() -> Environment {
    utf8_environment(env::vars_os())
}

fn utf8_environment<I>(vars: I) -> Environment
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(name), Ok(text)) => Some((name, text)),
            (Ok(name), Err(_)) => {
                debug!(%name, "skipping environment variable with a non-UTF-8 value");
                None
            }
            (Err(raw), _) => {
                debug!(
                    name = %raw.to_string_lossy(),
                    "skipping environment variable with a non-UTF-8 name"
                );
                None
            }
        })
        .collect()
}

/// Fully resolved process configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessConfig {
    /// Complete environment of the child; nothing else is inherited.
    pub environment: Environment,
    /// Command-line arguments, in order.
    pub arguments: Vec<String>,
    /// Standard input.
    pub stdin: StdStream,
    /// Standard output.
    pub stdout: StdStream,
    /// Standard error.
    pub stderr: StdStream,
}

impl ProcessConfig {
    /// Build a [`Command`] that runs `program` with this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TmpPostgresError::OpenStream`] when a file-backed stream
    /// cannot be opened.
    pub fn command(&self, program: impl AsRef<std::ffi::OsStr>) -> TmpPostgresResult<Command> {
        let mut command = Command::new(program);
        command
            .env_clear()
            .envs(&self.environment)
            .args(&self.arguments)
            .stdin(self.stdin.to_stdio(true)?)
            .stdout(self.stdout.to_stdio(false)?)
            .stderr(self.stderr.to_stdio(false)?);
        Ok(command)
    }
}
