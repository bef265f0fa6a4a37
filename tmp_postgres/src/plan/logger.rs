//! User-facing event logging for a plan.

use std::{fmt, sync::Arc};

/// Lifecycle events reported through a plan's [`Logger`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// Resources were acquired and the plan below was completed.
    PlanReady {
        /// Human-readable rendering of the plan.
        plan: String,
    },
    /// The plan's temporary resources were released.
    ResourcesReleased,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlanReady { plan } => write!(f, "plan ready:\n{plan}"),
            Self::ResourcesReleased => f.write_str("resources released"),
        }
    }
}

/// Callback receiving [`Event`]s.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use tmp_postgres::{Event, Logger};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let logger = Logger::new(move |event: &Event| {
///     sink.lock().unwrap().push(event.clone());
/// });
/// logger.log(&Event::ResourcesReleased);
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct Logger(Arc<dyn Fn(&Event) + Send + Sync>);

impl Logger {
    /// Wrap a callback.
    #[must_use]
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Forward events to `tracing` at info level.
    #[must_use]
    pub fn tracing() -> Self {
        Self::new(|event| match event {
            Event::PlanReady { plan } => tracing::info!(%plan, "plan ready"),
            Event::ResourcesReleased => tracing::info!("resources released"),
        })
    }

    /// Discard every event.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(|_| {})
    }

    /// Report `event`.
    pub fn log(&self, event: &Event) {
        (self.0)(event);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logger(..)")
    }
}
