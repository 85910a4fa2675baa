//! Configuration for event sessions

use std::time::Duration;

use crate::error::EventsError;

/// Configuration for an [`EventSession`](crate::EventSession)
///
/// Controls where polling starts, how often it runs, and whether a failed
/// poll halts the session or retries after the next interval.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Board version polling starts from
    /// 0 means unknown; the session discovers the current version first
    /// Default: 0
    pub starting_version: u64,

    /// Wait between the end of one poll and the start of the next
    /// Default: 30 seconds
    pub poll_interval: Duration,

    /// Whether a failed poll schedules another attempt after the interval
    /// Default: true
    pub resume_after_error: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_version: 0,
            poll_interval: Duration::from_secs(30),
            resume_after_error: true,
        }
    }
}

impl SessionConfig {
    /// Create a new SessionConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a SessionConfig that polls aggressively
    pub fn fast_polling() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            ..Default::default()
        }
    }

    /// Create a SessionConfig that stops on the first failed poll
    pub fn halt_on_error() -> Self {
        Self {
            resume_after_error: false,
            ..Default::default()
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<(), EventsError> {
        if self.poll_interval == Duration::ZERO {
            return Err(EventsError::Configuration(
                "poll interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder pattern methods for fluent configuration

    pub fn with_starting_version(mut self, version: u64) -> Self {
        self.starting_version = version;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_resume_after_error(mut self, resume: bool) -> Self {
        self.resume_after_error = resume;
        self
    }
}
