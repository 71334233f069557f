//! Error taxonomy

use thiserror::Error;

/// Errors raised while planning or applying a snapshot schedule
#[derive(Debug, Error)]
pub enum Error {
    /// A retention count property is unset or not an integer.
    ///
    /// There is no safe default to fall back to, so this fails the whole run.
    #[error("retention property {property} on {filesystem} {reason}")]
    Configuration {
        filesystem: String,
        property: String,
        reason: String,
    },

    /// A snapshot name does not carry a `YYYY-MM-DD-HHMM` stamp.
    ///
    /// Only the offending snapshot is skipped.
    #[error("cannot parse snapshot name '{name}': {reason}")]
    Parse { name: String, reason: String },

    /// An external store command failed.
    #[error("`{command}` failed: {message}")]
    Store { command: String, message: String },
}

impl Error {
    /// Build a store error from a command line and a failure description
    pub fn store(command: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Store {
            command: command.into(),
            message: message.into(),
        }
    }

    /// True for errors that must abort the whole run rather than one filesystem
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }
}
