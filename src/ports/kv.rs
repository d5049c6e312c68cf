//! Key-value persistence port, scoped to one document.

use super::PortError;

/// String key-value storage attached to a single document.
///
/// Holds the issue records, the last set of comments sent to the analysis
/// service and the chat session identifier. Values survive across review
/// sessions.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PortError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), PortError>;
}
