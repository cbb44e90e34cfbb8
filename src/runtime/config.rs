//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Options fixed when a machine is created.
///
/// Every field has a default, so partial configurations deserialize cleanly
/// from whatever format the host keeps its settings in.
///
/// # Example
///
/// ```rust
/// use switchyard::runtime::MachineConfig;
///
/// let config = MachineConfig::default()
///     .record_history(true)
///     .history_capacity(128);
///
/// assert!(config.records_history());
/// assert_eq!(config.capacity(), Some(128));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Keep a log of committed transitions
    pub record_history: bool,

    /// Upper bound on retained history records (`None` keeps everything)
    pub history_capacity: Option<usize>,
}

impl MachineConfig {
    /// Enable or disable the transition log.
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Bound the transition log, evicting the oldest records first.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    pub fn records_history(&self) -> bool {
        self.record_history
    }

    pub fn capacity(&self) -> Option<usize> {
        self.history_capacity
    }
}
