//! Container configuration

use serde::{Deserialize, Serialize};

/// Options applied when a provider is built from a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Check at build time that every declared dependency is registered
    pub validate_on_build: bool,
    /// Emit a trace event for every resolution
    pub trace_resolutions: bool,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_on_build = enabled;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.trace_resolutions = enabled;
        self
    }
}
