//! Client configuration.

use std::time::Duration;

/// Tunables for discovery and control.
///
/// A config is immutable for the duration of a call; the owner may swap it
/// between calls with [`crate::SonosRemote::set_config`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Wall-clock length of one discovery pass.
    pub discovery_timeout: Duration,
    /// Per-attempt HTTP timeout, for control requests and description
    /// fetches alike.
    pub soap_timeout: Duration,
    /// Control request attempts before giving up.
    pub max_retries: u32,
    /// Local UDP port the discovery socket binds to.
    pub discovery_port: u16,
    /// Forward log lines to the registered sink.
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            discovery_timeout: Duration::from_millis(5000),
            soap_timeout: Duration::from_millis(10_000),
            max_retries: 3,
            discovery_port: 1901,
            enable_logging: false,
        }
    }
}
