//! The outcome taxonomy for discovery and control operations.

use thiserror::Error;

/// Closed set of failure kinds reported by this client.
///
/// Transport-level and protocol-level failures are kept distinct: a
/// request that reaches the renderer and comes back HTTP 200 can still
/// fail semantically, and is then reported as [`ControlError::SoapFault`],
/// never as a network problem.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Transport failure: connect/send errors, an HTTP status that is
    /// neither 200 nor 500, or retries exhausted.
    #[error("network error: {0}")]
    Network(String),

    /// Reserved outcome kept for hosts that map results onto a fixed code
    /// table; no current operation reports it.
    #[error("operation timed out")]
    Timeout,

    /// Client not initialized, or the target is not an addressable
    /// renderer.
    #[error("device not addressable")]
    InvalidDevice,

    /// Protocol fault: HTTP 500 from the renderer, or a 200 response
    /// missing an expected field.
    #[error("SOAP fault")]
    SoapFault {
        /// Raw fault or response body as returned by the renderer.
        body: String,
    },

    /// Reserved outcome kept for hosts that map results onto a fixed code
    /// table; no current operation reports it.
    #[error("out of memory")]
    NoMemory,

    /// A precondition on the arguments failed. Raised before any I/O.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

/// Convenience Result alias for control operations.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Map any operation outcome to a short display string.
///
/// Success is rendered too, so hosts can route every outcome through one
/// table when building status lines.
pub fn outcome_label<T>(outcome: &Result<T>) -> &'static str {
    match outcome {
        Ok(_) => "Success",
        Err(ControlError::Network(_)) => "Network error",
        Err(ControlError::Timeout) => "Timeout",
        Err(ControlError::InvalidDevice) => "Invalid device",
        Err(ControlError::SoapFault { .. }) => "SOAP fault",
        Err(ControlError::NoMemory) => "No memory",
        Err(ControlError::InvalidParam(_)) => "Invalid parameter",
    }
}
