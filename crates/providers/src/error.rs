//! Provider error types with retryability classification.

use snafu::Snafu;

/// Errors from external provider calls.
#[derive(Debug, Clone, Snafu)]
pub enum ProviderError {
    /// The call exceeded its bounded timeout.
    #[snafu(display("provider timed out after {timeout_secs}s"))]
    Timeout {
        /// The timeout that was exceeded, in seconds.
        timeout_secs: u64,
    },

    /// The provider rejected the call or could not be reached.
    #[snafu(display("provider unavailable: {message}"))]
    Unavailable {
        /// Human-readable failure description.
        message: String,
    },

    /// The provider responded with something the caller cannot use.
    #[snafu(display("malformed provider response: {message}"))]
    MalformedResponse {
        /// Description of the malformation.
        message: String,
    },

    /// The provider is not configured (e.g. no API key).
    #[snafu(display("provider is not configured"))]
    NotConfigured,
}

impl ProviderError {
    /// Whether a retry can plausibly succeed.
    ///
    /// Timeouts and availability problems are transient; malformed
    /// responses and missing configuration are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable { .. })
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
