//! Error types for the audit sequence.

use thiserror::Error;

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Fatal audit errors.
///
/// Only conditions that make the rest of the sequence meaningless are
/// errors. Check outcomes (subject mismatches, wrong replies, missing
/// responders) are reported as failed [`crate::CheckResult`]s instead.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Broker unreachable at startup.
    #[error("failed to connect to broker: {0}")]
    Connect(String),

    /// Service or endpoint registration was rejected.
    #[error("service registration failed: {0}")]
    Registration(String),

    /// Transport-level failure while talking to the broker.
    #[error("broker i/o error: {0}")]
    Broker(String),

    /// Discovery returned no usable record.
    #[error("discovery returned no usable record for service {0}")]
    DiscoveryFailed(String),
}
