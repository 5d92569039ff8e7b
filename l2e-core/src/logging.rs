//! Logging Standards and Conventions
//!
//! All crates log through `tracing` with structured fields.
//!
//! # Log Levels
//!
//! | Level | Usage | Examples |
//! |-------|-------|----------|
//! | ERROR | Chain/store divergence, unrecoverable storage failure | Finalize failed after confirmed grading |
//! | WARN  | Rejected requests, failed or reverted ledger calls | Bad moderator key, revert |
//! | INFO  | State changes | Submission created, decision recorded, tx broadcast |
//! | DEBUG | Operation flow | Receipt polling, lock acquisition |
//! | TRACE | Full payloads | Raw transactions (hex) |
//!
//! # Structured Logging Fields
//!
//! - `identity`: canonical wallet address
//! - `tx_id`: ledger transaction id
//! - `operation`: one of the [`operations`] names
//! - `error`: error message
//! - `duration_ms`: operation duration
//!
//! ```ignore
//! use tracing::error;
//!
//! error!(
//!     identity = %identity,
//!     tx_id = %tx_id,
//!     operation = operations::FINALIZE,
//!     error = %e,
//!     "Ledger confirmed but store finalize failed; manual reconciliation required"
//! );
//! ```

/// Operation names used in the `operation` field
pub mod operations {
    pub const SUBMIT: &str = "submit";
    pub const AUTHORIZE: &str = "authorize";
    pub const GRADE: &str = "grade_on_chain";
    pub const BROADCAST: &str = "broadcast";
    pub const AWAIT_RECEIPT: &str = "await_receipt";
    pub const FINALIZE: &str = "finalize_decision";
    pub const HEALTH_CHECK: &str = "health_check";
}

/// Maximum binary data to log (bytes, before hex encoding)
pub const MAX_BINARY_LOG_BYTES: usize = 256;

/// Hex-encode binary data for logs, truncating long payloads
pub fn hex_preview(bytes: &[u8]) -> String {
    if bytes.len() <= MAX_BINARY_LOG_BYTES {
        format!("0x{}", hex::encode(bytes))
    } else {
        format!(
            "0x{}...({} bytes)",
            hex::encode(&bytes[..MAX_BINARY_LOG_BYTES]),
            bytes.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_preview_short() {
        assert_eq!(hex_preview(&[0xde, 0xad]), "0xdead");
        assert_eq!(hex_preview(&[]), "0x");
    }

    #[test]
    fn test_hex_preview_truncates() {
        let data = vec![0u8; MAX_BINARY_LOG_BYTES + 10];
        let preview = hex_preview(&data);
        assert!(preview.ends_with(&format!("...({} bytes)", data.len())));
        let suffix = format!("...({} bytes)", data.len());
        assert_eq!(preview.len(), 2 + MAX_BINARY_LOG_BYTES * 2 + suffix.len());
    }
}
