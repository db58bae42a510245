//! Native framework error object

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain used when the bridge itself reports an error in native form
pub const FEATUREBRIDGE_ERROR_DOMAIN: &str = "com.featurebridge.conversion";

/// Error object produced by the native framework (domain, code, message)
///
/// Carried through the bridge untouched so callers see the original
/// diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("{message} (domain: {domain}, code: {code})")]
pub struct NativeError {
    domain: String,
    code: i64,
    message: String,
}

impl NativeError {
    pub fn new(domain: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            code,
            message: message.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    /// Human-readable description, exactly as the framework produced it
    pub fn message(&self) -> &str {
        &self.message
    }
}
