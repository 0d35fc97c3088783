//! Types stored in the admin session.

use serde::{Deserialize, Serialize};

/// Severity of a flash notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-shot notice shown on the next page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Whether this is an error notice.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == FlashKind::Error
    }
}

/// Session keys.
pub mod keys {
    /// Key for the pending flash notice.
    pub const FLASH: &str = "flash";
}
