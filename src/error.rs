//! Engine error types.
//!
//! Only fundamentally unparseable input produces an error. Stale paths,
//! unsupported color syntax and dangling gradient references are skipped
//! (and logged with `--verbose`) by the stage that meets them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid document: {reason}")]
    InvalidDocument { reason: String },

    #[error("invalid document: no root element")]
    MissingRoot,

    #[error("unsupported color configuration version {0}")]
    UnsupportedVersion(u32),

    #[error("unknown color configuration type `{0}`")]
    UnknownConfigurationType(String),

    #[error("color configuration is not valid JSON")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid(reason: impl std::fmt::Display) -> Self {
        Self::InvalidDocument {
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::invalid("unexpected end of input");
        assert_eq!(
            err.to_string(),
            "invalid document: unexpected end of input"
        );
        assert_eq!(
            EngineError::UnsupportedVersion(7).to_string(),
            "unsupported color configuration version 7"
        );
    }
}
