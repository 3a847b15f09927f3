//! Fatal engine errors.
//!
//! Lookahead findings are not errors; they live in
//! [`crate::validation::CausalityReport`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid strategy config: {0}")]
    InvalidConfig(String),

    #[error("insufficient data: {available} bars supplied, warm-up needs {required}")]
    InsufficientData { required: usize, available: usize },

    #[error("signal stream has {signals} records for {bars} bars")]
    LengthMismatch { bars: usize, signals: usize },
}

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_both_counts() {
        let err = EngineError::InsufficientData {
            required: 100,
            available: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("100"));
    }
}
