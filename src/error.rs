use thiserror::Error;

/// Engine error types.
///
/// Data shortages are not errors: an instrument with too few bars becomes
/// [`crate::types::InstrumentAnalysis::Insufficient`] and a statistic with
/// too few periods is `None`. Only contract violations end up here.
#[derive(Error, Debug)]
pub enum OmenError {
    #[error("Malformed price history for {code}: {reason}")]
    StructuralInput { code: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl OmenError {
    pub fn structural(code: &str, reason: impl Into<String>) -> Self {
        OmenError::StructuralInput {
            code: code.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OmenError>;
