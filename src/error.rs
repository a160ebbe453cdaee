use thiserror::Error;

/// Everything that can abort a simulation run.
#[derive(Debug, Error)]
pub enum FuzzyError {
    #[error("Invalid rule {rule:?}: expected 8 tokens, found {tokens}")]
    MalformedRule { rule: String, tokens: usize },

    #[error("Unknown variable {0:?}")]
    UnknownVariable(String),

    #[error("Unknown fuzzy set {set:?} in variable {variable:?}")]
    UnknownFuzzySet { variable: String, set: String },

    #[error("Invalid operator {0:?}: expected one of and, or, and_not, or_not")]
    InvalidOperator(String),

    #[error("No rule activated output variable {0:?}")]
    NoActivation(String),

    #[error("{0}")]
    PreconditionViolation(String),

    #[error("Invalid project document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;
