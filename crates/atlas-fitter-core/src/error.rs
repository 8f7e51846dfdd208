use thiserror::Error;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Fit call budget of {calls_limit} exhausted before any complete placement")]
    BudgetExhausted { calls_limit: u64 },
}

pub type Result<T> = std::result::Result<T, FitError>;
