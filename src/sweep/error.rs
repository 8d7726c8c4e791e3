use crate::types::OrderSide;

/// Error of sweep planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SweepError {
    #[error("requested amount must be positive")]
    InvalidRequest,

    #[error("expected {expected} side of the book, got {actual}")]
    WrongBookSide {
        expected: OrderSide,
        actual: OrderSide,
    },

    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

/// Result type for sweep planning.
pub type SweepResult<T> = Result<T, SweepError>;
