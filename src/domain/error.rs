// Error types for the solver session

use super::engine::EngineError;
use super::models::Expression;
use super::translator::TranslateError;
use super::value_objects::ExpressionOrder;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Unsupported expression order ({order}): {expression}")]
    UnsupportedOrder {
        order: ExpressionOrder,
        expression: Box<Expression>,
    },

    #[error("Variable index {index} out of range ({columns} columns)")]
    VariableOutOfRange { index: usize, columns: usize },

    #[error("Invalid time limit: {0} (must be finite and >= 0)")]
    InvalidTimeLimit(f64),

    #[error("No solution available: solve has not produced values")]
    NoSolution,

    #[error("Solver session has been released")]
    SessionReleased,

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Invalid term: {0}")]
    InvalidTerm(TranslateError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<TranslateError> for SolverError {
    fn from(err: TranslateError) -> Self {
        SolverError::InvalidTerm(err)
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
