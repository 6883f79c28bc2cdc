// Domain layer: algebraic model, classification, translation, engine contract
pub mod domain;

// Application layer: solver session lifecycle and solve orchestration
pub mod application;

// Engine adapters: concrete implementations of SolverEngine
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Constraint, EngineError, EngineParam, EngineStatus, Expression, ExpressionOrder, Monomial,
    Objective, ObjectiveSense, ProblemStatus, Relation, SolverBackend, SolverConfig,
    SolverEngine, SolverError, Variable, VariableType,
};

pub use application::SolverSession;

pub use solver::{DynEngine, SolverFactory};

#[cfg(feature = "microlp")]
pub use solver::GoodLpEngine;

#[cfg(feature = "highs")]
pub use solver::HighsEngine;
