// Domain value objects representing core modelling concepts

use std::fmt;

/// Domain of a decision variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    #[default]
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

impl VariableType {
    pub fn is_integer(self) -> bool {
        matches!(self, VariableType::Integer | VariableType::Binary)
    }
}

/// Relation between the two sides of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::LessThanOrEqual => write!(f, "<="),
            Relation::Equal => write!(f, "="),
            Relation::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

impl ObjectiveSense {
    /// Engine-level sense code: `+1` minimizes, `-1` maximizes.
    pub fn code(self) -> i32 {
        match self {
            ObjectiveSense::Minimize => 1,
            ObjectiveSense::Maximize => -1,
        }
    }
}

/// Order of an expression: the largest number of variables multiplied
/// together in any of its terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExpressionOrder {
    Constant,
    Linear,
    Quadratic,
    /// Carries the offending degree (always > 2).
    Higher(usize),
}

impl ExpressionOrder {
    pub fn from_degree(degree: usize) -> Self {
        match degree {
            0 => ExpressionOrder::Constant,
            1 => ExpressionOrder::Linear,
            2 => ExpressionOrder::Quadratic,
            n => ExpressionOrder::Higher(n),
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, ExpressionOrder::Higher(_))
    }
}

impl fmt::Display for ExpressionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionOrder::Constant => write!(f, "constant"),
            ExpressionOrder::Linear => write!(f, "linear"),
            ExpressionOrder::Quadratic => write!(f, "quadratic"),
            ExpressionOrder::Higher(degree) => write!(f, "degree {}", degree),
        }
    }
}

/// Portable classification of the last solve attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProblemStatus {
    /// No solve has run on this session yet
    #[default]
    NotSolved,
    /// Found optimal solution
    Optimal,
    /// Stopped with a solution that is not proven optimal
    Suboptimal,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
}

impl ProblemStatus {
    /// Whether a solve ending in this status populates the solution vector.
    pub fn has_solution(self) -> bool {
        matches!(self, ProblemStatus::Optimal | ProblemStatus::Suboptimal)
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemStatus::NotSolved => write!(f, "Not Solved"),
            ProblemStatus::Optimal => write!(f, "Optimal"),
            ProblemStatus::Suboptimal => write!(f, "Suboptimal"),
            ProblemStatus::Infeasible => write!(f, "Infeasible"),
            ProblemStatus::Unbounded => write!(f, "Unbounded"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverBackend {
    /// Automatically select the first compiled-in backend
    #[default]
    Auto,
    /// Pure-Rust microlp solver through good_lp
    MicroLp,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::MicroLp => write!(f, "microlp"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}
