// Downstream capability interface for external solver engines
// The session depends only on this trait, never on a concrete backend

use super::translator::{LinearTerm, QuadraticTerm};
use super::value_objects::{ObjectiveSense, Relation, VariableType};
use std::fmt;

/// Error types reported by an engine backend
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Unsupported by {engine}: {feature}")]
    Unsupported {
        engine: &'static str,
        feature: &'static str,
    },

    #[error("Engine has no column {0}")]
    InvalidVariable(usize),

    #[error("Engine model has been disposed")]
    Disposed,

    #[error("No solution values available")]
    NoSolution,

    #[error("Engine failure: {0}")]
    Backend(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Raw engine optimization status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    Loaded = 1,
    Optimal = 2,
    Infeasible = 3,
    InfOrUnbd = 4,
    Unbounded = 5,
    Cutoff = 6,
    IterationLimit = 7,
    NodeLimit = 8,
    TimeLimit = 9,
    SolutionLimit = 10,
    Interrupted = 11,
    Numeric = 12,
    Suboptimal = 13,
    InProgress = 14,
    UserObjLimit = 15,
}

impl EngineStatus {
    const ALL: [EngineStatus; 15] = [
        EngineStatus::Loaded,
        EngineStatus::Optimal,
        EngineStatus::Infeasible,
        EngineStatus::InfOrUnbd,
        EngineStatus::Unbounded,
        EngineStatus::Cutoff,
        EngineStatus::IterationLimit,
        EngineStatus::NodeLimit,
        EngineStatus::TimeLimit,
        EngineStatus::SolutionLimit,
        EngineStatus::Interrupted,
        EngineStatus::Numeric,
        EngineStatus::Suboptimal,
        EngineStatus::InProgress,
        EngineStatus::UserObjLimit,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngineStatus::Loaded => "loaded",
            EngineStatus::Optimal => "optimal",
            EngineStatus::Infeasible => "infeasible",
            EngineStatus::InfOrUnbd => "inf_or_unbd",
            EngineStatus::Unbounded => "unbounded",
            EngineStatus::Cutoff => "cutoff",
            EngineStatus::IterationLimit => "iteration_limit",
            EngineStatus::NodeLimit => "node_limit",
            EngineStatus::TimeLimit => "time_limit",
            EngineStatus::SolutionLimit => "solution_limit",
            EngineStatus::Interrupted => "interrupted",
            EngineStatus::Numeric => "numeric",
            EngineStatus::Suboptimal => "suboptimal",
            EngineStatus::InProgress => "in_progress",
            EngineStatus::UserObjLimit => "user_obj_limit",
        }
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Engine parameters the session needs to control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineParam {
    /// Enable/disable the presolve pass
    Presolve(bool),
    /// Wall-clock limit in seconds
    TimeLimit(f64),
    /// Engine console output
    Verbose(bool),
}

/// Column definition passed to [`SolverEngine::add_var`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarSpec<'a> {
    pub lower: f64,
    pub upper: f64,
    /// Objective coefficient placeholder; the session always sets the
    /// objective explicitly afterwards.
    pub objective: f64,
    pub variable_type: VariableType,
    pub name: &'a str,
}

/// Row definition passed to the constraint methods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSpec<'a> {
    pub relation: Relation,
    pub rhs: f64,
    pub name: &'a str,
}

/// Capability interface of an external mathematical-programming engine.
///
/// Every call is synchronous and returns once the engine has applied it.
/// Implementations are not expected to be thread-safe; the session
/// serializes access through `&mut self`.
pub trait SolverEngine {
    /// Engine-side column handle.
    type Var: Copy + fmt::Debug;

    /// Human-readable backend name
    fn name(&self) -> &str;

    fn add_var(&mut self, spec: VarSpec<'_>) -> EngineResult<Self::Var>;

    fn set_var_bounds(&mut self, var: Self::Var, lower: f64, upper: f64) -> EngineResult<()>;

    fn set_var_type(&mut self, var: Self::Var, variable_type: VariableType) -> EngineResult<()>;

    fn add_linear_constraint(
        &mut self,
        terms: &[LinearTerm<Self::Var>],
        row: RowSpec<'_>,
    ) -> EngineResult<()>;

    fn add_quadratic_constraint(
        &mut self,
        linear: &[LinearTerm<Self::Var>],
        quadratic: &[QuadraticTerm<Self::Var>],
        row: RowSpec<'_>,
    ) -> EngineResult<()>;

    fn set_linear_objective(
        &mut self,
        terms: &[LinearTerm<Self::Var>],
        constant: f64,
        sense: ObjectiveSense,
    ) -> EngineResult<()>;

    fn set_quadratic_objective(
        &mut self,
        linear: &[LinearTerm<Self::Var>],
        quadratic: &[QuadraticTerm<Self::Var>],
        constant: f64,
        sense: ObjectiveSense,
    ) -> EngineResult<()>;

    fn set_param(&mut self, param: EngineParam) -> EngineResult<()>;

    /// Flush pending modifications so they are visible to later calls.
    fn update(&mut self) -> EngineResult<()>;

    /// Run the optimizer and return the raw status code.
    fn optimize(&mut self) -> EngineResult<EngineStatus>;

    /// Values of all columns, in column order.
    fn solution_values(&self) -> EngineResult<Vec<f64>>;

    fn objective_value(&self) -> EngineResult<f64>;

    /// Compute an irreducible infeasible subsystem for diagnostics.
    fn compute_iis(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn dispose_model(&mut self) -> EngineResult<()>;

    fn dispose_env(&mut self) -> EngineResult<()>;
}

impl<E: SolverEngine + ?Sized> SolverEngine for Box<E> {
    type Var = E::Var;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn add_var(&mut self, spec: VarSpec<'_>) -> EngineResult<Self::Var> {
        (**self).add_var(spec)
    }

    fn set_var_bounds(&mut self, var: Self::Var, lower: f64, upper: f64) -> EngineResult<()> {
        (**self).set_var_bounds(var, lower, upper)
    }

    fn set_var_type(&mut self, var: Self::Var, variable_type: VariableType) -> EngineResult<()> {
        (**self).set_var_type(var, variable_type)
    }

    fn add_linear_constraint(
        &mut self,
        terms: &[LinearTerm<Self::Var>],
        row: RowSpec<'_>,
    ) -> EngineResult<()> {
        (**self).add_linear_constraint(terms, row)
    }

    fn add_quadratic_constraint(
        &mut self,
        linear: &[LinearTerm<Self::Var>],
        quadratic: &[QuadraticTerm<Self::Var>],
        row: RowSpec<'_>,
    ) -> EngineResult<()> {
        (**self).add_quadratic_constraint(linear, quadratic, row)
    }

    fn set_linear_objective(
        &mut self,
        terms: &[LinearTerm<Self::Var>],
        constant: f64,
        sense: ObjectiveSense,
    ) -> EngineResult<()> {
        (**self).set_linear_objective(terms, constant, sense)
    }

    fn set_quadratic_objective(
        &mut self,
        linear: &[LinearTerm<Self::Var>],
        quadratic: &[QuadraticTerm<Self::Var>],
        constant: f64,
        sense: ObjectiveSense,
    ) -> EngineResult<()> {
        (**self).set_quadratic_objective(linear, quadratic, constant, sense)
    }

    fn set_param(&mut self, param: EngineParam) -> EngineResult<()> {
        (**self).set_param(param)
    }

    fn update(&mut self) -> EngineResult<()> {
        (**self).update()
    }

    fn optimize(&mut self) -> EngineResult<EngineStatus> {
        (**self).optimize()
    }

    fn solution_values(&self) -> EngineResult<Vec<f64>> {
        (**self).solution_values()
    }

    fn objective_value(&self) -> EngineResult<f64> {
        (**self).objective_value()
    }

    fn compute_iis(&mut self) -> EngineResult<()> {
        (**self).compute_iis()
    }

    fn dispose_model(&mut self) -> EngineResult<()> {
        (**self).dispose_model()
    }

    fn dispose_env(&mut self) -> EngineResult<()> {
        (**self).dispose_env()
    }
}
