// good_lp adapter backed by the pure-Rust microlp solver
// Translates the buffered model to good_lp's expression API on every optimize

use super::buffered::{Backend, BufferedEngine, ModelBuffer, Outcome};
use crate::domain::{
    engine::{EngineError, EngineResult, EngineStatus},
    value_objects::{ObjectiveSense, Relation},
};
use good_lp::{
    solvers::microlp::microlp, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolutionStatus, SolverModel, Variable as GoodLpVariable,
    WithTimeLimit,
};
use tracing::debug;

#[derive(Debug, Default)]
pub struct MicroLpBackend;

/// Engine solving buffered models through good_lp + microlp
pub type GoodLpEngine = BufferedEngine<MicroLpBackend>;

impl GoodLpEngine {
    pub fn new() -> Self {
        Self::with_backend(MicroLpBackend)
    }
}

impl Backend for MicroLpBackend {
    const NAME: &'static str = "microlp";

    fn run(&mut self, model: &ModelBuffer) -> EngineResult<Outcome> {
        if !model.presolve {
            debug!(
                component = "engine",
                engine = Self::NAME,
                "microlp has no presolve pass; ignoring presolve setting"
            );
        }

        // Build variables using good_lp
        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(model.columns.len());

        for column in &model.columns {
            let mut definition = variable();
            if column.variable_type.is_integer() {
                definition = definition.integer();
            }
            // Empty domains never reach here, so only the free sides are skipped
            if column.lower != f64::NEG_INFINITY {
                definition = definition.min(column.lower);
            }
            if column.upper != f64::INFINITY {
                definition = definition.max(column.upper);
            }
            lp_variables.push(vars.add(definition));
        }

        // Constant offset stays in the buffer; objective_at adds it back
        let mut obj_expr: Expression = 0.into();
        for term in &model.objective {
            obj_expr += term.coefficient * lp_variables[term.var];
        }

        let unsolved = match model.sense {
            ObjectiveSense::Minimize => vars.minimise(obj_expr),
            ObjectiveSense::Maximize => vars.maximise(obj_expr),
        };
        let mut lp_model = unsolved.using(microlp);

        for row in &model.rows {
            let mut lhs: Expression = 0.into();
            for term in &row.terms {
                lhs += term.coefficient * lp_variables[term.var];
            }

            lp_model = match row.relation {
                Relation::LessThanOrEqual => lp_model.with(lhs.leq(row.rhs)),
                Relation::Equal => lp_model.with(lhs.eq(row.rhs)),
                Relation::GreaterThanOrEqual => lp_model.with(lhs.geq(row.rhs)),
            };
        }

        if let Some(limit) = model.time_limit {
            lp_model = lp_model.with_time_limit(limit);
        }

        match lp_model.solve() {
            Ok(solution) => {
                let values = lp_variables.iter().map(|&v| solution.value(v)).collect();
                Ok(Outcome {
                    status: solution_status(solution.status()),
                    values: Some(values),
                })
            }
            Err(e) => failure_outcome(e, model.time_limit),
        }
    }
}

fn solution_status(status: SolutionStatus) -> EngineStatus {
    match status {
        SolutionStatus::Optimal => EngineStatus::Optimal,
        SolutionStatus::TimeLimit => EngineStatus::TimeLimit,
        SolutionStatus::GapLimit => EngineStatus::Suboptimal,
    }
}

/// Map a failed solve to an outcome. microlp reports a time limit hit before
/// any incumbent as `ResolutionError::Other`.
fn failure_outcome(error: ResolutionError, time_limit: Option<f64>) -> EngineResult<Outcome> {
    match error {
        ResolutionError::Infeasible => Ok(Outcome::without_values(EngineStatus::Infeasible)),
        ResolutionError::Unbounded => Ok(Outcome::without_values(EngineStatus::Unbounded)),
        ResolutionError::Other(reason) if time_limit.is_some() => {
            debug!(
                component = "engine",
                engine = MicroLpBackend::NAME,
                reason,
                "Stopped by time limit without a solution"
            );
            Ok(Outcome::without_values(EngineStatus::TimeLimit))
        }
        e => Err(EngineError::Backend(format!("{:?}", e))),
    }
}
