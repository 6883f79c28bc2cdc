// HiGHS adapter
// Rebuilds a HiGHS RowProblem from the buffered model on every optimize

use super::buffered::{Backend, BufferedEngine, ModelBuffer, Outcome};
use crate::domain::{
    engine::{EngineError, EngineResult, EngineStatus},
    value_objects::{ObjectiveSense, Relation},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use tracing::debug;

#[derive(Debug, Default)]
pub struct HighsBackend;

/// Engine solving buffered models through HiGHS
pub type HighsEngine = BufferedEngine<HighsBackend>;

impl HighsEngine {
    pub fn new() -> Self {
        Self::with_backend(HighsBackend)
    }
}

impl Backend for HighsBackend {
    const NAME: &'static str = "HiGHS";

    fn run(&mut self, model: &ModelBuffer) -> EngineResult<Outcome> {
        // Use HiGHS RowProblem (add columns first, then rows)
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(model.columns.len());

        let objective = model.objective_coefficients();
        for (column, &obj_coeff) in model.columns.iter().zip(&objective) {
            let lower = column.lower;
            let upper = column.upper;

            let col = if column.variable_type.is_integer() {
                pb.add_integer_column(obj_coeff, lower..upper)
            } else {
                pb.add_column(obj_coeff, lower..upper)
            };
            cols.push(col);
        }

        for row in &model.rows {
            let terms: Vec<_> = row
                .terms
                .iter()
                .map(|term| (cols[term.var], term.coefficient))
                .collect();

            match row.relation {
                Relation::LessThanOrEqual => pb.add_row(..=row.rhs, &terms),
                Relation::Equal => pb.add_row(row.rhs..=row.rhs, &terms),
                Relation::GreaterThanOrEqual => pb.add_row(row.rhs.., &terms),
            }
        }

        let sense = match model.sense {
            ObjectiveSense::Maximize => Sense::Maximise,
            ObjectiveSense::Minimize => Sense::Minimise,
        };

        let mut highs_model = pb.optimise(sense);
        highs_model.set_option("output_flag", model.verbose);
        highs_model.set_option("presolve", if model.presolve { "on" } else { "off" });
        if let Some(limit) = model.time_limit {
            highs_model.set_option("time_limit", limit);
        }

        let solved = highs_model.solve();
        let status = engine_status(solved.status())?;
        let values = match status {
            EngineStatus::Infeasible | EngineStatus::InfOrUnbd | EngineStatus::Unbounded => None,
            _ => Some(solved.get_solution().columns().to_vec()),
        };
        Ok(Outcome { status, values })
    }
}

/// Map a HiGHS model status to an engine code. Only load and solve
/// failures are errors; every other stop is a status.
fn engine_status(status: HighsModelStatus) -> EngineResult<EngineStatus> {
    let status = match status {
        HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty => EngineStatus::Optimal,
        HighsModelStatus::Infeasible => EngineStatus::Infeasible,
        HighsModelStatus::UnboundedOrInfeasible => EngineStatus::InfOrUnbd,
        HighsModelStatus::Unbounded => EngineStatus::Unbounded,
        HighsModelStatus::ObjectiveBound => EngineStatus::Cutoff,
        HighsModelStatus::ObjectiveTarget => EngineStatus::UserObjLimit,
        HighsModelStatus::ReachedTimeLimit => EngineStatus::TimeLimit,
        HighsModelStatus::ReachedIterationLimit => EngineStatus::IterationLimit,
        HighsModelStatus::Unknown => EngineStatus::Numeric,
        HighsModelStatus::NotSet
        | HighsModelStatus::LoadError
        | HighsModelStatus::ModelError
        | HighsModelStatus::PresolveError
        | HighsModelStatus::SolveError
        | HighsModelStatus::PostsolveError => {
            return Err(EngineError::Backend(format!(
                "HiGHS solver returned status: {:?}",
                status
            )))
        }
        // Solution-limit and interrupt stops in newer HiGHS releases
        #[allow(unreachable_patterns)]
        other => {
            debug!(
                component = "engine",
                engine = HighsBackend::NAME,
                status = ?other,
                "Unmapped HiGHS stop reported as interrupted"
            );
            EngineStatus::Interrupted
        }
    };
    Ok(status)
}
