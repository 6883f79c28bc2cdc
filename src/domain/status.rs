// Engine status to portable problem status

use super::engine::EngineStatus;
use super::value_objects::ProblemStatus;

/// Outcome of normalizing a raw engine status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    Final(ProblemStatus),
    /// Ambiguous infeasible-or-unbounded: re-optimize once with presolve off.
    RetryWithoutPresolve,
}

pub fn normalize(status: EngineStatus) -> Normalization {
    match status {
        EngineStatus::InfOrUnbd => Normalization::RetryWithoutPresolve,
        EngineStatus::Optimal => Normalization::Final(ProblemStatus::Optimal),
        EngineStatus::Infeasible => Normalization::Final(ProblemStatus::Infeasible),
        EngineStatus::Unbounded => Normalization::Final(ProblemStatus::Unbounded),
        _ => Normalization::Final(ProblemStatus::Suboptimal),
    }
}

/// Status reported once the presolve-free retry has run.
///
/// The retry's own code is not reinterpreted; the ambiguity always settles
/// on unbounded.
pub fn settle_retry(_retry: EngineStatus) -> ProblemStatus {
    ProblemStatus::Unbounded
}
