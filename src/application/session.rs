// Solver session: drives one engine model from build to release
// Every model mutation is classified and translated here before the engine sees it

use crate::domain::{
    classifier,
    config::SolverConfig,
    engine::{EngineError, EngineParam, EngineStatus, RowSpec, SolverEngine, VarSpec},
    error::{Result, SolverError},
    models::{Constraint, Expression, Objective, Variable},
    status::{self, Normalization},
    translator::{self, TermBatch, TranslateError},
    value_objects::{ExpressionOrder, ProblemStatus, VariableType},
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// One problem instance bound to one engine model.
///
/// The session owns the engine and every counter and cache derived from
/// it. It is released exactly once, either explicitly through
/// [`SolverSession::release`] or on drop.
pub struct SolverSession<E: SolverEngine> {
    engine: E,
    config: SolverConfig,
    variables: Vec<Variable>,
    handles: Vec<E::Var>,
    rows: usize,
    solution: Option<Vec<f64>>,
    objective_value: Option<f64>,
    status: ProblemStatus,
    released: bool,
}

impl<E: SolverEngine> SolverSession<E> {
    pub fn new(engine: E) -> Result<Self> {
        Self::with_config(engine, SolverConfig::default())
    }

    /// Create a session and push the configured engine parameters.
    pub fn with_config(engine: E, config: SolverConfig) -> Result<Self> {
        if let Some(limit) = config.time_limit {
            validate_time_limit(limit)?;
        }

        let mut session = Self {
            engine,
            config,
            variables: Vec::new(),
            handles: Vec::new(),
            rows: 0,
            solution: None,
            objective_value: None,
            status: ProblemStatus::NotSolved,
            released: false,
        };

        session
            .engine
            .set_param(EngineParam::Verbose(session.config.verbose))?;
        if let Some(limit) = session.config.time_limit {
            session.engine.set_param(EngineParam::TimeLimit(limit))?;
        }
        if let Some(presolve) = session.config.presolve {
            session.engine.set_param(EngineParam::Presolve(presolve))?;
        }

        debug!(
            component = "session",
            operation = "init",
            engine = session.engine.name(),
            "Created solver session"
        );
        Ok(session)
    }

    /// Create continuous columns on `[0, +inf)` up to `cols`.
    ///
    /// Columns that already exist are left untouched, so repeated calls only
    /// ever append. `rows` is a sizing hint.
    pub fn build_problem(&mut self, rows: usize, cols: usize) -> Result<()> {
        self.ensure_active()?;

        let existing = self.variables.len();
        for index in existing..cols {
            let variable = Variable::continuous(index);
            let handle = self.engine.add_var(VarSpec {
                lower: variable.lower_bound,
                upper: variable.upper_bound,
                objective: 0.0,
                variable_type: variable.variable_type,
                name: &variable.name,
            })?;
            self.handles.push(handle);
            self.variables.push(variable);
        }
        self.engine.update()?;

        debug!(
            component = "session",
            operation = "build_problem",
            rows_hint = rows,
            requested = cols,
            added = self.variables.len() - existing,
            "Built problem columns"
        );
        Ok(())
    }

    /// Overwrite both bounds of a column.
    ///
    /// Crossed bounds are forwarded unchanged; the engine reports them as
    /// infeasible at solve time.
    pub fn set_bounds(&mut self, index: usize, lower: f64, upper: f64) -> Result<()> {
        self.ensure_active()?;
        let handle = self.handle(index)?;
        self.engine.set_var_bounds(handle, lower, upper)?;

        let variable = &mut self.variables[index];
        variable.lower_bound = lower;
        variable.upper_bound = upper;

        if lower > upper {
            debug!(
                component = "session",
                operation = "set_bounds",
                index,
                lower,
                upper,
                "Crossed bounds passed through to engine"
            );
        }
        Ok(())
    }

    pub fn set_unbound_upper_bound(&mut self, index: usize) -> Result<()> {
        let lower = self.variable(index)?.lower_bound;
        self.set_bounds(index, lower, f64::INFINITY)
    }

    pub fn set_unbound_lower_bound(&mut self, index: usize) -> Result<()> {
        let upper = self.variable(index)?.upper_bound;
        self.set_bounds(index, f64::NEG_INFINITY, upper)
    }

    /// Change a column's domain. Binary columns get bounds `[0, 1]`.
    pub fn set_variable_type(&mut self, index: usize, variable_type: VariableType) -> Result<()> {
        self.ensure_active()?;
        let handle = self.handle(index)?;
        self.engine.set_var_type(handle, variable_type)?;
        self.variables[index].variable_type = variable_type;

        if variable_type == VariableType::Binary {
            self.set_bounds(index, 0.0, 1.0)?;
        }
        Ok(())
    }

    /// Install the objective, replacing any previous one.
    pub fn add_objective(&mut self, objective: &Objective) -> Result<()> {
        self.ensure_active()?;
        let expression = &objective.expression;
        let order = classifier::classify(expression);
        let constant = expression.constant();

        match order {
            ExpressionOrder::Higher(_) => return Err(unsupported(order, expression)),
            ExpressionOrder::Quadratic => {
                let batch = self.translate(expression)?;
                self.engine.set_quadratic_objective(
                    &batch.linear,
                    &batch.quadratic,
                    constant,
                    objective.sense,
                )?;
            }
            ExpressionOrder::Constant | ExpressionOrder::Linear => {
                let batch = self.translate(expression)?;
                self.engine
                    .set_linear_objective(&batch.linear, constant, objective.sense)?;
            }
        }
        self.engine.update()?;

        debug!(
            component = "session",
            operation = "add_objective",
            order = %order,
            sense = objective.sense.code(),
            terms = expression.num_terms(),
            "Set objective"
        );
        Ok(())
    }

    /// Add one row. The row counter only moves once the engine accepted it.
    pub fn add_constraint(&mut self, constraint: &Constraint) -> Result<()> {
        self.ensure_active()?;
        let expression = constraint.expression();
        let order = classifier::classify(expression);

        let batch = match order {
            ExpressionOrder::Higher(_) => return Err(unsupported(order, expression)),
            _ => self.translate(expression)?,
        };

        let name = constraint
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("c{}", self.rows + 1));
        let row = RowSpec {
            relation: constraint.relation(),
            rhs: constraint.rhs(),
            name: &name,
        };

        match order {
            ExpressionOrder::Quadratic => {
                self.engine
                    .add_quadratic_constraint(&batch.linear, &batch.quadratic, row)?;
            }
            _ => self.engine.add_linear_constraint(&batch.linear, row)?,
        }
        self.rows += 1;

        debug!(
            component = "session",
            operation = "add_constraint",
            row = %name,
            order = %order,
            terms = batch.len(),
            relation = %constraint.relation(),
            rhs = constraint.rhs(),
            "Added constraint"
        );
        Ok(())
    }

    /// Optimize and normalize the engine's result.
    ///
    /// An infeasible-or-unbounded result triggers exactly one re-optimize
    /// with presolve disabled and is then reported as unbounded.
    pub fn solve(&mut self) -> Result<ProblemStatus> {
        self.ensure_active()?;
        let start_time = Instant::now();

        self.engine.update()?;
        let first = self.engine.optimize()?;

        let status = match status::normalize(first) {
            Normalization::Final(status) => status,
            Normalization::RetryWithoutPresolve => self.retry_without_presolve()?,
        };

        self.status = status;
        self.solution = None;
        self.objective_value = None;

        match status {
            ProblemStatus::Optimal => self.load_solution()?,
            ProblemStatus::Suboptimal => self.load_best_effort(first),
            ProblemStatus::Infeasible => self.diagnose_infeasible(),
            ProblemStatus::Unbounded | ProblemStatus::NotSolved => {}
        }

        info!(
            component = "session",
            operation = "solve",
            engine = self.engine.name(),
            engine_status = %first,
            engine_code = first.code(),
            status = %status,
            solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0,
            "Solve finished"
        );
        Ok(status)
    }

    fn retry_without_presolve(&mut self) -> Result<ProblemStatus> {
        warn!(
            component = "session",
            operation = "solve",
            "Engine reported infeasible or unbounded; retrying without presolve"
        );
        self.engine.set_param(EngineParam::Presolve(false))?;
        let retry = self.engine.optimize()?;
        if retry != EngineStatus::Unbounded {
            warn!(
                component = "session",
                operation = "solve",
                retry_status = %retry,
                "Retry status is not re-examined; reporting unbounded"
            );
        }
        Ok(status::settle_retry(retry))
    }

    fn load_solution(&mut self) -> Result<()> {
        let values = self.engine.solution_values()?;
        if values.len() != self.variables.len() {
            return Err(EngineError::Backend(format!(
                "engine returned {} values for {} columns",
                values.len(),
                self.variables.len()
            ))
            .into());
        }
        self.objective_value = Some(self.engine.objective_value()?);
        self.solution = Some(values);
        Ok(())
    }

    fn load_best_effort(&mut self, engine_status: EngineStatus) {
        match self.engine.solution_values() {
            Ok(values) if values.len() == self.variables.len() => {
                self.objective_value = self.engine.objective_value().ok();
                self.solution = Some(values);
            }
            Ok(values) => warn!(
                component = "session",
                operation = "solve",
                engine_status = %engine_status,
                values = values.len(),
                columns = self.variables.len(),
                "Discarding best-effort solution of the wrong length"
            ),
            Err(err) => warn!(
                component = "session",
                operation = "solve",
                engine_status = %engine_status,
                error = %err,
                "No best-effort solution available"
            ),
        }
    }

    fn diagnose_infeasible(&mut self) {
        if !self.config.compute_iis {
            return;
        }
        if let Err(err) = self.engine.compute_iis() {
            warn!(
                component = "session",
                operation = "compute_iis",
                error = %err,
                "IIS computation failed"
            );
        }
    }

    /// Set a wall-clock limit on subsequent solves.
    pub fn set_timeout(&mut self, limit: f64) -> Result<()> {
        self.ensure_active()?;
        validate_time_limit(limit)?;
        self.engine.set_param(EngineParam::TimeLimit(limit))?;
        self.config.time_limit = Some(limit);
        Ok(())
    }

    /// Dispose the engine model, then its environment.
    pub fn release(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.released = true;

        let model = self.engine.dispose_model();
        let env = self.engine.dispose_env();
        model?;
        env?;

        debug!(
            component = "session",
            operation = "release",
            rows = self.rows,
            columns = self.variables.len(),
            "Released solver session"
        );
        Ok(())
    }

    pub fn status(&self) -> ProblemStatus {
        self.status
    }

    /// Solved value of column `index`.
    pub fn value(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        self.solution
            .as_ref()
            .and_then(|values| values.get(index).copied())
            .ok_or(SolverError::NoSolution)
    }

    pub fn solution(&self) -> Result<&[f64]> {
        self.solution.as_deref().ok_or(SolverError::NoSolution)
    }

    pub fn objective_value(&self) -> Result<f64> {
        self.objective_value.ok_or(SolverError::NoSolution)
    }

    pub fn variable(&self, index: usize) -> Result<&Variable> {
        self.check_index(index)?;
        Ok(&self.variables[index])
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.variables.len()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn ensure_active(&self) -> Result<()> {
        if self.released {
            Err(SolverError::SessionReleased)
        } else {
            Ok(())
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.variables.len() {
            Ok(())
        } else {
            Err(SolverError::VariableOutOfRange {
                index,
                columns: self.variables.len(),
            })
        }
    }

    fn handle(&self, index: usize) -> Result<E::Var> {
        self.check_index(index)?;
        Ok(self.handles[index])
    }

    fn translate(&self, expression: &Expression) -> Result<TermBatch<E::Var>> {
        let handles = &self.handles;
        translator::translate_expression(expression, |index| handles.get(index).copied()).map_err(
            |err| match err {
                TranslateError::UnknownVariable(index) => SolverError::VariableOutOfRange {
                    index,
                    columns: handles.len(),
                },
                other => other.into(),
            },
        )
    }
}

impl<E: SolverEngine> Drop for SolverSession<E> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.release() {
            warn!(
                component = "session",
                operation = "release",
                error = %err,
                "Release on drop failed"
            );
        }
    }
}

fn unsupported(order: ExpressionOrder, expression: &Expression) -> SolverError {
    SolverError::UnsupportedOrder {
        order,
        expression: Box::new(expression.clone()),
    }
}

fn validate_time_limit(limit: f64) -> Result<()> {
    if limit.is_finite() && limit >= 0.0 {
        Ok(())
    } else {
        Err(SolverError::InvalidTimeLimit(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engine::EngineResult;
    use crate::domain::translator::{LinearTerm, QuadraticTerm};
    use crate::domain::value_objects::{ObjectiveSense, Relation};
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        AddVar(String, f64, f64),
        SetBounds(usize, f64, f64),
        SetType(usize, VariableType),
        LinearRow(Vec<LinearTerm<usize>>, Relation, f64, String),
        QuadraticRow(Vec<LinearTerm<usize>>, Vec<QuadraticTerm<usize>>, Relation, f64),
        LinearObjective(Vec<LinearTerm<usize>>, f64, i32),
        QuadraticObjective(Vec<LinearTerm<usize>>, Vec<QuadraticTerm<usize>>, f64, i32),
        Param(EngineParam),
        Update,
        Optimize,
        ComputeIis,
        DisposeModel,
        DisposeEnv,
    }

    /// Records every call and replays scripted optimize results.
    #[derive(Default)]
    struct ScriptedEngine {
        calls: Vec<Call>,
        columns: usize,
        statuses: VecDeque<EngineStatus>,
        values: Option<Vec<f64>>,
        objective: f64,
    }

    impl ScriptedEngine {
        fn replying(statuses: &[EngineStatus]) -> Self {
            Self {
                statuses: statuses.iter().copied().collect(),
                ..Default::default()
            }
        }

        fn with_values(mut self, values: &[f64], objective: f64) -> Self {
            self.values = Some(values.to_vec());
            self.objective = objective;
            self
        }

        fn count(&self, wanted: &Call) -> usize {
            self.calls.iter().filter(|call| *call == wanted).count()
        }

        fn model_calls(&self) -> Vec<&Call> {
            self.calls
                .iter()
                .filter(|call| !matches!(call, Call::Update | Call::Param(EngineParam::Verbose(_))))
                .collect()
        }
    }

    impl SolverEngine for ScriptedEngine {
        type Var = usize;

        fn name(&self) -> &str {
            "scripted"
        }

        fn add_var(&mut self, spec: VarSpec<'_>) -> EngineResult<usize> {
            self.calls
                .push(Call::AddVar(spec.name.to_string(), spec.lower, spec.upper));
            self.columns += 1;
            Ok(self.columns - 1)
        }

        fn set_var_bounds(&mut self, var: usize, lower: f64, upper: f64) -> EngineResult<()> {
            self.calls.push(Call::SetBounds(var, lower, upper));
            Ok(())
        }

        fn set_var_type(&mut self, var: usize, variable_type: VariableType) -> EngineResult<()> {
            self.calls.push(Call::SetType(var, variable_type));
            Ok(())
        }

        fn add_linear_constraint(
            &mut self,
            terms: &[LinearTerm<usize>],
            row: RowSpec<'_>,
        ) -> EngineResult<()> {
            self.calls.push(Call::LinearRow(
                terms.to_vec(),
                row.relation,
                row.rhs,
                row.name.to_string(),
            ));
            Ok(())
        }

        fn add_quadratic_constraint(
            &mut self,
            linear: &[LinearTerm<usize>],
            quadratic: &[QuadraticTerm<usize>],
            row: RowSpec<'_>,
        ) -> EngineResult<()> {
            self.calls.push(Call::QuadraticRow(
                linear.to_vec(),
                quadratic.to_vec(),
                row.relation,
                row.rhs,
            ));
            Ok(())
        }

        fn set_linear_objective(
            &mut self,
            terms: &[LinearTerm<usize>],
            constant: f64,
            sense: ObjectiveSense,
        ) -> EngineResult<()> {
            self.calls
                .push(Call::LinearObjective(terms.to_vec(), constant, sense.code()));
            Ok(())
        }

        fn set_quadratic_objective(
            &mut self,
            linear: &[LinearTerm<usize>],
            quadratic: &[QuadraticTerm<usize>],
            constant: f64,
            sense: ObjectiveSense,
        ) -> EngineResult<()> {
            self.calls.push(Call::QuadraticObjective(
                linear.to_vec(),
                quadratic.to_vec(),
                constant,
                sense.code(),
            ));
            Ok(())
        }

        fn set_param(&mut self, param: EngineParam) -> EngineResult<()> {
            self.calls.push(Call::Param(param));
            Ok(())
        }

        fn update(&mut self) -> EngineResult<()> {
            self.calls.push(Call::Update);
            Ok(())
        }

        fn optimize(&mut self) -> EngineResult<EngineStatus> {
            self.calls.push(Call::Optimize);
            self.statuses
                .pop_front()
                .ok_or_else(|| EngineError::Backend("no scripted status left".to_string()))
        }

        fn solution_values(&self) -> EngineResult<Vec<f64>> {
            self.values.clone().ok_or(EngineError::NoSolution)
        }

        fn objective_value(&self) -> EngineResult<f64> {
            self.values
                .as_ref()
                .map(|_| self.objective)
                .ok_or(EngineError::NoSolution)
        }

        fn compute_iis(&mut self) -> EngineResult<()> {
            self.calls.push(Call::ComputeIis);
            Ok(())
        }

        fn dispose_model(&mut self) -> EngineResult<()> {
            self.calls.push(Call::DisposeModel);
            Ok(())
        }

        fn dispose_env(&mut self) -> EngineResult<()> {
            self.calls.push(Call::DisposeEnv);
            Ok(())
        }
    }

    fn session(engine: ScriptedEngine, cols: usize) -> SolverSession<ScriptedEngine> {
        let mut session = SolverSession::new(engine).unwrap();
        session.build_problem(0, cols).unwrap();
        session
    }

    fn lin(coefficient: f64, var: usize) -> LinearTerm<usize> {
        LinearTerm { coefficient, var }
    }

    #[test]
    fn test_build_problem_names_and_bounds() {
        let session = session(ScriptedEngine::default(), 3);
        assert_eq!(session.num_cols(), 3);
        assert_eq!(
            session.engine().model_calls(),
            vec![
                &Call::AddVar("x1".to_string(), 0.0, f64::INFINITY),
                &Call::AddVar("x2".to_string(), 0.0, f64::INFINITY),
                &Call::AddVar("x3".to_string(), 0.0, f64::INFINITY),
            ]
        );
        assert_eq!(session.status(), ProblemStatus::NotSolved);
    }

    #[test]
    fn test_build_problem_twice_only_appends() {
        let mut session = session(ScriptedEngine::default(), 2);
        session.build_problem(0, 2).unwrap();
        assert_eq!(session.num_cols(), 2);
        session.build_problem(0, 4).unwrap();
        assert_eq!(session.num_cols(), 4);
        assert_eq!(session.variable(3).unwrap().name, "x4");
        assert_eq!(session.engine().columns, 4);
    }

    #[test]
    fn test_bounds_operations() {
        let mut session = session(ScriptedEngine::default(), 2);
        session.set_bounds(0, 5.0, 1.0).unwrap();
        session.set_unbound_upper_bound(1).unwrap();
        session.set_unbound_lower_bound(1).unwrap();

        let var = session.variable(0).unwrap();
        assert_eq!((var.lower_bound, var.upper_bound), (5.0, 1.0));
        let var = session.variable(1).unwrap();
        assert_eq!(
            (var.lower_bound, var.upper_bound),
            (f64::NEG_INFINITY, f64::INFINITY)
        );

        let engine = session.engine();
        assert_eq!(engine.count(&Call::SetBounds(0, 5.0, 1.0)), 1);
        assert_eq!(engine.count(&Call::SetBounds(1, 0.0, f64::INFINITY)), 1);
        assert_eq!(
            engine.count(&Call::SetBounds(1, f64::NEG_INFINITY, f64::INFINITY)),
            1
        );
    }

    #[test]
    fn test_bounds_out_of_range() {
        let mut session = session(ScriptedEngine::default(), 1);
        let err = session.set_bounds(3, 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            SolverError::VariableOutOfRange {
                index: 3,
                columns: 1
            }
        ));
    }

    #[test]
    fn test_binary_type_clamps_bounds() {
        let mut session = session(ScriptedEngine::default(), 1);
        session.set_variable_type(0, VariableType::Binary).unwrap();
        let var = session.variable(0).unwrap();
        assert!(var.is_integer());
        assert_eq!((var.lower_bound, var.upper_bound), (0.0, 1.0));
        assert_eq!(
            session.engine().count(&Call::SetType(0, VariableType::Binary)),
            1
        );
    }

    #[test]
    fn test_linear_objective() {
        let mut session = session(ScriptedEngine::default(), 2);
        let objective = Objective::maximize(Expression::linear([(0, 3.0), (1, 2.0)]) + 1.0);
        session.add_objective(&objective).unwrap();
        assert_eq!(
            session.engine().model_calls().last(),
            Some(&&Call::LinearObjective(vec![lin(3.0, 0), lin(2.0, 1)], 1.0, -1))
        );
    }

    #[test]
    fn test_quadratic_objective_keeps_linear_terms() {
        let mut session = session(ScriptedEngine::default(), 2);
        let expr = Expression::linear([(0, 1.0)]) + Expression::term([1, 0], 0.5);
        session.add_objective(&Objective::minimize(expr)).unwrap();
        assert_eq!(
            session.engine().model_calls().last(),
            Some(&&Call::QuadraticObjective(
                vec![lin(1.0, 0)],
                vec![QuadraticTerm {
                    coefficient: 0.5,
                    first: 1,
                    second: 0
                }],
                0.0,
                1
            ))
        );
    }

    #[test]
    fn test_objective_is_followed_by_update() {
        let mut session = session(ScriptedEngine::default(), 1);
        session
            .add_objective(&Objective::minimize(Expression::var(0)))
            .unwrap();
        assert_eq!(session.engine().calls.last(), Some(&Call::Update));
    }

    #[test]
    fn test_higher_order_objective_leaves_state() {
        let mut session = session(ScriptedEngine::default(), 3);
        let before = session.engine().calls.len();
        let expr = Expression::term([0, 1, 2], 1.0);
        let err = session
            .add_objective(&Objective::minimize(expr.clone()))
            .unwrap_err();

        match err {
            SolverError::UnsupportedOrder { order, expression } => {
                assert_eq!(order, ExpressionOrder::Higher(3));
                assert_eq!(*expression, expr);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.engine().calls.len(), before);
    }

    #[test]
    fn test_linear_constraint_normalized() {
        let mut session = session(ScriptedEngine::default(), 2);
        let lhs = Expression::linear([(0, 1.0), (1, 1.0)]) + 2.0;
        let constraint = lhs.leq(Expression::var(1) + 10.0);
        session.add_constraint(&constraint).unwrap();

        assert_eq!(session.num_rows(), 1);
        assert_eq!(
            session.engine().model_calls().last(),
            Some(&&Call::LinearRow(
                vec![lin(1.0, 0)],
                Relation::LessThanOrEqual,
                8.0,
                "c1".to_string()
            ))
        );
    }

    #[test]
    fn test_quadratic_constraint() {
        let mut session = session(ScriptedEngine::default(), 2);
        let expr = Expression::term([0, 0], 1.0) + Expression::term([1, 1], 1.0);
        session
            .add_constraint(&expr.leq(4.0).with_name("disk"))
            .unwrap();
        match session.engine().model_calls().last() {
            Some(Call::QuadraticRow(linear, quadratic, Relation::LessThanOrEqual, rhs)) => {
                assert!(linear.is_empty());
                assert_eq!(quadratic.len(), 2);
                assert_eq!(*rhs, 4.0);
            }
            other => panic!("unexpected call: {other:?}"),
        }
        assert_eq!(session.num_rows(), 1);
    }

    #[test]
    fn test_rejected_constraint_does_not_count() {
        let mut session = session(ScriptedEngine::default(), 3);
        let cubic = Expression::term([0, 1, 2], 1.0);
        let err = session.add_constraint(&cubic.geq(1.0)).unwrap_err();
        assert!(matches!(err, SolverError::UnsupportedOrder { .. }));
        assert_eq!(session.num_rows(), 0);

        session
            .add_constraint(&Expression::var(0).leq(1.0))
            .unwrap();
        assert_eq!(session.num_rows(), 1);
    }

    #[test]
    fn test_constraint_with_unknown_variable() {
        let mut session = session(ScriptedEngine::default(), 1);
        let err = session
            .add_constraint(&Expression::var(4).leq(1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            SolverError::VariableOutOfRange {
                index: 4,
                columns: 1
            }
        ));
        assert_eq!(session.num_rows(), 0);
    }

    #[test]
    fn test_solve_optimal_populates_solution() {
        let engine =
            ScriptedEngine::replying(&[EngineStatus::Optimal]).with_values(&[1.0, 2.5], 7.0);
        let mut session = session(engine, 2);

        assert!(matches!(session.value(0), Err(SolverError::NoSolution)));
        assert_eq!(session.solve().unwrap(), ProblemStatus::Optimal);
        assert_eq!(session.solution().unwrap(), &[1.0, 2.5]);
        assert_eq!(session.value(1).unwrap(), 2.5);
        assert_eq!(session.objective_value().unwrap(), 7.0);
    }

    #[test]
    fn test_solve_optimal_with_wrong_length_fails() {
        let engine = ScriptedEngine::replying(&[EngineStatus::Optimal]).with_values(&[1.0], 1.0);
        let mut session = session(engine, 2);
        assert!(matches!(
            session.solve(),
            Err(SolverError::Engine(EngineError::Backend(_)))
        ));
    }

    #[test]
    fn test_inf_or_unbd_retries_once_without_presolve() {
        let engine = ScriptedEngine::replying(&[EngineStatus::InfOrUnbd, EngineStatus::Infeasible]);
        let mut session = session(engine, 1);

        assert_eq!(session.solve().unwrap(), ProblemStatus::Unbounded);
        let engine = session.engine();
        assert_eq!(engine.count(&Call::Optimize), 2);
        assert_eq!(engine.count(&Call::Param(EngineParam::Presolve(false))), 1);
        assert!(engine.statuses.is_empty());
        assert!(matches!(session.solution(), Err(SolverError::NoSolution)));
    }

    #[test]
    fn test_infeasible_computes_iis() {
        let mut session = session(ScriptedEngine::replying(&[EngineStatus::Infeasible]), 1);
        assert_eq!(session.solve().unwrap(), ProblemStatus::Infeasible);
        assert_eq!(session.engine().count(&Call::ComputeIis), 1);
        assert!(session.objective_value().is_err());
    }

    #[test]
    fn test_infeasible_without_iis() {
        let engine = ScriptedEngine::replying(&[EngineStatus::Infeasible]);
        let config = SolverConfig::new().with_compute_iis(false);
        let mut session = SolverSession::with_config(engine, config).unwrap();
        assert_eq!(session.solve().unwrap(), ProblemStatus::Infeasible);
        assert_eq!(session.engine().count(&Call::ComputeIis), 0);
    }

    #[test]
    fn test_unbounded_has_no_solution() {
        let engine = ScriptedEngine::replying(&[EngineStatus::Unbounded]).with_values(&[9.0], 9.0);
        let mut session = session(engine, 1);
        assert_eq!(session.solve().unwrap(), ProblemStatus::Unbounded);
        assert!(matches!(session.value(0), Err(SolverError::NoSolution)));
    }

    #[test]
    fn test_other_codes_are_suboptimal_best_effort() {
        let engine = ScriptedEngine::replying(&[EngineStatus::TimeLimit, EngineStatus::Numeric])
            .with_values(&[0.5], 3.0);
        let mut session = session(engine, 1);
        assert_eq!(session.solve().unwrap(), ProblemStatus::Suboptimal);
        assert_eq!(session.value(0).unwrap(), 0.5);

        session.engine.values = None;
        assert_eq!(session.solve().unwrap(), ProblemStatus::Suboptimal);
        assert!(matches!(session.value(0), Err(SolverError::NoSolution)));
    }

    #[test]
    fn test_status_overwritten_each_solve() {
        let engine = ScriptedEngine::replying(&[EngineStatus::Optimal, EngineStatus::Infeasible])
            .with_values(&[1.0], 1.0);
        let mut session = session(engine, 1);
        assert_eq!(session.solve().unwrap(), ProblemStatus::Optimal);
        assert_eq!(session.solve().unwrap(), ProblemStatus::Infeasible);
        assert_eq!(session.status(), ProblemStatus::Infeasible);
        assert!(session.solution().is_err());
    }

    #[test]
    fn test_timeout_validation() {
        let mut session = session(ScriptedEngine::default(), 1);
        session.set_timeout(0.0).unwrap();
        session.set_timeout(12.5).unwrap();
        assert_eq!(session.config().time_limit, Some(12.5));
        assert_eq!(
            session
                .engine()
                .count(&Call::Param(EngineParam::TimeLimit(12.5))),
            1
        );

        assert!(matches!(
            session.set_timeout(-1.0),
            Err(SolverError::InvalidTimeLimit(_))
        ));
        assert!(matches!(
            session.set_timeout(f64::NAN),
            Err(SolverError::InvalidTimeLimit(_))
        ));
    }

    #[test]
    fn test_config_is_applied_at_creation() {
        let config = SolverConfig::new()
            .with_time_limit(5.0)
            .with_presolve(false)
            .with_verbose(true);
        let session = SolverSession::with_config(ScriptedEngine::default(), config).unwrap();
        assert_eq!(
            session.engine().calls,
            vec![
                Call::Param(EngineParam::Verbose(true)),
                Call::Param(EngineParam::TimeLimit(5.0)),
                Call::Param(EngineParam::Presolve(false)),
            ]
        );

        let bad = SolverConfig::new().with_time_limit(-3.0);
        assert!(SolverSession::with_config(ScriptedEngine::default(), bad).is_err());
    }

    #[test]
    fn test_release_order_and_reads_survive() {
        let engine = ScriptedEngine::replying(&[EngineStatus::Optimal]).with_values(&[4.0], 4.0);
        let mut session = session(engine, 1);
        session.solve().unwrap();
        let before = session.solution().unwrap().to_vec();

        session.release().unwrap();
        assert!(session.is_released());
        let calls = &session.engine().calls;
        assert_eq!(
            &calls[calls.len() - 2..],
            &[Call::DisposeModel, Call::DisposeEnv]
        );

        assert_eq!(session.solution().unwrap(), before.as_slice());
        assert_eq!(session.status(), ProblemStatus::Optimal);
    }

    #[test]
    fn test_operations_after_release_fail() {
        let mut session = session(ScriptedEngine::default(), 1);
        session.release().unwrap();
        assert!(matches!(session.release(), Err(SolverError::SessionReleased)));
        assert!(matches!(session.solve(), Err(SolverError::SessionReleased)));
        assert!(matches!(
            session.set_bounds(0, 0.0, 1.0),
            Err(SolverError::SessionReleased)
        ));
        assert_eq!(session.engine().count(&Call::DisposeModel), 1);
    }
}
