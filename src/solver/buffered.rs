// Buffered engine model shared by the good_lp and HiGHS adapters
// Both backends build a fresh problem from this buffer on every optimize call

use crate::domain::{
    engine::{
        EngineError, EngineParam, EngineResult, EngineStatus, RowSpec, SolverEngine, VarSpec,
    },
    translator::{LinearTerm, QuadraticTerm},
    value_objects::{ObjectiveSense, Relation, VariableType},
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub lower: f64,
    pub upper: f64,
    pub variable_type: VariableType,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub terms: Vec<LinearTerm<usize>>,
    pub relation: Relation,
    pub rhs: f64,
    pub name: String,
}

/// Linear model as accumulated through the engine calls.
#[derive(Debug, Clone)]
pub struct ModelBuffer {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub objective: Vec<LinearTerm<usize>>,
    pub objective_constant: f64,
    pub sense: ObjectiveSense,
    pub presolve: bool,
    pub time_limit: Option<f64>,
    pub verbose: bool,
}

impl Default for ModelBuffer {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            objective: Vec::new(),
            objective_constant: 0.0,
            sense: ObjectiveSense::Minimize,
            presolve: true,
            time_limit: None,
            verbose: false,
        }
    }
}

impl ModelBuffer {
    /// First column with an empty domain: crossed, NaN, or an infinite
    /// bound on the wrong side.
    pub fn crossed_bounds(&self) -> Option<usize> {
        self.columns.iter().position(|c| {
            c.lower == f64::INFINITY || c.upper == f64::NEG_INFINITY || !(c.lower <= c.upper)
        })
    }

    /// Dense objective coefficients, one per column.
    pub fn objective_coefficients(&self) -> Vec<f64> {
        let mut coefficients = vec![0.0; self.columns.len()];
        for term in &self.objective {
            coefficients[term.var] += term.coefficient;
        }
        coefficients
    }

    pub fn objective_at(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|term| term.coefficient * values[term.var])
            .sum::<f64>()
            + self.objective_constant
    }

    fn check_terms(&self, terms: &[LinearTerm<usize>]) -> EngineResult<()> {
        match terms.iter().find(|t| t.var >= self.columns.len()) {
            Some(term) => Err(EngineError::InvalidVariable(term.var)),
            None => Ok(()),
        }
    }
}

/// Result of running a backend over a buffered model
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: EngineStatus,
    pub values: Option<Vec<f64>>,
}

impl Outcome {
    pub fn without_values(status: EngineStatus) -> Self {
        Self {
            status,
            values: None,
        }
    }
}

/// A concrete solver library that can solve a [`ModelBuffer`].
pub trait Backend {
    const NAME: &'static str;

    fn run(&mut self, model: &ModelBuffer) -> EngineResult<Outcome>;
}

/// Engine over a buffered linear model; columns are addressed by index.
pub struct BufferedEngine<B: Backend> {
    backend: B,
    model: ModelBuffer,
    solution: Option<Vec<f64>>,
    model_disposed: bool,
    env_disposed: bool,
}

impl<B: Backend> BufferedEngine<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            model: ModelBuffer::default(),
            solution: None,
            model_disposed: false,
            env_disposed: false,
        }
    }

    pub fn model(&self) -> &ModelBuffer {
        &self.model
    }

    fn live_model(&mut self) -> EngineResult<&mut ModelBuffer> {
        if self.model_disposed {
            Err(EngineError::Disposed)
        } else {
            Ok(&mut self.model)
        }
    }

    fn column_mut(&mut self, var: usize) -> EngineResult<&mut Column> {
        self.live_model()?
            .columns
            .get_mut(var)
            .ok_or(EngineError::InvalidVariable(var))
    }

    fn quadratic_unsupported(feature: &'static str) -> EngineError {
        EngineError::Unsupported {
            engine: B::NAME,
            feature,
        }
    }
}

impl<B: Backend + Default> Default for BufferedEngine<B> {
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl<B: Backend> SolverEngine for BufferedEngine<B> {
    type Var = usize;

    fn name(&self) -> &str {
        B::NAME
    }

    fn add_var(&mut self, spec: VarSpec<'_>) -> EngineResult<usize> {
        let model = self.live_model()?;
        model.columns.push(Column {
            lower: spec.lower,
            upper: spec.upper,
            variable_type: spec.variable_type,
            name: spec.name.to_string(),
        });
        Ok(model.columns.len() - 1)
    }

    fn set_var_bounds(&mut self, var: usize, lower: f64, upper: f64) -> EngineResult<()> {
        let column = self.column_mut(var)?;
        column.lower = lower;
        column.upper = upper;
        Ok(())
    }

    fn set_var_type(&mut self, var: usize, variable_type: VariableType) -> EngineResult<()> {
        self.column_mut(var)?.variable_type = variable_type;
        Ok(())
    }

    fn add_linear_constraint(
        &mut self,
        terms: &[LinearTerm<usize>],
        row: RowSpec<'_>,
    ) -> EngineResult<()> {
        let model = self.live_model()?;
        model.check_terms(terms)?;
        model.rows.push(Row {
            terms: terms.to_vec(),
            relation: row.relation,
            rhs: row.rhs,
            name: row.name.to_string(),
        });
        Ok(())
    }

    fn add_quadratic_constraint(
        &mut self,
        _linear: &[LinearTerm<usize>],
        _quadratic: &[QuadraticTerm<usize>],
        _row: RowSpec<'_>,
    ) -> EngineResult<()> {
        Err(Self::quadratic_unsupported("quadratic constraint"))
    }

    fn set_linear_objective(
        &mut self,
        terms: &[LinearTerm<usize>],
        constant: f64,
        sense: ObjectiveSense,
    ) -> EngineResult<()> {
        let model = self.live_model()?;
        model.check_terms(terms)?;
        model.objective = terms.to_vec();
        model.objective_constant = constant;
        model.sense = sense;
        Ok(())
    }

    fn set_quadratic_objective(
        &mut self,
        _linear: &[LinearTerm<usize>],
        _quadratic: &[QuadraticTerm<usize>],
        _constant: f64,
        _sense: ObjectiveSense,
    ) -> EngineResult<()> {
        Err(Self::quadratic_unsupported("quadratic objective"))
    }

    fn set_param(&mut self, param: EngineParam) -> EngineResult<()> {
        let model = self.live_model()?;
        match param {
            EngineParam::Presolve(enabled) => model.presolve = enabled,
            EngineParam::TimeLimit(seconds) => model.time_limit = Some(seconds),
            EngineParam::Verbose(enabled) => model.verbose = enabled,
        }
        Ok(())
    }

    fn update(&mut self) -> EngineResult<()> {
        self.live_model().map(|_| ())
    }

    fn optimize(&mut self) -> EngineResult<EngineStatus> {
        self.live_model()?;
        self.solution = None;

        if let Some(column) = self.model.crossed_bounds() {
            debug!(
                component = "engine",
                engine = B::NAME,
                column,
                "Column bounds are crossed; model is infeasible"
            );
            return Ok(EngineStatus::Infeasible);
        }

        let outcome = self.backend.run(&self.model)?;
        debug!(
            component = "engine",
            engine = B::NAME,
            status = %outcome.status,
            columns = self.model.columns.len(),
            rows = self.model.rows.len(),
            "Backend run finished"
        );
        self.solution = outcome.values;
        Ok(outcome.status)
    }

    fn solution_values(&self) -> EngineResult<Vec<f64>> {
        self.solution.clone().ok_or(EngineError::NoSolution)
    }

    fn objective_value(&self) -> EngineResult<f64> {
        self.solution
            .as_deref()
            .map(|values| self.model.objective_at(values))
            .ok_or(EngineError::NoSolution)
    }

    fn compute_iis(&mut self) -> EngineResult<()> {
        debug!(
            component = "engine",
            engine = B::NAME,
            "IIS computation not available; skipping"
        );
        Ok(())
    }

    fn dispose_model(&mut self) -> EngineResult<()> {
        self.model = ModelBuffer::default();
        self.model_disposed = true;
        Ok(())
    }

    fn dispose_env(&mut self) -> EngineResult<()> {
        if self.env_disposed {
            return Err(EngineError::Disposed);
        }
        if !self.model_disposed {
            return Err(EngineError::Backend(
                "environment disposed before model".to_string(),
            ));
        }
        self.env_disposed = true;
        Ok(())
    }
}
