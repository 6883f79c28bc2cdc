use super::value_objects::SolverBackend;

/// Configuration for a solver session
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit in seconds. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Enable/disable presolve. `None` keeps the engine default.
    pub presolve: Option<bool>,
    /// Ask the engine for an irreducible infeasible subsystem on infeasible results.
    pub compute_iis: bool,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            presolve: None,
            compute_iis: true,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    pub fn with_compute_iis(mut self, enabled: bool) -> Self {
        self.compute_iis = enabled;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
