use crate::application::SolverSession;
use crate::domain::{
    config::SolverConfig,
    engine::SolverEngine,
    error::Result,
    value_objects::SolverBackend,
};

/// Engine behind a trait object; every bundled backend addresses columns by index.
pub type DynEngine = Box<dyn SolverEngine<Var = usize>>;

/// Factory for creating engines and sessions based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create an engine for a specific backend
    pub fn create_engine(backend: SolverBackend) -> Result<DynEngine> {
        match backend {
            SolverBackend::Auto => Self::default_engine(),
            SolverBackend::MicroLp => microlp_engine(),
            SolverBackend::Highs => highs_engine(),
        }
    }

    /// Create a session on the configured backend
    pub fn create_session(config: SolverConfig) -> Result<SolverSession<DynEngine>> {
        let engine = Self::create_engine(config.backend)?;
        SolverSession::with_config(engine, config)
    }

    /// Get the default engine (HiGHS when compiled in, microlp otherwise)
    pub fn default_engine() -> Result<DynEngine> {
        highs_engine().or_else(|_| microlp_engine())
    }
}

#[cfg(feature = "microlp")]
fn microlp_engine() -> Result<DynEngine> {
    Ok(Box::new(super::GoodLpEngine::new()))
}

#[cfg(not(feature = "microlp"))]
fn microlp_engine() -> Result<DynEngine> {
    Err(crate::domain::error::SolverError::SolverNotAvailable(
        "microlp (enable the `microlp` feature)".to_string(),
    ))
}

#[cfg(feature = "highs")]
fn highs_engine() -> Result<DynEngine> {
    Ok(Box::new(super::HighsEngine::new()))
}

#[cfg(not(feature = "highs"))]
fn highs_engine() -> Result<DynEngine> {
    Err(crate::domain::error::SolverError::SolverNotAvailable(
        "HiGHS (enable the `highs` feature)".to_string(),
    ))
}
