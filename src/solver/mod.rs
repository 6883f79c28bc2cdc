// Engine adapters: concrete implementations of SolverEngine

pub mod buffered;
pub mod factory;
#[cfg(feature = "microlp")]
pub mod good_lp_engine;
#[cfg(feature = "highs")]
pub mod highs_engine;

pub use buffered::{Backend, BufferedEngine, ModelBuffer, Outcome};
pub use factory::{DynEngine, SolverFactory};
#[cfg(feature = "microlp")]
pub use good_lp_engine::GoodLpEngine;
#[cfg(feature = "highs")]
pub use highs_engine::HighsEngine;
