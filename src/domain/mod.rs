// Domain module: algebraic model, classification, translation and the engine contract

pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod status;
pub mod translator;
pub mod value_objects;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use models::*;
pub use value_objects::*;
