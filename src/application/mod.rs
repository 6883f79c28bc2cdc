// Application layer: session orchestration over the domain model

pub mod session;

pub use session::SolverSession;
