pub mod config;
pub mod error;
pub mod repertoire;
pub mod scheduler;
pub mod session;
pub mod store;

pub use error::TrainerError;
pub use repertoire::Repertoire;
pub use scheduler::ReviewOutcome;
pub use session::{DrillSession, Hint, Phase, SessionStep, SessionSummary, Verdict};
pub use store::{LineStore, MemoryStore};
