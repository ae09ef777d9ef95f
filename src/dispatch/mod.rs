//! Execution-mode dispatch: validated configuration -> one supervised
//! external invocation

pub mod mode;
pub mod runner;
pub mod target;
pub mod transcript;

pub use mode::{DispatchSettings, ModeConfig};
pub use runner::{ExecutionDispatcher, ExecutionResult, SPAWN_FAILURE_CODE};
pub use target::ExecutionTarget;
pub use transcript::Transcript;
