pub mod dependencies;
pub mod doctor;
pub mod handoff;
pub mod plan;
pub mod runtime;
pub mod supervisor;

pub use crate::domain::model::{
    CommandOutput, DependencyStatus, EntryPointExit, Invocation, LaunchState, RuntimeReport,
    RuntimeVersion,
};
pub use crate::domain::ports::{Console, ProcessRunner};
pub use crate::utils::error::Result;
