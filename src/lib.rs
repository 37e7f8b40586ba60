pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, DoctorCli};

pub use adapters::{SystemRunner, TerminalConsole};
pub use config::LaunchManifest;
pub use crate::core::{doctor::Doctor, plan::LaunchPlan, supervisor::LaunchSupervisor};
pub use utils::error::{LaunchError, Result};
