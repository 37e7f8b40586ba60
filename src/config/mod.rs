#[cfg(feature = "cli")]
pub mod cli;
pub mod manifest;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, DoctorCli};
pub use manifest::{InstallMode, LaunchManifest, PackageSpec};
