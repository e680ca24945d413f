pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{BufferedReporter, ComposerProcess, ConsoleReporter, Lang, UpdateGateway};
pub use config::InstallerConfig;
pub use core::setup::SetupBuilder;
pub use domain::model::{ProjectDetails, VersionConstraint};
pub use utils::error::{Result, SetupError};
