pub mod banner;
pub mod env_file;
pub mod interactive;
pub mod setup;

pub use crate::domain::model::{LangVars, ProjectDetails, VersionConstraint};
pub use crate::domain::ports::{ComposerRunner, LicenseClient, Reporter, Translator};
pub use crate::utils::error::Result;
