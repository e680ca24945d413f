use crate::config::toml_config::InstallerConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cms-installer")]
#[command(about = "Installer helpers for the CMS: core packages, license activation and .env setup")]
pub struct CliConfig {
    /// Path to an installer TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Application base path (overrides app.base_path)
    #[arg(long, global = true)]
    pub base_path: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Install the CMS core packages with composer
    Install {
        /// Composer version constraint for the core packages
        #[arg(long)]
        want: Option<String>,

        /// License key to activate before installing
        #[arg(long)]
        key: Option<String>,
    },

    /// Activate a license key and store the composer credentials
    #[command(name = "project-set", alias = "project:set")]
    ProjectSet {
        /// License key
        key: String,
    },

    /// Create .env from .env.example if missing and report whether it is writable
    EnvCheck,
}

impl CliConfig {
    /// 載入 TOML 配置 (若有) 並套用命令列覆蓋
    pub fn load_installer_config(&self) -> Result<InstallerConfig> {
        let mut config = match &self.config {
            Some(path) => InstallerConfig::from_file(path)?,
            None => InstallerConfig::default(),
        };

        if let Some(base_path) = &self.base_path {
            config.app.base_path = base_path.clone();
        }

        Ok(config)
    }
}
