use crate::utils::error::{Result, SetupError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 預設的核心版本限制
pub const WANT_VERSION: &str = "^3.0";

pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.octobercms.com/api";
pub const DEFAULT_COMPOSER_URL: &str = "https://gateway.octobercms.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallerConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub composer: ComposerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub gitignore: GitignoreConfig,
    #[serde(default)]
    pub lang: LangConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default = "default_migrate_command")]
    pub migrate_command: String,
    #[serde(default = "default_build_command")]
    pub build_command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    #[serde(default = "default_composer_binary")]
    pub binary: String,
    #[serde(default = "default_core_packages")]
    pub core_packages: Vec<String>,
    #[serde(default = "default_want_version")]
    pub want_version: String,
    #[serde(default = "default_repository_name")]
    pub repository_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub url: String,
    #[serde(default = "default_composer_url")]
    pub composer_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitignoreConfig {
    #[serde(default = "default_gitignore_entries")]
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LangConfig {
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

fn default_base_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_tool() -> String {
    "php artisan".to_string()
}

fn default_migrate_command() -> String {
    "october:migrate".to_string()
}

fn default_build_command() -> String {
    "october:build".to_string()
}

fn default_composer_binary() -> String {
    "composer".to_string()
}

fn default_core_packages() -> Vec<String> {
    vec!["october/all".to_string(), "october/rain".to_string()]
}

fn default_want_version() -> String {
    WANT_VERSION.to_string()
}

fn default_repository_name() -> String {
    "octobercms".to_string()
}

fn default_gateway_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_composer_url() -> String {
    DEFAULT_COMPOSER_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_gitignore_entries() -> Vec<String> {
    vec!["/modules".to_string()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            tool: default_tool(),
            migrate_command: default_migrate_command(),
            build_command: default_build_command(),
        }
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            binary: default_composer_binary(),
            core_packages: default_core_packages(),
            want_version: default_want_version(),
            repository_name: default_repository_name(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            composer_url: default_composer_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for GitignoreConfig {
    fn default() -> Self {
        Self {
            entries: default_gitignore_entries(),
        }
    }
}

impl InstallerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SetupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SetupError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COMPOSER_BIN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SetupError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_path(&self) -> &Path {
        &self.app.base_path
    }

    pub fn want_version(&self) -> &str {
        &self.composer.want_version
    }
}

impl Validate for InstallerConfig {
    fn validate(&self) -> Result<()> {
        let base_path = self.app.base_path.to_string_lossy();
        validation::validate_path("app.base_path", &base_path)?;
        validation::validate_non_empty_string("app.tool", &self.app.tool)?;
        validation::validate_non_empty_string("composer.binary", &self.composer.binary)?;
        validation::validate_non_empty_string("composer.want_version", &self.composer.want_version)?;
        validation::validate_non_empty_string(
            "composer.repository_name",
            &self.composer.repository_name,
        )?;

        if self.composer.core_packages.is_empty() {
            return Err(SetupError::MissingConfigError {
                field: "composer.core_packages".to_string(),
            });
        }
        for package in &self.composer.core_packages {
            validation::validate_package_name("composer.core_packages", package)?;
        }

        validation::validate_url("gateway.url", &self.gateway.url)?;
        validation::validate_url("gateway.composer_url", &self.gateway.composer_url)?;
        validation::validate_range("gateway.timeout_seconds", self.gateway.timeout_seconds, 1, 600)?;

        for entry in &self.gitignore.entries {
            validation::validate_non_empty_string("gitignore.entries", entry)?;
        }

        Ok(())
    }
}
