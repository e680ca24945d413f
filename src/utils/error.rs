use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Gateway request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// 授權未啟用或已過期，訊息已經過在地化
    #[error("{message}")]
    Activation { message: String },

    #[error("Composer exited with status {}", describe_exit_code(.exit_code))]
    InstallFailed { exit_code: Option<i32> },

    #[error("Failed to run '{program}': {message}")]
    Process { program: String, message: String },

    #[error("Gateway responded with {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    FileSystem,
    License,
    Installation,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SetupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SetupError::ApiError(_) | SetupError::Gateway { .. } => ErrorCategory::Network,
            SetupError::IoError(_) | SetupError::SerializationError(_) => {
                ErrorCategory::FileSystem
            }
            SetupError::Activation { .. } => ErrorCategory::License,
            SetupError::InstallFailed { .. } | SetupError::Process { .. } => {
                ErrorCategory::Installation
            }
            SetupError::ConfigError { .. }
            | SetupError::InvalidConfigValueError { .. }
            | SetupError::MissingConfigError { .. }
            | SetupError::ValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SetupError::ApiError(_) | SetupError::Gateway { .. } => ErrorSeverity::Medium,
            SetupError::Activation { .. } | SetupError::ValidationError { .. } => {
                ErrorSeverity::High
            }
            SetupError::InstallFailed { .. } | SetupError::Process { .. } => ErrorSeverity::High,
            SetupError::IoError(_) | SetupError::SerializationError(_) => ErrorSeverity::Critical,
            SetupError::ConfigError { .. }
            | SetupError::InvalidConfigValueError { .. }
            | SetupError::MissingConfigError { .. } => ErrorSeverity::High,
        }
    }

    /// 對應的行程結束代碼；安裝失敗固定為 1
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::InstallFailed { .. } => 1,
            _ => match self.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SetupError::ApiError(_) | SetupError::Gateway { .. } => {
                "Check your network connection and the gateway URL, then try again".to_string()
            }
            SetupError::IoError(_) | SetupError::SerializationError(_) => {
                "Make sure the application directory exists and is writable".to_string()
            }
            SetupError::Activation { .. } => {
                "Renew the license or use a different license key".to_string()
            }
            SetupError::InstallFailed { .. } => {
                "Run the composer command manually to see the full error".to_string()
            }
            SetupError::Process { program, .. } => {
                format!("Make sure '{}' is installed and on your PATH", program)
            }
            SetupError::ConfigError { .. }
            | SetupError::InvalidConfigValueError { .. }
            | SetupError::MissingConfigError { .. }
            | SetupError::ValidationError { .. } => {
                "Review the installer configuration file and command line flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SetupError::ApiError(_) => "Could not reach the update gateway".to_string(),
            SetupError::Gateway { status, message } => {
                format!("The update gateway rejected the request ({}): {}", status, message)
            }
            SetupError::Activation { message } => message.clone(),
            SetupError::InstallFailed { .. } => "Installation failed".to_string(),
            other => other.to_string(),
        }
    }
}

fn describe_exit_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub type Result<T> = std::result::Result<T, SetupError>;
