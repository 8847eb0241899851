use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Request to {url} returned status {status}")]
    NetworkError { url: String, status: u16 },

    #[error("Failed to parse response body: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Parsing,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 上游服務錯誤，稍後重跑即可
    Medium,
    /// 設定或資料錯誤，需要使用者介入
    High,
    /// 本機 I/O 失敗
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::NetworkError { .. } => ErrorCategory::Network,
            EtlError::ParseError(_) => ErrorCategory::Parsing,
            EtlError::CsvError(_) | EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Parsing | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::MissingConfigError { .. } => {
                "Set DUOLINGO_BEARER_TOKEN and DUOLINGO_USER_ID in the environment or in a .env file"
            }
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Check the command line arguments with --help"
            }
            EtlError::ApiError(_) | EtlError::NetworkError { .. } => {
                "Check network connectivity and that the endpoint is reachable, then run again"
            }
            EtlError::ParseError(_) => "The upstream payload format may have changed",
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Make sure the output directory exists and is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not reach upstream service: {}", self),
            ErrorCategory::Parsing => format!("Unexpected response format: {}", self),
            ErrorCategory::Storage => format!("Could not write output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
