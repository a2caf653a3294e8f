use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Unsupported input file '{path}': {reason}")]
    UnsupportedInput { path: String, reason: String },

    #[error("Unknown platform: {value}")]
    UnknownPlatform { value: String },

    #[error("Identifier '{id}' contains the result log separator \", \"")]
    UnloggableIdentifier { id: String },

    #[error("Unexpected response from {url}: {reason}")]
    UnexpectedResponse { url: String, reason: String },

    #[error("Malformed result log line {line} in {path}: {content}")]
    MalformedLogLine {
        path: String,
        line: usize,
        content: String,
    },
}

impl VerifyError {
    /// Short message shown to the operator on stderr.
    pub fn user_friendly_message(&self) -> String {
        match self {
            VerifyError::InputNotFound { .. } => "File does not exist.".to_string(),
            VerifyError::UnsupportedInput { .. } => {
                "Invalid file format. Please provide an Excel (.xlsx) or CSV (.csv) file."
                    .to_string()
            }
            VerifyError::UnknownPlatform { .. } => "Invalid platform. Please choose one of: \
                 GeeksForGeeks, Codeforces, LeetCode, CodeChef, HackerRank, All, Combine"
                .to_string(),
            VerifyError::ConfigError { .. } | VerifyError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            VerifyError::InputNotFound { .. } => "Check the roster path and try again",
            VerifyError::UnsupportedInput { .. } => "Export the roster as .xlsx or .csv",
            VerifyError::UnknownPlatform { .. } => {
                "Pass a platform name, 'all' to probe every platform, or 'combine' to merge logs"
            }
            VerifyError::ConfigError { .. } | VerifyError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags"
            }
            VerifyError::UnloggableIdentifier { .. } => {
                "Remove the comma-space sequence from the participant identifier"
            }
            VerifyError::MalformedLogLine { .. } => {
                "Remove the damaged line or rerun the platform pass without --resume"
            }
            VerifyError::SpreadsheetError(_) | VerifyError::CsvError(_) => {
                "Make sure the roster has one header row and the expected columns"
            }
            VerifyError::IoError(_) => "Check file permissions and free disk space",
            VerifyError::HttpError(_)
            | VerifyError::SerializationError(_)
            | VerifyError::UnexpectedResponse { .. } => {
                "Check network connectivity and rerun"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
