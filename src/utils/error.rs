use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Machine-distinguishable error kind, stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidInput,
    InvariantViolation,
    NotFound,
    Config,
    Storage,
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationError { .. } => ErrorKind::Validation,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ConfigError { .. } => ErrorKind::Config,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorKind::Storage
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => format!("Input rejected: {}", message),
            Self::InvalidInput { field, reason } => format!("Bad score for {}: {}", field, reason),
            Self::InvariantViolation { message } => format!("Round rejected: {}", message),
            Self::NotFound { kind, id } => format!("No {} with id {}", kind, id),
            Self::ConfigError { field, message } => {
                format!("Configuration problem ({}): {}", field, message)
            }
            Self::IoError(e) => format!("Could not access the ledger file: {}", e),
            Self::SerializationError(e) => format!("Ledger file is unreadable: {}", e),
            Self::CsvError(e) => format!("Could not write CSV output: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Validation => "Provide at least one non-blank player name",
            ErrorKind::InvalidInput => {
                "Give every registered player a whole number of zero or more"
            }
            ErrorKind::InvariantViolation => "Exactly one player must score 0 in each round",
            ErrorKind::NotFound => "Check the id against `players` or `history` output",
            ErrorKind::Config => "Fix the configuration file or command-line flags",
            ErrorKind::Storage => "Check the data file path and its permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
