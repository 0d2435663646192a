use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid input for flow '{flow}': {details}")]
    InvalidInput { flow: String, details: String },

    #[error("Model output for flow '{flow}' failed validation: {details}")]
    InvalidModelOutput { flow: String, details: String },

    #[error("Model call failed: {0}")]
    ModelCallFailed(String),

    #[error("Invalid fiscal year end month {0}: must be between 1 and 12")]
    InvalidFiscalYearEndMonth(u32),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount overflow while summing {0}")]
    AmountOverflow(&'static str),

    #[error("CSV is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
