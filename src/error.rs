use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommishError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported carrier '{0}'. Available carriers: {1}")]
    UnsupportedCarrier(String, String),

    #[error("Could not detect carrier for {0}. Pass --carrier explicitly.")]
    DetectionFailed(String),

    #[error("Unreadable report file: {0}")]
    BadFile(String),

    #[error("Report file is empty: {0}")]
    EmptyFile(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, CommishError>;
