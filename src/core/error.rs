//! Error types for the stock analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No data: {0}")]
    NoData(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Generic notice shown to the user whatever the underlying reason was.
    ///
    /// The detailed reason stays in `Display` for logs.
    pub fn user_message(&self) -> &'static str {
        "无法获取数据"
    }
}
