use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty dedupe set, conflicting sources, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Missing required column in an input table.
    #[error("{table} table: missing column '{column}'")]
    MissingColumn { table: String, column: String },
    /// Malformed CSV input.
    #[error("{table} table: {message}")]
    Csv { table: String, message: String },
}
