/// Configuration errors. Raised at load time only, never mid-run.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {message}")]
    ReadError { path: String, message: String },

    /// The config file is not valid TOML.
    #[error("failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    /// A field failed validation.
    #[error("invalid config field {field}: {message}")]
    ValidationFailed { field: String, message: String },

    /// An environment override could not be parsed.
    #[error("invalid environment override {var}={value}")]
    InvalidEnvOverride { var: String, value: String },
}
