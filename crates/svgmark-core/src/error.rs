pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the fallible edges of the crate. Label conversion itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid config JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("config must be a JSON object")]
    ConfigNotObject,
}
