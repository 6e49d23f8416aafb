pub type FlyerResult<T> = Result<T, FlyerError>;

#[derive(thiserror::Error, Debug)]
pub enum FlyerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlyerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

impl From<serde_json::Error> for FlyerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
