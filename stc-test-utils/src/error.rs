use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error(transparent)]
    StcError(#[from] stc::server::error::Error),
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}
