use std::io;

use thiserror::Error;

use crate::models::FormError;
use crate::store::StoreError;

/// 应用级错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid dataset file: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("failed to encode dataset: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("logger init failed: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("could not locate the {0} directory")]
    NoDir(&'static str),
}

pub type Result<T> = std::result::Result<T, AppError>;
