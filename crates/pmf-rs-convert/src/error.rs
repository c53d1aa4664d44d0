//! Conversion errors.

use std::path::PathBuf;

use pmf_rs_bedrock::WriteError;
use pmf_rs_blockstate::BlockStateError;
use pmf_rs_format::PmfError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Format(#[from] PmfError),

    #[error(transparent)]
    BlockState(#[from] BlockStateError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}
