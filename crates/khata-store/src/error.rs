//! Error types for khata-store

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Corrupt ledger document: {message}")]
    CorruptDocument { message: String },

    #[error("Failed to encode ledger document: {message}")]
    EncodeError { message: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
