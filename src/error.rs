// src/error.rs
//
// Error types for rubblescan

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// config.toml could not be parsed
    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// ffmpeg could not be started or fed
    #[error("Video encoder error: {0}")]
    Encoder(String),

    /// Timeline could not be serialized
    #[error("Timeline export error: {0}")]
    Timeline(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
