use std::io;
use thiserror::Error;

/// The primary error type for the `ut61e-lib` library.
#[derive(Error, Debug)]
pub enum DmmError {
    #[error("Serial port not found. Is the UT61E cable connected?")]
    PortNotFound,

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid frame: got {len} bytes, expected 14 ending in CR LF")]
    InvalidFrame { len: usize },
}
