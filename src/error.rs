//! Error types for slitwave.
//!
//! The simulation core itself is infallible. These errors cover the edges
//! that touch the filesystem: loading/saving configuration files and
//! exporting rendered frames.

use std::fmt;

/// Errors that can occur while loading or saving a [`Config`](crate::Config).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    Io(std::io::Error),
    /// The file contents are not a valid config.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur when exporting a rendered frame.
#[derive(Debug)]
pub enum ExportError {
    /// Failed to encode or write the image.
    Image(image::ImageError),
    /// Failed to create the output file or directory.
    Io(std::io::Error),
    /// Pixel buffer does not match the frame dimensions.
    Size { width: u32, height: u32, len: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Image(e) => write!(f, "Failed to encode image: {}", e),
            ExportError::Io(e) => write!(f, "Failed to write image file: {}", e),
            ExportError::Size { width, height, len } => write!(
                f,
                "Frame buffer of {} bytes does not match {}x{} RGBA",
                len, width, height
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Image(e) => Some(e),
            ExportError::Io(e) => Some(e),
            ExportError::Size { .. } => None,
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}
