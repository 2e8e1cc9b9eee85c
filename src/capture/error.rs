use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors")]
    Enumerate(#[source] xcap::XCapError),

    #[error("Failed to capture monitor {monitor}")]
    Capture {
        monitor: String,
        #[source]
        source: xcap::XCapError,
    },

    #[error("No screenshots captured")]
    NoMonitors,

    #[error("Resized image would be empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Failed to encode PNG")]
    Encode(#[from] image::ImageError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaptureError {
    pub fn enumerate(err: xcap::XCapError) -> Self {
        Self::Enumerate(err)
    }

    pub fn capture(monitor: &str, err: xcap::XCapError) -> Self {
        Self::Capture {
            monitor: monitor.to_string(),
            source: err,
        }
    }
}
