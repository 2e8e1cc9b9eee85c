pub mod capture;
pub mod compose;
pub mod error;
pub mod monitor;

pub use capture::*;
pub use error::CaptureError;
pub use monitor::*;

#[cfg(test)]
pub mod testing;
