//! # Pipes Module
//!
//! Virtual GameCube controllers driven by text commands over pipes.
//!
//! This module handles:
//! - Discovering FIFOs (Unix) or creating named pipes (Windows)
//! - Non-blocking, newline-framed reads with an optional blocking wait
//! - Parsing `PRESS` / `RELEASE` / `SET` / `FLUSH` commands
//! - Encoding sticks and triggers into the 8-byte pad report
//! - Exposing buttons and half-axes as named logical inputs

pub mod device;
pub mod discovery;
pub mod encoder;
pub mod inputs;
pub mod protocol;
pub mod report;
pub mod transport;

#[cfg(unix)]
pub mod fifo;
#[cfg(windows)]
pub mod named_pipe;

pub use device::PipeDevice;
pub use report::{Button, PadReport};
