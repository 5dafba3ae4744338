//! # Pipe Controller Library
//!
//! Virtual GameCube controllers driven by a line-based text protocol.
//!
//! An external process (a bot, a script, a test harness) writes commands such
//! as `PRESS A`, `SET MAIN 0.5 1.0` and `FLUSH` into a FIFO (Unix) or a named
//! pipe (Windows). This library turns them into the 8-byte controller report
//! the emulated console reads each frame.

pub mod config;
pub mod error;
pub mod interface;
pub mod pipes;
pub mod recorder;
