//! # Pipe Discovery
//!
//! Finds the channels to build devices from.
//!
//! - **Unix:** every non-directory entry in the pipes directory that can be
//!   opened for non-blocking read becomes a device named after the file.
//! - **Windows:** exactly [`NAMED_PIPE_COUNT`] named pipes are created,
//!   `\\.\pipe\slippibot1` through `slippibot4`, whether or not a client is
//!   connected.

use std::path::Path;

use tracing::{debug, info};

use super::device::PipeDevice;
use crate::error::Result;

/// Number of named pipes created on Windows.
pub const NAMED_PIPE_COUNT: usize = 4;

/// Device name prefix for named pipes.
pub const NAMED_PIPE_PREFIX: &str = "slippibot";

/// Device name for the 0-based named pipe `index` (`slippibot1`...).
#[must_use]
pub fn named_pipe_name(index: usize) -> String {
    format!("{}{}", NAMED_PIPE_PREFIX, index + 1)
}

/// Full OS path for the 0-based named pipe `index`.
#[must_use]
pub fn named_pipe_path(index: usize) -> String {
    format!(r"\\.\pipe\{}", named_pipe_name(index))
}

/// Discover devices for this platform.
///
/// # Arguments
///
/// * `directory` - Pipes directory scanned on Unix; unused on Windows
///
/// # Returns
///
/// * `Result<Vec<PipeDevice>>` - Zero or more devices
///
/// # Errors
///
/// Returns error only if an existing directory cannot be listed. Individual
/// channels that fail to open are skipped.
pub fn discover<P: AsRef<Path>>(directory: P) -> Result<Vec<PipeDevice>> {
    #[cfg(unix)]
    {
        scan_directory(directory.as_ref())
    }

    #[cfg(windows)]
    {
        let _ = directory;
        Ok(create_named_pipes())
    }
}

/// Scan `directory` non-recursively and open every non-directory entry.
///
/// A missing directory yields no devices. Entries are visited in path order
/// so device order is stable across runs.
#[cfg(unix)]
pub fn scan_directory(directory: &Path) -> Result<Vec<PipeDevice>> {
    use super::fifo::FifoTransport;
    use crate::error::PipeError;

    if !directory.is_dir() {
        debug!("Pipes directory {} not found", directory.display());
        return Ok(Vec::new());
    }

    let mut entries: Vec<_> = std::fs::read_dir(directory)
        .map_err(|e| {
            PipeError::Discovery(format!("Failed to read {}: {}", directory.display(), e))
        })?
        .filter_map(std::result::Result::ok)
        .collect();
    entries.sort_by_key(|entry| entry.path());

    let mut devices = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        match FifoTransport::open(&path) {
            Ok(transport) => {
                let name = entry.file_name().to_string_lossy().into_owned();
                info!("Found pipe {} at {}", name, path.display());
                devices.push(PipeDevice::new(Box::new(transport), name));
            }
            Err(e) => {
                debug!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    Ok(devices)
}

/// Create the fixed set of named pipes.
///
/// A pipe that cannot be created is logged and skipped; the rest are still
/// returned.
#[cfg(windows)]
pub fn create_named_pipes() -> Vec<PipeDevice> {
    use super::named_pipe::NamedPipeTransport;
    use tracing::warn;

    let mut devices = Vec::with_capacity(NAMED_PIPE_COUNT);
    for index in 0..NAMED_PIPE_COUNT {
        let path = named_pipe_path(index);
        match NamedPipeTransport::create(&path) {
            Ok(transport) => {
                info!("Created named pipe {}", path);
                devices.push(PipeDevice::new(Box::new(transport), named_pipe_name(index)));
            }
            Err(e) => warn!("Failed to create {}: {}", path, e),
        }
    }
    devices
}
