//! # FIFO Transport
//!
//! Reads a named FIFO (or any readable file) opened with `O_NONBLOCK`.
//!
//! - `read(2)` returning 0 after data has arrived means every writer has
//!   gone: [`ReadOutcome::Closed`]
//! - `read(2)` returning 0 right after `poll(2)` reported the file ready
//!   means the writer hung up (or the file is empty): [`ReadOutcome::Closed`]
//! - `read(2)` returning 0 otherwise, before any data, means no writer has
//!   connected yet: [`ReadOutcome::Pending`]
//! - `EAGAIN` means no data yet: [`ReadOutcome::Pending`]
//! - Readiness waits use `poll(2)` with no timeout

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::fd::AsFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::debug;

use super::transport::{PipeTransport, ReadOutcome};

/// Non-blocking reader over a FIFO file.
pub struct FifoTransport {
    file: File,
    path: PathBuf,
    /// Some data has been read since open
    received: bool,
    /// The last readiness wait returned and nothing has been read since
    ready: bool,
}

impl std::fmt::Debug for FifoTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FifoTransport")
            .field("path", &self.path)
            .field("received", &self.received)
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

impl FifoTransport {
    /// Open `path` read-only without blocking for a writer.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;

        debug!("Opened FIFO {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
            received: false,
            ready: false,
        })
    }
}

impl PipeTransport for FifoTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome> {
        let ready = std::mem::take(&mut self.ready);
        match self.file.read(buf) {
            Ok(0) if self.received || ready => Ok(ReadOutcome::Closed),
            Ok(0) => Ok(ReadOutcome::Pending),
            Ok(n) => {
                self.received = true;
                Ok(ReadOutcome::Data(n))
            }
            Err(e) => match e.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(ReadOutcome::Pending),
                io::ErrorKind::BrokenPipe => Ok(ReadOutcome::Closed),
                _ => Err(e),
            },
        }
    }

    fn supports_wait(&self) -> bool {
        true
    }

    fn wait_readable(&mut self) -> io::Result<()> {
        loop {
            let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => {
                    self.ready = true;
                    return Ok(());
                }
                Err(Errno::EINTR) => continue,
                Err(errno) => return Err(io::Error::from(errno)),
            }
        }
    }
}
