//! Trait abstraction over the OS channel backing a pipe device

use std::io;

/// Outcome of one non-blocking read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n` bytes were copied into the buffer (`n > 0`).
    Data(usize),
    /// Nothing available right now; the channel is still usable.
    Pending,
    /// The peer is gone and the channel will not produce data again.
    Closed,
}

/// Readable byte channel used by [`PipeDevice`](super::device::PipeDevice).
///
/// Implementations never block in [`read`](PipeTransport::read). Transports
/// that can recover from a lost peer do so internally and report
/// [`ReadOutcome::Pending`].
#[cfg_attr(test, mockall::automock)]
pub trait PipeTransport: Send {
    /// Attempt one non-blocking read into `buf`.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome>;

    /// Whether [`wait_readable`](PipeTransport::wait_readable) actually waits.
    fn supports_wait(&self) -> bool;

    /// Block until the channel is readable or hung up. No timeout.
    fn wait_readable(&mut self) -> io::Result<()>;
}
