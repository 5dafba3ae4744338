//! # Named Pipe Transport
//!
//! Windows named pipes have no filesystem presence, so the pipes are created
//! by this process rather than discovered. Each pipe is inbound-only, byte
//! mode, `PIPE_NOWAIT`, single instance.
//!
//! A writer that disconnects does not end the device: the pipe is
//! disconnected and put back into the listening state, and the next writer
//! picks up where the last one left off.

use std::ffi::CString;
use std::io;
use std::ptr;

use tracing::{debug, info};
use windows_sys::Win32::Foundation::{
    CloseHandle, GetLastError, ERROR_BROKEN_PIPE, ERROR_NO_DATA, ERROR_PIPE_LISTENING,
    HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{ReadFile, PIPE_ACCESS_INBOUND};
use windows_sys::Win32::System::Pipes::{
    ConnectNamedPipe, CreateNamedPipeA, DisconnectNamedPipe, PeekNamedPipe, PIPE_NOWAIT,
    PIPE_TYPE_BYTE,
};

use super::transport::{PipeTransport, ReadOutcome};

/// In/out buffer size requested for each pipe.
const PIPE_BUFFER_SIZE: u32 = 256;

/// Server end of one inbound named pipe.
pub struct NamedPipeTransport {
    handle: HANDLE,
    path: String,
}

// The handle is owned exclusively and only used from the polling thread.
unsafe impl Send for NamedPipeTransport {}

impl std::fmt::Debug for NamedPipeTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedPipeTransport")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl NamedPipeTransport {
    /// Create the pipe `path` (e.g. `\\.\pipe\slippibot1`) and start listening
    /// without waiting for a client.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the pipe cannot be created.
    pub fn create(path: &str) -> io::Result<Self> {
        let c_path = CString::new(path)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
        let handle = unsafe {
            CreateNamedPipeA(
                c_path.as_ptr() as *const u8,
                PIPE_ACCESS_INBOUND,
                PIPE_TYPE_BYTE | PIPE_NOWAIT,
                1,
                PIPE_BUFFER_SIZE,
                PIPE_BUFFER_SIZE,
                0,
                ptr::null(),
            )
        };
        if handle == INVALID_HANDLE_VALUE {
            return Err(io::Error::last_os_error());
        }

        let transport = Self {
            handle,
            path: path.to_string(),
        };
        transport.listen();
        debug!("Created named pipe {}", path);
        Ok(transport)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Non-blocking connect; in `PIPE_NOWAIT` mode this returns immediately
    /// whether or not a client is present.
    fn listen(&self) {
        // SAFETY: handle is a valid pipe handle owned by self.
        unsafe {
            ConnectNamedPipe(self.handle, ptr::null_mut());
        }
    }

    fn relisten(&self) {
        info!("{}: client disconnected, listening again", self.path);
        // SAFETY: handle is a valid pipe handle owned by self.
        unsafe {
            DisconnectNamedPipe(self.handle);
        }
        self.listen();
    }
}

impl PipeTransport for NamedPipeTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome> {
        let mut available: u32 = 0;
        // SAFETY: only the available-bytes out pointer is provided, and it is valid.
        let peeked = unsafe {
            PeekNamedPipe(
                self.handle,
                ptr::null_mut(),
                0,
                ptr::null_mut(),
                &mut available,
                ptr::null_mut(),
            )
        } != 0;

        if !peeked {
            // SAFETY: reads thread-local error state.
            let error = unsafe { GetLastError() };
            if error == ERROR_BROKEN_PIPE {
                self.relisten();
            }
            // No client yet (ERROR_PIPE_LISTENING / ERROR_BAD_PIPE) reads as no data.
            return Ok(ReadOutcome::Pending);
        }

        if available == 0 {
            return Ok(ReadOutcome::Pending);
        }

        let to_read = available.min(buf.len() as u32);
        let mut read: u32 = 0;
        // SAFETY: buf is valid for to_read bytes, and read is a valid out pointer.
        let ok = unsafe {
            ReadFile(
                self.handle,
                buf.as_mut_ptr(),
                to_read,
                &mut read,
                ptr::null_mut(),
            )
        } != 0;

        if !ok {
            // SAFETY: reads thread-local error state.
            let error = unsafe { GetLastError() };
            return match error {
                ERROR_BROKEN_PIPE => {
                    self.relisten();
                    Ok(ReadOutcome::Pending)
                }
                ERROR_NO_DATA | ERROR_PIPE_LISTENING => Ok(ReadOutcome::Pending),
                _ => Err(io::Error::from_raw_os_error(error as i32)),
            };
        }

        if read == 0 {
            Ok(ReadOutcome::Pending)
        } else {
            Ok(ReadOutcome::Data(read as usize))
        }
    }

    /// `PIPE_NOWAIT` pipes have no readiness primitive; blocking mode falls
    /// back to repeated non-blocking reads.
    fn supports_wait(&self) -> bool {
        false
    }

    fn wait_readable(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for NamedPipeTransport {
    fn drop(&mut self) {
        // SAFETY: handle was returned by CreateNamedPipeA and is closed exactly once.
        unsafe {
            CloseHandle(self.handle);
        }
    }
}
