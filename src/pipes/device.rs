//! # Pipe Device
//!
//! One virtual controller fed by one channel.
//!
//! Each [`PipeDevice::update`] drains the channel, frames complete lines on
//! `\n`, and applies every command to the logical inputs and the pad report.
//! Bytes after the last newline stay buffered until a later poll completes
//! the line.

use bytes::{Buf, BytesMut};
use tracing::{debug, info, warn};

use super::encoder::{encode_stick, encode_trigger, half_axes, clamp_axis_value};
use super::inputs::{InputTable, LogicalInput};
use super::protocol::{parse_line, Command};
use super::report::{
    Button, PadReport, C_X_BYTE, C_Y_BYTE, L_TRIGGER_BYTE, MAIN_X_BYTE, MAIN_Y_BYTE,
    R_TRIGGER_BYTE,
};
use super::transport::{PipeTransport, ReadOutcome};

/// Scratch buffer size for a single read.
pub const READ_CHUNK_SIZE: usize = 32;

/// Result of draining the channel once.
enum Drain {
    /// The channel has no more bytes for now; carries the bytes read.
    Idle(usize),
    /// The channel ended during this drain.
    Closed,
}

/// Virtual controller backed by a pipe.
pub struct PipeDevice {
    transport: Box<dyn PipeTransport>,
    name: String,
    buffer: BytesMut,
    inputs: InputTable,
    report: PadReport,
    closed: bool,
}

impl std::fmt::Debug for PipeDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeDevice")
            .field("name", &self.name)
            .field("pending_bytes", &self.buffer.len())
            .field("report", &self.report)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl PipeDevice {
    /// Create a device over an opened channel.
    ///
    /// # Arguments
    ///
    /// * `transport` - Channel the device reads from; owned for the device's lifetime
    /// * `name` - Display name, e.g. the FIFO's file name
    pub fn new(transport: Box<dyn PipeTransport>, name: impl Into<String>) -> Self {
        Self {
            transport,
            name: name.into(),
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE * 4),
            inputs: InputTable::new(),
            report: PadReport::new(),
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the channel has ended. A closed device keeps its last state.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Copy of the current pad report.
    pub fn pad_report(&self) -> PadReport {
        self.report
    }

    /// Logical inputs exposed by this device.
    pub fn inputs(&self) -> &InputTable {
        &self.inputs
    }

    /// Look up one logical input by display name.
    pub fn input(&self, name: &str) -> Option<&LogicalInput> {
        self.inputs.get(name)
    }

    /// Poll the channel once for this frame.
    ///
    /// With `wait_for_inputs` set, the call blocks (on transports that can
    /// wait) until the writer sends `FLUSH` or the channel ends. Otherwise it
    /// returns as soon as the channel has no more bytes.
    ///
    /// # Arguments
    ///
    /// * `wait_for_inputs` - Blocking mode is on and the current frame needs input
    pub fn update(&mut self, wait_for_inputs: bool) {
        if self.closed {
            return;
        }

        loop {
            let waited = wait_for_inputs && self.transport.supports_wait();
            if waited {
                if let Err(e) = self.transport.wait_readable() {
                    warn!("{}: readiness wait failed: {}", self.name, e);
                    return;
                }
            }

            let drain = self.drain();
            let finished = self.process_lines();

            match drain {
                Drain::Closed => {
                    info!("{}: channel closed", self.name);
                    self.closed = true;
                    return;
                }
                // A wake-up with nothing to read would otherwise re-wait at once.
                Drain::Idle(0) if waited => {
                    debug!("{}: woke with no data", self.name);
                    return;
                }
                Drain::Idle(_) => {}
            }

            if finished || !wait_for_inputs {
                return;
            }
        }
    }

    /// Read until the channel has nothing more for now.
    fn drain(&mut self) -> Drain {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut total = 0;
        loop {
            match self.transport.read(&mut chunk) {
                Ok(ReadOutcome::Data(n)) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    total += n;
                }
                Ok(ReadOutcome::Pending) => return Drain::Idle(total),
                Ok(ReadOutcome::Closed) => return Drain::Closed,
                Err(e) => {
                    warn!("{}: read failed: {}", self.name, e);
                    return Drain::Idle(total);
                }
            }
        }
    }

    /// Parse and apply every complete line in the buffer.
    ///
    /// Returns `true` if any line was `FLUSH`.
    fn process_lines(&mut self) -> bool {
        let mut finished = false;
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(newline);
            self.buffer.advance(1);
            finished |= self.parse_command(&String::from_utf8_lossy(&line));
        }
        finished
    }

    /// Apply one protocol line.
    ///
    /// Returns `true` only for `FLUSH`. Malformed or unknown lines are
    /// ignored and return `false`.
    pub fn parse_command(&mut self, line: &str) -> bool {
        let Some(command) = parse_line(line) else {
            debug!("{}: ignoring line {:?}", self.name, line);
            return false;
        };

        match command {
            Command::Flush => return true,
            Command::Press(button) => self.set_button(button, true),
            Command::Release(button) => self.set_button(button, false),
            Command::SetAxis { name, value } => self.set_axis(&name, value),
            Command::SetStick { name, x, y } => {
                self.set_axis(&format!("{} X", name), x);
                self.set_axis(&format!("{} Y", name), y);
            }
        }
        false
    }

    /// Press or release a button in both the report and the inputs.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.report.set_button(button, pressed);
        self.inputs.set_button(button, pressed);
    }

    /// Move one absolute axis (`"MAIN X"`, `"C Y"`, `"L"`, ...).
    ///
    /// `value` is clamped to `[0, 1]`. Names without a report byte or
    /// half-axis pair are ignored.
    pub fn set_axis(&mut self, axis: &str, value: f64) {
        let value = clamp_axis_value(value);

        match axis {
            "MAIN X" => self.report.set_analog(MAIN_X_BYTE, encode_stick(value)),
            "MAIN Y" => self.report.set_analog(MAIN_Y_BYTE, encode_stick(value)),
            "C X" => self.report.set_analog(C_X_BYTE, encode_stick(value)),
            "C Y" => self.report.set_analog(C_Y_BYTE, encode_stick(value)),
            "L" => self.report.set_analog(L_TRIGGER_BYTE, encode_trigger(value)),
            "R" => self.report.set_analog(R_TRIGGER_BYTE, encode_trigger(value)),
            _ => {}
        }

        let (hi, lo) = half_axes(value);
        self.inputs.set_half_axes(axis, hi, lo);
    }
}
