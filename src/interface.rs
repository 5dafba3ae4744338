//! # Controller Interface
//!
//! Registry that owns every pipe device and polls them once per frame.
//!
//! The emulation side raises the shared [`FrameInputFlag`] when a frame
//! needs fresh input. [`ControllerInterface::update_input`] passes
//! `blocking && flag` to every device, and clears the flag only after the
//! last device has been polled.
//!
//! ## Usage
//!
//! ```no_run
//! use pipe_controller::config::Config;
//! use pipe_controller::interface::ControllerInterface;
//!
//! let config = Config::default();
//! let mut interface = ControllerInterface::new(config.pipes.blocking);
//! interface.populate(&config.pipes)?;
//!
//! interface.request_input();
//! interface.update_input();
//! for (name, report) in interface.pad_reports() {
//!     println!("{}: {}", name, report);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PipesConfig;
use crate::error::Result;
use crate::pipes::discovery::discover;
use crate::pipes::{PadReport, PipeDevice};

/// Process-wide "this frame needs input" signal.
///
/// Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct FrameInputFlag(Arc<AtomicBool>);

impl FrameInputFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Owner of all pipe devices.
///
/// Devices are polled sequentially from the calling thread.
#[derive(Debug)]
pub struct ControllerInterface {
    devices: Vec<PipeDevice>,
    blocking: bool,
    need_input: FrameInputFlag,
}

impl ControllerInterface {
    /// Create an empty registry.
    ///
    /// # Arguments
    ///
    /// * `blocking` - Whether devices may block waiting for `FLUSH` when a frame needs input
    pub fn new(blocking: bool) -> Self {
        Self {
            devices: Vec::new(),
            blocking,
            need_input: FrameInputFlag::new(),
        }
    }

    /// Discover pipes and register one device per channel.
    ///
    /// # Returns
    ///
    /// * `Result<usize>` - Number of devices added
    pub fn populate(&mut self, config: &PipesConfig) -> Result<usize> {
        let found = discover(&config.directory)?;
        let count = found.len();
        info!("Discovered {} pipe device(s)", count);
        for device in found {
            self.add_device(device);
        }
        Ok(count)
    }

    /// Register a device and log the inputs it exposes.
    pub fn add_device(&mut self, device: PipeDevice) {
        debug!(
            "Registered device {} ({} inputs)",
            device.name(),
            device.inputs().len()
        );
        for (negative, positive) in device.inputs().analog_pairs() {
            debug!("{}: analog input {} / {}", device.name(), negative, positive);
        }
        self.devices.push(device);
    }

    pub fn devices(&self) -> &[PipeDevice] {
        &self.devices
    }

    pub fn device(&self, name: &str) -> Option<&PipeDevice> {
        self.devices.iter().find(|device| device.name() == name)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Handle to the frame flag for the emulation side.
    pub fn frame_flag(&self) -> FrameInputFlag {
        self.need_input.clone()
    }

    /// Mark the current frame as needing input.
    pub fn request_input(&self) {
        self.need_input.set();
    }

    /// Poll every device once, then clear the frame flag.
    pub fn update_input(&mut self) {
        let wait_for_inputs = self.blocking && self.need_input.is_set();
        for device in &mut self.devices {
            device.update(wait_for_inputs);
        }
        self.need_input.clear();
    }

    /// Current report of every device, in registration order.
    pub fn pad_reports(&self) -> Vec<(&str, PadReport)> {
        self.devices
            .iter()
            .map(|device| (device.name(), device.pad_report()))
            .collect()
    }

    /// Number of devices whose channel has ended.
    pub fn closed_count(&self) -> usize {
        self.devices.iter().filter(|device| device.is_closed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipes::transport::mocks::{ScriptedTransport, Step};
    use crate::pipes::Button;

    fn add_scripted(interface: &mut ControllerInterface, name: &str) -> ScriptedTransport {
        let transport = ScriptedTransport::new();
        interface.add_device(PipeDevice::new(Box::new(transport.clone()), name));
        transport
    }

    #[test]
    fn test_frame_flag_is_shared() {
        let interface = ControllerInterface::new(false);
        let flag = interface.frame_flag();
        assert!(!flag.is_set());
        interface.request_input();
        assert!(flag.is_set());
        flag.clear();
        assert!(!interface.need_input.is_set());
    }

    #[test]
    fn test_update_clears_flag_after_polling() {
        let mut interface = ControllerInterface::new(false);
        let transport = add_scripted(&mut interface, "pipe1");
        transport.push_bytes(b"PRESS A\n");

        interface.request_input();
        interface.update_input();

        assert!(!interface.frame_flag().is_set());
        assert!(interface.device("pipe1").unwrap().pad_report().is_pressed(Button::A));
    }

    #[test]
    fn test_blocking_waits_only_when_input_needed() {
        let mut interface = ControllerInterface::new(true);
        let transport = add_scripted(&mut interface, "pipe1");

        transport.push_bytes(b"PRESS B\n");
        interface.update_input();
        assert_eq!(transport.wait_count(), 0, "no wait without a pending frame");

        transport.push_bytes(b"FLUSH\n");
        interface.request_input();
        interface.update_input();
        assert_eq!(transport.wait_count(), 1);
    }

    #[test]
    fn test_non_blocking_never_waits() {
        let mut interface = ControllerInterface::new(false);
        let transport = add_scripted(&mut interface, "pipe1");
        transport.push_bytes(b"PRESS B\n");
        interface.request_input();
        interface.update_input();
        assert_eq!(transport.wait_count(), 0);
    }

    #[test]
    fn test_closed_device_does_not_affect_others() {
        let mut interface = ControllerInterface::new(false);
        let first = add_scripted(&mut interface, "pipe1");
        let second = add_scripted(&mut interface, "pipe2");

        first.push(Step::Closed);
        second.push_bytes(b"PRESS X\n");
        interface.update_input();

        second.push_bytes(b"PRESS Y\n");
        interface.update_input();

        assert_eq!(interface.closed_count(), 1);
        assert_eq!(interface.len(), 2, "closed devices stay registered");
        let reports = interface.pad_reports();
        assert_eq!(reports[0], ("pipe1", PadReport::new()));
        assert!(reports[1].1.is_pressed(Button::X));
        assert!(reports[1].1.is_pressed(Button::Y));
    }

    #[test]
    fn test_populate_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut interface = ControllerInterface::new(false);
        let config = PipesConfig {
            directory: dir.path().join("missing").to_string_lossy().into_owned(),
            blocking: false,
        };

        #[cfg(unix)]
        {
            assert_eq!(interface.populate(&config).unwrap(), 0);
            assert!(interface.is_empty());
        }
        #[cfg(windows)]
        {
            let _ = interface.populate(&config);
        }
    }
}
