//! # Pad Report
//!
//! The 8-byte controller report handed to the emulation core each frame.
//!
//! ## Layout
//!
//! | Byte | Contents |
//! |------|----------|
//! | 0 | A 0x01, B 0x02, X 0x04, Y 0x08, START 0x10 |
//! | 1 | D_LEFT 0x01, D_RIGHT 0x02, D_DOWN 0x04, D_UP 0x08, Z 0x10, R 0x20, L 0x40 |
//! | 2 | MAIN stick X |
//! | 3 | MAIN stick Y |
//! | 4 | C stick X |
//! | 5 | C stick Y |
//! | 6 | L trigger |
//! | 7 | R trigger |
//!
//! Stick bytes hold the signed offset from center (see
//! [`encode_stick`](super::encoder::encode_stick)), so an all-zero report is
//! a released controller with both sticks centered.

use serde::Serialize;

/// Size of the packed report in bytes.
pub const PAD_REPORT_SIZE: usize = 8;

/// Report byte holding the MAIN stick X axis.
pub const MAIN_X_BYTE: usize = 2;
/// Report byte holding the MAIN stick Y axis.
pub const MAIN_Y_BYTE: usize = 3;
/// Report byte holding the C stick X axis.
pub const C_X_BYTE: usize = 4;
/// Report byte holding the C stick Y axis.
pub const C_Y_BYTE: usize = 5;
/// Report byte holding the L trigger.
pub const L_TRIGGER_BYTE: usize = 6;
/// Report byte holding the R trigger.
pub const R_TRIGGER_BYTE: usize = 7;

/// Digital buttons understood by `PRESS` and `RELEASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Z,
    Start,
    L,
    R,
    DUp,
    DDown,
    DLeft,
    DRight,
}

/// `(protocol token, button, report byte, bit mask)`
const BUTTON_TABLE: [(&str, Button, usize, u8); 12] = [
    ("A", Button::A, 0, 0x01),
    ("B", Button::B, 0, 0x02),
    ("X", Button::X, 0, 0x04),
    ("Y", Button::Y, 0, 0x08),
    ("Z", Button::Z, 1, 0x10),
    ("START", Button::Start, 0, 0x10),
    ("L", Button::L, 1, 0x40),
    ("R", Button::R, 1, 0x20),
    ("D_UP", Button::DUp, 1, 0x08),
    ("D_DOWN", Button::DDown, 1, 0x04),
    ("D_LEFT", Button::DLeft, 1, 0x01),
    ("D_RIGHT", Button::DRight, 1, 0x02),
];

impl Button {
    /// Every button, in protocol vocabulary order.
    pub const ALL: [Button; 12] = [
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::Z,
        Button::Start,
        Button::L,
        Button::R,
        Button::DUp,
        Button::DDown,
        Button::DLeft,
        Button::DRight,
    ];

    /// Look up a button by its protocol token (`"A"`, `"D_UP"`, ...).
    ///
    /// Matching is case-sensitive; unknown tokens return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipe_controller::pipes::report::Button;
    ///
    /// assert_eq!(Button::from_token("START"), Some(Button::Start));
    /// assert_eq!(Button::from_token("start"), None);
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        BUTTON_TABLE
            .iter()
            .find(|(name, ..)| *name == token)
            .map(|&(_, button, ..)| button)
    }

    /// Protocol token for this button.
    #[must_use]
    pub fn token(self) -> &'static str {
        self.entry().0
    }

    /// Report position of this button as `(byte index, mask)`.
    #[must_use]
    pub fn bit(self) -> (usize, u8) {
        let (_, _, index, mask) = self.entry();
        (index, mask)
    }

    fn entry(self) -> (&'static str, Button, usize, u8) {
        // Table is total over the enum; the index matches `ALL`.
        BUTTON_TABLE[self as usize]
    }
}

/// Report position `(byte index, mask)` for a protocol button token.
///
/// Absence means the token is not a button.
#[must_use]
pub fn button_bit(token: &str) -> Option<(usize, u8)> {
    Button::from_token(token).map(Button::bit)
}

/// Packed GameCube controller report.
///
/// Mutated in place by the device, copied out to consumers.
///
/// Serializes as the bare byte array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PadReport {
    bytes: [u8; PAD_REPORT_SIZE],
}

impl PadReport {
    /// Creates a released, centered report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a report from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; PAD_REPORT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Raw report bytes.
    #[must_use]
    pub fn bytes(&self) -> [u8; PAD_REPORT_SIZE] {
        self.bytes
    }

    /// Set or clear a button bit.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        let (index, mask) = button.bit();
        if pressed {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }
    }

    /// Whether a button bit is set.
    #[must_use]
    pub fn is_pressed(&self, button: Button) -> bool {
        let (index, mask) = button.bit();
        self.bytes[index] & mask != 0
    }

    /// Overwrite one analog byte.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not an analog byte (2..=7).
    pub fn set_analog(&mut self, index: usize, value: u8) {
        assert!(
            (MAIN_X_BYTE..PAD_REPORT_SIZE).contains(&index),
            "report byte {} is not an analog byte",
            index
        );
        self.bytes[index] = value;
    }

    /// MAIN stick `(x, y)` as signed offsets from center.
    #[must_use]
    pub fn main_stick(&self) -> (i8, i8) {
        (self.bytes[MAIN_X_BYTE] as i8, self.bytes[MAIN_Y_BYTE] as i8)
    }

    /// C stick `(x, y)` as signed offsets from center.
    #[must_use]
    pub fn c_stick(&self) -> (i8, i8) {
        (self.bytes[C_X_BYTE] as i8, self.bytes[C_Y_BYTE] as i8)
    }

    /// `(L, R)` trigger values.
    #[must_use]
    pub fn triggers(&self) -> (u8, u8) {
        (self.bytes[L_TRIGGER_BYTE], self.bytes[R_TRIGGER_BYTE])
    }
}

impl std::fmt::Display for PadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_table_matches_enum_order() {
        for (i, button) in Button::ALL.iter().enumerate() {
            assert_eq!(BUTTON_TABLE[i].1, *button, "table row {} out of order", i);
        }
    }

    #[test]
    fn test_button_bits() {
        assert_eq!(button_bit("A"), Some((0, 0x01)));
        assert_eq!(button_bit("B"), Some((0, 0x02)));
        assert_eq!(button_bit("X"), Some((0, 0x04)));
        assert_eq!(button_bit("Y"), Some((0, 0x08)));
        assert_eq!(button_bit("START"), Some((0, 0x10)));
        assert_eq!(button_bit("D_LEFT"), Some((1, 0x01)));
        assert_eq!(button_bit("D_RIGHT"), Some((1, 0x02)));
        assert_eq!(button_bit("D_DOWN"), Some((1, 0x04)));
        assert_eq!(button_bit("D_UP"), Some((1, 0x08)));
        assert_eq!(button_bit("Z"), Some((1, 0x10)));
        assert_eq!(button_bit("R"), Some((1, 0x20)));
        assert_eq!(button_bit("L"), Some((1, 0x40)));
        assert_eq!(button_bit("JUMP"), None);
        assert_eq!(button_bit(""), None);
    }

    #[test]
    fn test_no_two_buttons_share_a_bit() {
        for a in Button::ALL {
            for b in Button::ALL {
                if a != b {
                    assert_ne!(a.bit(), b.bit(), "{:?} and {:?} collide", a, b);
                }
            }
        }
    }

    #[test]
    fn test_token_roundtrip() {
        for button in Button::ALL {
            assert_eq!(Button::from_token(button.token()), Some(button));
        }
    }

    #[test]
    fn test_press_release_restores_report() {
        for button in Button::ALL {
            let mut report = PadReport::from_bytes([0x00, 0x80, 1, 2, 3, 4, 5, 6]);
            let before = report;
            let was_pressed = report.is_pressed(button);

            report.set_button(button, true);
            assert!(report.is_pressed(button));
            report.set_button(button, false);
            assert!(!report.is_pressed(button));

            if !was_pressed {
                assert_eq!(report, before, "press/release of {:?} changed other bits", button);
            }
        }
    }

    #[test]
    fn test_default_is_neutral() {
        let report = PadReport::new();
        assert_eq!(report.bytes(), [0u8; PAD_REPORT_SIZE]);
        assert_eq!(report.main_stick(), (0, 0));
        assert_eq!(report.c_stick(), (0, 0));
        assert_eq!(report.triggers(), (0, 0));
    }

    #[test]
    fn test_analog_accessors() {
        let mut report = PadReport::new();
        report.set_analog(MAIN_X_BYTE, 0x81);
        report.set_analog(C_Y_BYTE, 0x7F);
        report.set_analog(R_TRIGGER_BYTE, 200);
        assert_eq!(report.main_stick(), (-127, 0));
        assert_eq!(report.c_stick(), (0, 127));
        assert_eq!(report.triggers(), (0, 200));
    }

    #[test]
    #[should_panic]
    fn test_set_analog_rejects_button_byte() {
        PadReport::new().set_analog(1, 0xFF);
    }

    #[test]
    fn test_serializes_as_byte_array() {
        let report = PadReport::from_bytes([0x01, 0, 0x7F, 0x81, 0, 0, 0xFF, 0]);
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            "[1,0,127,129,0,0,255,0]"
        );
    }

    #[test]
    fn test_display_hex() {
        let report = PadReport::from_bytes([0x01, 0x40, 0x81, 0x7F, 0, 0, 0xFF, 0x10]);
        assert_eq!(report.to_string(), "01 40 81 7F 00 00 FF 10");
    }
}
