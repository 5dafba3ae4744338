//! # Logical Inputs
//!
//! Named inputs a pipe device exposes to the binding layer.
//!
//! Buttons are exposed as `"Button <token>"` with state 0.0 or 1.0. Every
//! absolute axis is exposed as two unidirectional half-axes, `"Axis <name> +"`
//! and `"Axis <name> -"`, each in `[0, 1]`.
//!
//! The table is a fixed, device-owned container: 12 buttons followed by six
//! half-axis pairs (L, R, MAIN X, MAIN Y, C X, C Y).

use super::encoder::{STICK_NEUTRAL, TRIGGER_NEUTRAL};
use super::report::Button;

/// Axes that get a half-axis pair, with their initial value.
pub const AXES: [(&str, f64); 6] = [
    ("L", TRIGGER_NEUTRAL),
    ("R", TRIGGER_NEUTRAL),
    ("MAIN X", STICK_NEUTRAL),
    ("MAIN Y", STICK_NEUTRAL),
    ("C X", STICK_NEUTRAL),
    ("C Y", STICK_NEUTRAL),
];

/// Number of logical inputs per device.
pub const INPUT_COUNT: usize = Button::ALL.len() + AXES.len() * 2;

/// Direction of a half-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    fn suffix(self) -> &'static str {
        match self {
            Direction::Positive => "+",
            Direction::Negative => "-",
        }
    }
}

/// What a logical input represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Button(Button),
    HalfAxis { axis: usize, direction: Direction },
}

/// One named exposed value.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalInput {
    name: String,
    kind: InputKind,
    state: f64,
}

impl LogicalInput {
    /// Display name, e.g. `"Button A"` or `"Axis MAIN X -"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Current value.
    pub fn state(&self) -> f64 {
        self.state
    }
}

/// Fixed set of logical inputs owned by one device.
#[derive(Debug, Clone)]
pub struct InputTable {
    inputs: Vec<LogicalInput>,
}

impl Default for InputTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InputTable {
    /// Creates the table with buttons released and half-axes at their
    /// axis' initial value.
    #[must_use]
    pub fn new() -> Self {
        let mut inputs = Vec::with_capacity(INPUT_COUNT);

        for button in Button::ALL {
            inputs.push(LogicalInput {
                name: format!("Button {}", button.token()),
                kind: InputKind::Button(button),
                state: 0.0,
            });
        }

        for (axis, &(name, initial)) in AXES.iter().enumerate() {
            for direction in [Direction::Positive, Direction::Negative] {
                inputs.push(LogicalInput {
                    name: format!("Axis {} {}", name, direction.suffix()),
                    kind: InputKind::HalfAxis { axis, direction },
                    state: initial,
                });
            }
        }

        Self { inputs }
    }

    /// All inputs, buttons first.
    pub fn iter(&self) -> impl Iterator<Item = &LogicalInput> {
        self.inputs.iter()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Find an input by display name.
    pub fn get(&self, name: &str) -> Option<&LogicalInput> {
        self.inputs.iter().find(|input| input.name == name)
    }

    /// State of a button input.
    pub fn button(&self, button: Button) -> f64 {
        self.inputs[button as usize].state
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.inputs[button as usize].state = if pressed { 1.0 } else { 0.0 };
    }

    /// `(hi, lo)` states of an axis' half-axis pair, if the axis has one.
    #[cfg(test)]
    fn half_axes(&self, axis_name: &str) -> Option<(f64, f64)> {
        let (hi, lo) = Self::pair_indices(axis_name)?;
        Some((self.inputs[hi].state, self.inputs[lo].state))
    }

    /// Write an axis' half-axis pair. Returns `false` if the axis has no pair.
    pub fn set_half_axes(&mut self, axis_name: &str, hi: f64, lo: f64) -> bool {
        match Self::pair_indices(axis_name) {
            Some((hi_index, lo_index)) => {
                self.inputs[hi_index].state = hi;
                self.inputs[lo_index].state = lo;
                true
            }
            None => false,
        }
    }

    /// Analog pairs as `(negative, positive)` input names, the shape the
    /// binding layer registers analog inputs in.
    pub fn analog_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        (0..AXES.len()).map(move |axis| {
            let hi = Button::ALL.len() + axis * 2;
            (self.inputs[hi + 1].name(), self.inputs[hi].name())
        })
    }

    fn pair_indices(axis_name: &str) -> Option<(usize, usize)> {
        let axis = AXES.iter().position(|(name, _)| *name == axis_name)?;
        let hi = Button::ALL.len() + axis * 2;
        Some((hi, hi + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_count() {
        let table = InputTable::new();
        assert_eq!(table.len(), INPUT_COUNT);
        assert_eq!(INPUT_COUNT, 24);
    }

    #[test]
    fn test_names() {
        let table = InputTable::new();
        assert!(table.get("Button A").is_some());
        assert!(table.get("Button D_RIGHT").is_some());
        assert!(table.get("Axis MAIN X +").is_some());
        assert!(table.get("Axis C Y -").is_some());
        assert!(table.get("Axis L +").is_some());
        assert!(table.get("Axis MAIN +").is_none());
    }

    #[test]
    fn test_initial_states() {
        let table = InputTable::new();
        for button in Button::ALL {
            assert_eq!(table.button(button), 0.0);
        }
        assert_eq!(table.half_axes("L"), Some((0.0, 0.0)));
        assert_eq!(table.half_axes("R"), Some((0.0, 0.0)));
        assert_eq!(table.half_axes("MAIN X"), Some((0.5, 0.5)));
        assert_eq!(table.half_axes("C Y"), Some((0.5, 0.5)));
    }

    #[test]
    fn test_button_index_matches_kind() {
        let table = InputTable::new();
        for button in Button::ALL {
            let input = &table.inputs[button as usize];
            assert_eq!(input.kind(), InputKind::Button(button));
            assert_eq!(input.name(), format!("Button {}", button.token()));
        }
    }

    #[test]
    fn test_set_button() {
        let mut table = InputTable::new();
        table.set_button(Button::Z, true);
        assert_eq!(table.button(Button::Z), 1.0);
        assert_eq!(table.get("Button Z").map(LogicalInput::state), Some(1.0));
        table.set_button(Button::Z, false);
        assert_eq!(table.button(Button::Z), 0.0);
    }

    #[test]
    fn test_set_half_axes() {
        let mut table = InputTable::new();
        assert!(table.set_half_axes("C X", 0.25, 0.0));
        assert_eq!(table.get("Axis C X +").map(LogicalInput::state), Some(0.25));
        assert_eq!(table.get("Axis C X -").map(LogicalInput::state), Some(0.0));
        assert!(!table.set_half_axes("MAIN", 1.0, 1.0));
    }

    #[test]
    fn test_analog_pairs() {
        let table = InputTable::new();
        let pairs: Vec<_> = table.analog_pairs().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], ("Axis L -", "Axis L +"));
        assert_eq!(pairs[2], ("Axis MAIN X -", "Axis MAIN X +"));
    }
}
