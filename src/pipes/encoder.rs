//! # Axis Encoder
//!
//! Converts normalized analog values into the byte encodings used by the
//! packed pad report, and into the half-axis magnitudes exposed as logical
//! inputs.
//!
//! ## Stick encoding
//!
//! Stick axes (`MAIN X/Y`, `C X/Y`) use the formula observed on real pipe
//! input: `floor((value - 0.5) * 254)` taken as a signed byte, then stored
//! with its two's-complement bit pattern.
//!
//! | value | signed | stored |
//! |-------|--------|--------|
//! | 0.0   | -127   | 0x81   |
//! | 0.5   | 0      | 0x00   |
//! | 1.0   | 127    | 0x7F   |
//!
//! ## Trigger encoding
//!
//! Shoulder triggers (`L`, `R`) are a plain linear scale truncated toward
//! zero: `value * 255`.

/// Lower bound of the normalized axis domain.
pub const AXIS_VALUE_MIN: f64 = 0.0;

/// Upper bound of the normalized axis domain.
pub const AXIS_VALUE_MAX: f64 = 1.0;

/// Neutral position for stick axes.
pub const STICK_NEUTRAL: f64 = 0.5;

/// Neutral position for trigger axes.
pub const TRIGGER_NEUTRAL: f64 = 0.0;

/// Clamp a value into `[0.0, 1.0]`.
///
/// NaN clamps to `0.0`.
#[must_use]
pub fn clamp_axis_value(value: f64) -> f64 {
    if value.is_nan() {
        return AXIS_VALUE_MIN;
    }
    value.clamp(AXIS_VALUE_MIN, AXIS_VALUE_MAX)
}

/// Encode a stick axis value into its report byte.
///
/// # Arguments
///
/// * `value` - Normalized axis position, clamped to `[0.0, 1.0]`
///
/// # Returns
///
/// * `u8` - Bit pattern of the signed offset from center
///
/// # Examples
///
/// ```
/// use pipe_controller::pipes::encoder::encode_stick;
///
/// assert_eq!(encode_stick(0.0), 0x81);
/// assert_eq!(encode_stick(0.5), 0x00);
/// assert_eq!(encode_stick(1.0), 0x7F);
/// ```
#[must_use]
pub fn encode_stick(value: f64) -> u8 {
    let value = clamp_axis_value(value);
    // Range after clamping is [-127.0, 127.0], so the cast never saturates.
    let raw = ((value - 0.5) * 254.0).floor() as i8;
    raw as u8
}

/// Encode a shoulder trigger value into its report byte.
///
/// # Examples
///
/// ```
/// use pipe_controller::pipes::encoder::encode_trigger;
///
/// assert_eq!(encode_trigger(0.0), 0);
/// assert_eq!(encode_trigger(1.0), 255);
/// ```
#[must_use]
pub fn encode_trigger(value: f64) -> u8 {
    (clamp_axis_value(value) * 255.0) as u8
}

/// Split an axis value into its `(hi, lo)` half-axis magnitudes.
///
/// `hi` grows from 0 to 1 as the value moves from center to 1.0, `lo` grows
/// as it moves from center to 0.0. At most one of them is non-zero.
///
/// # Examples
///
/// ```
/// use pipe_controller::pipes::encoder::half_axes;
///
/// assert_eq!(half_axes(0.5), (0.0, 0.0));
/// assert_eq!(half_axes(1.0), (1.0, 0.0));
/// assert_eq!(half_axes(0.0), (0.0, 1.0));
/// ```
#[must_use]
pub fn half_axes(value: f64) -> (f64, f64) {
    let value = clamp_axis_value(value);
    let hi = (value - 0.5).max(0.0) * 2.0;
    let lo = (0.5 - value.min(0.5)) * 2.0;
    (hi, lo)
}
