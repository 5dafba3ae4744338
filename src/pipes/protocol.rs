//! # Pipe Command Protocol
//!
//! Line-oriented ASCII protocol written by the controlling process.
//!
//! ```text
//! line        := "FLUSH" | press_cmd | release_cmd | set_cmd
//! press_cmd   := "PRESS" SP button
//! release_cmd := "RELEASE" SP button
//! set_cmd     := "SET" SP name SP number [SP number]
//! button      := "A" | "B" | "X" | "Y" | "Z" | "START" | "L" | "R"
//!              | "D_UP" | "D_DOWN" | "D_LEFT" | "D_RIGHT"
//! name        := "L" | "R" | "MAIN" | "C"
//! number      := decimal literal, '.' radix point, optional sign
//! ```
//!
//! Lines are framed by `\n` before they reach [`parse_line`]. Anything that
//! does not match the grammar parses to `None` and is ignored by the device.

use super::report::Button;

/// Command verb that ends a drain cycle.
pub const FLUSH: &str = "FLUSH";
/// Command verb that presses a button.
pub const PRESS: &str = "PRESS";
/// Command verb that releases a button.
pub const RELEASE: &str = "RELEASE";
/// Command verb that moves an axis or stick.
pub const SET: &str = "SET";

/// Token separator.
pub const SEPARATOR: char = ' ';

/// Smallest accepted token count for non-FLUSH lines.
const MIN_TOKENS: usize = 2;
/// Largest accepted token count for non-FLUSH lines.
const MAX_TOKENS: usize = 4;

/// One decoded protocol line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The writer has delivered everything for this frame.
    Flush,
    /// Set a button's bit.
    Press(Button),
    /// Clear a button's bit.
    Release(Button),
    /// `SET <name> <value>`: one scalar axis, e.g. the `L` trigger.
    SetAxis { name: String, value: f64 },
    /// `SET <name> <x> <y>`: a stick, applied as `<name> X` and `<name> Y`.
    SetStick { name: String, x: f64, y: f64 },
}

/// Parse one line (without its trailing newline) into a command.
///
/// Returns `None` for lines that are valid framing but not valid commands:
/// unknown verbs, wrong arity, and `PRESS`/`RELEASE` of unknown buttons.
/// Axis names are not validated here; the device ignores names it has no
/// axis for.
///
/// # Examples
///
/// ```
/// use pipe_controller::pipes::protocol::{parse_line, Command};
/// use pipe_controller::pipes::report::Button;
///
/// assert_eq!(parse_line("FLUSH"), Some(Command::Flush));
/// assert_eq!(parse_line("PRESS A"), Some(Command::Press(Button::A)));
/// assert_eq!(parse_line("JUMP HIGH"), None);
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Option<Command> {
    if line == FLUSH {
        return Some(Command::Flush);
    }

    let tokens = split_tokens(line);
    if tokens.len() < MIN_TOKENS || tokens.len() > MAX_TOKENS {
        return None;
    }

    match tokens[0] {
        PRESS => Button::from_token(tokens[1]).map(Command::Press),
        RELEASE => Button::from_token(tokens[1]).map(Command::Release),
        SET => match tokens.len() {
            3 => Some(Command::SetAxis {
                name: tokens[1].to_string(),
                value: parse_number(tokens[2]),
            }),
            4 => Some(Command::SetStick {
                name: tokens[1].to_string(),
                x: parse_number(tokens[2]),
                y: parse_number(tokens[3]),
            }),
            _ => None,
        },
        _ => None,
    }
}

/// Split on single spaces.
///
/// Runs of spaces yield empty tokens. A trailing separator does not produce
/// a trailing empty token, so `"PRESS A "` is two tokens.
fn split_tokens(line: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = line.split(SEPARATOR).collect();
    if tokens.len() > 1 && tokens.last() == Some(&"") {
        tokens.pop();
    }
    tokens
}

/// Parse a decimal number independent of the process locale.
///
/// The longest numeric prefix is used, so `"0.5abc"` is `0.5`. Text with no
/// numeric prefix (including `inf` and `nan`) is `0.0`.
///
/// # Examples
///
/// ```
/// use pipe_controller::pipes::protocol::parse_number;
///
/// assert_eq!(parse_number("0.25"), 0.25);
/// assert_eq!(parse_number("-1"), -1.0);
/// assert_eq!(parse_number("0,5"), 0.0);
/// assert_eq!(parse_number("garbage"), 0.0);
/// ```
#[must_use]
pub fn parse_number(text: &str) -> f64 {
    let prefix = &text[..numeric_prefix_len(text.as_bytes())];
    prefix.parse::<f64>().unwrap_or(0.0)
}

/// Length of the longest prefix of `bytes` shaped like
/// `[+-]? digits? ('.' digits?)? ([eE] [+-]? digits)?` with at least one digit
/// in the mantissa.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    end
}
