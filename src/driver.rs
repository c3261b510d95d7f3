//! Message batch driver.
//!
//! Runs a whole input text through a machine: setting lines reconfigure it,
//! message lines are converted and printed in groups of five.

use log::debug;

use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::setting::{Setting, SETTING_MARKER};
use crate::utils::grouping::{group_symbols, strip_whitespace, GROUP_SIZE};

/// Processes `input` line by line and returns the output text.
///
/// - A line starting with `*` reconfigures `machine` and produces no output.
/// - Blank lines before the first setting are skipped; afterwards each blank
///   line produces a blank output line.
/// - Any other line is a message: its whitespace is removed, it is converted
///   with the rotor state carried over from the previous message line, and it
///   is written in groups of 5 symbols.
///
/// # Errors
/// Returns the first error raised by a setting or a conversion, or
/// [`EnigmaError::ConfigurationError`] if a message precedes every setting.
/// Processing stops at the first error.
///
/// # Examples
///
/// ```
/// use enigma::config::parse_config;
/// use enigma::driver::process_messages;
///
/// let mut machine = parse_config("ABCD\n2 1\nR R (AB) (CD)\nS MA (ABC)\n")
///     .unwrap()
///     .build()
///     .unwrap();
/// let out = process_messages(&mut machine, "* R S A\nAB CDA BCD\n").unwrap();
/// assert_eq!(out.lines().count(), 1);
/// ```
pub fn process_messages(machine: &mut Machine, input: &str) -> Result<String, EnigmaError> {
    let mut output = String::with_capacity(input.len() + input.len() / GROUP_SIZE);
    let mut configured = false;
    let mut messages = 0usize;

    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(SETTING_MARKER) {
            Setting::parse(trimmed, machine.num_rotors())?.apply(machine)?;
            configured = true;
            continue;
        }
        if trimmed.is_empty() {
            if configured {
                output.push('\n');
            }
            continue;
        }
        if !configured {
            return Err(EnigmaError::config(
                "No setting line found before the first message",
            ));
        }

        let converted = machine.convert(&strip_whitespace(trimmed))?;
        output.push_str(&group_symbols(&converted, GROUP_SIZE));
        output.push('\n');
        messages += 1;
    }

    debug!("processed {} message lines", messages);
    Ok(output)
}
