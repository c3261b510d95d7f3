//! Per-message setting lines.
//!
//! ```text
//! * B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
//! * B Beta III IV I AXLE CDEF (HQ) (EX)
//! ```
//!
//! A setting line names the rotors for every slot (reflector first), gives
//! the positions of the non-reflector slots, optionally their ring settings,
//! and optionally a plugboard in cycle notation.

use std::collections::HashSet;

use log::debug;

use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::permutation::Permutation;

/// Marker that opens a setting line.
pub const SETTING_MARKER: char = '*';

/// A parsed setting line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    rotors: Vec<String>,
    positions: String,
    rings: Option<String>,
    plugboard: String,
}

impl Setting {
    /// Parses `line` for a machine with `num_rotors` slots.
    ///
    /// # Errors
    /// Returns [`EnigmaError::ConfigurationError`] if the line does not start
    /// with `*`, names fewer than `num_rotors` rotors, names a rotor twice,
    /// lacks the position string, or has a stray token before the plugboard.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::setting::Setting;
    ///
    /// let setting = Setting::parse("* B Beta III IV I AXLE (HQ) (EX)", 5).unwrap();
    /// assert_eq!(setting.positions(), "AXLE");
    /// assert_eq!(setting.rings(), None);
    /// ```
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self, EnigmaError> {
        let body = line
            .trim_start()
            .strip_prefix(SETTING_MARKER)
            .ok_or_else(|| EnigmaError::config("Setting needs to have an * in the beginning"))?;
        let mut tokens = body.split_whitespace().peekable();

        let mut rotors = Vec::with_capacity(num_rotors);
        let mut seen = HashSet::with_capacity(num_rotors);
        for _ in 0..num_rotors {
            let name = tokens
                .next_if(|t| !t.starts_with('('))
                .ok_or_else(|| {
                    EnigmaError::config(format!(
                        "Setting has too few rotors for a {}-slot machine",
                        num_rotors
                    ))
                })?;
            if !seen.insert(name) {
                return Err(EnigmaError::config(format!("Duplicate rotor name {}", name)));
            }
            rotors.push(name.to_string());
        }

        let positions = tokens
            .next_if(|t| !t.starts_with('('))
            .ok_or_else(|| EnigmaError::config("Setting is missing the rotor positions"))?
            .to_string();
        let rings = tokens
            .next_if(|t| !t.starts_with('('))
            .map(str::to_string);

        let rest: Vec<&str> = tokens.collect();
        if let Some(stray) = rest.first().filter(|t| !t.starts_with('(')) {
            return Err(EnigmaError::config(format!(
                "Unexpected token {:?} in setting",
                stray
            )));
        }

        Ok(Setting {
            rotors,
            positions,
            rings,
            plugboard: rest.join(" "),
        })
    }

    /// Returns the rotor names, reflector first.
    pub fn rotors(&self) -> &[String] {
        &self.rotors
    }

    /// Returns the position string.
    pub fn positions(&self) -> &str {
        &self.positions
    }

    /// Returns the ring string, if one was given.
    pub fn rings(&self) -> Option<&str> {
        self.rings.as_deref()
    }

    /// Returns the plugboard cycles; empty for no plugboard.
    pub fn plugboard(&self) -> &str {
        &self.plugboard
    }

    /// Configures `machine`: inserts the rotors, sets positions, then rings
    /// (if any), then the plugboard.
    ///
    /// # Errors
    /// Propagates the machine's errors; see [`Machine::insert_rotors`],
    /// [`Machine::set_positions`], [`Machine::set_ring_values`] and
    /// [`Permutation::new`].
    pub fn apply(&self, machine: &mut Machine) -> Result<(), EnigmaError> {
        machine.insert_rotors(&self.rotors[..])?;
        machine.set_positions(&self.positions)?;
        if let Some(rings) = &self.rings {
            machine.set_ring_values(rings)?;
        }
        let plugboard = Permutation::new(&self.plugboard, machine.alphabet().clone())?;
        machine.set_plugboard(plugboard)?;
        debug!("setting applied: {:?}", self);
        Ok(())
    }
}
