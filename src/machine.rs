//! Machine: ordered rotor slots plus a plugboard.
//!
//! Orchestrates the per-character pipeline: stepping decision, stepping,
//! plugboard, rotors right to left through the reflector, rotors back left
//! to right, plugboard inverse.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, trace};

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorArena, RotorId};

/// A complete rotor machine.
///
/// # Architecture
///
/// ```text
///  slot:   0           1 .. N-P-1      N-P .. N-1
///          reflector   fixed rotors    stepping rotors (P pawls)
///
///  in -> plugboard -> slot N-1 -> ... -> slot 0 -> slot 1 -> ... -> slot N-1 -> plugboard⁻¹ -> out
/// ```
///
/// Every rotor the machine knows about lives in a [`RotorArena`]; the slots
/// hold [`RotorId`]s selected by [`insert_rotors`](Self::insert_rotors).
/// Conversion mutates rotor positions, so a machine must process the symbols
/// of a message sequentially.
#[derive(Debug)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    arena: RotorArena,
    slots: Vec<RotorId>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `num_pawls` pawls, able
    /// to use any of `rotors`. The plugboard starts as the identity and no
    /// rotors are inserted.
    ///
    /// # Errors
    /// Returns [`EnigmaError::ConfigurationError`] if `num_rotors` is 0,
    /// `num_pawls >= num_rotors` (slot 0 always holds the reflector), or a
    /// rotor uses a different alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Machine, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
    /// let refl = Rotor::reflecting("R", Permutation::new("(AB) (CD)", alpha.clone()).unwrap()).unwrap();
    /// let rot = Rotor::stepping("S", Permutation::new("(ABC)", alpha.clone()).unwrap(), "A").unwrap();
    ///
    /// let mut machine = Machine::new(alpha, 2, 1, vec![refl, rot]).unwrap();
    /// machine.insert_rotors(&["R", "S"]).unwrap();
    /// machine.set_positions("A").unwrap();
    ///
    /// let cipher = machine.convert("ABCD").unwrap();
    /// machine.set_positions("A").unwrap();
    /// assert_eq!(machine.convert(&cipher).unwrap(), "ABCD");
    /// ```
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        rotors: impl IntoIterator<Item = Rotor>,
    ) -> Result<Self, EnigmaError> {
        if num_rotors == 0 {
            return Err(EnigmaError::config(
                "Number of rotors has to be greater than 0",
            ));
        }
        if num_pawls >= num_rotors {
            return Err(EnigmaError::config(format!(
                "Need fewer pawls ({}) than rotors ({}); slot 0 is the reflector",
                num_pawls, num_rotors
            )));
        }

        let rotors = rotors.into_iter();
        let mut arena = RotorArena::with_capacity(rotors.size_hint().0);
        for rotor in rotors {
            if rotor.alphabet() != alphabet.as_ref() {
                return Err(EnigmaError::config(format!(
                    "Rotor {} uses a different alphabet than the machine",
                    rotor.name()
                )));
            }
            arena.add(rotor);
        }
        debug!(
            "machine built: {} slots, {} pawls, {} rotors available",
            num_rotors,
            num_pawls,
            arena.len()
        );

        let plugboard = Permutation::identity(alphabet.clone());
        Ok(Machine {
            alphabet,
            num_rotors,
            num_pawls,
            arena,
            slots: Vec::with_capacity(num_rotors),
            plugboard,
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, i.e. of stepping rotors.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns the machine alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the current plugboard.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Returns the names of all available rotors, in configuration order.
    pub fn rotor_names(&self) -> Vec<&str> {
        self.arena.iter().map(Rotor::name).collect()
    }

    /// Returns the names of the inserted rotors, reflector first.
    pub fn slot_names(&self) -> Vec<&str> {
        self.slots.iter().map(|&id| self.arena.get(id).name()).collect()
    }

    /// Returns the rotor in slot `slot`, if any rotor is inserted there.
    pub fn slot(&self, slot: usize) -> Option<&Rotor> {
        self.slots.get(slot).map(|&id| self.arena.get(id))
    }

    /// Returns the available rotor named `name`.
    pub fn rotor(&self, name: &str) -> Option<&Rotor> {
        self.arena.find(name).map(|id| self.arena.get(id))
    }

    /// Places the rotors named `names` into the slots, leftmost first.
    /// Inserted rotors start at position 0 with a zero ring.
    ///
    /// # Errors
    /// Returns [`EnigmaError::ConfigurationError`] if:
    /// - `names.len() != num_rotors()`;
    /// - a name matches no available rotor, or is given twice;
    /// - slot 0 is not a reflector, or a reflector appears in another slot;
    /// - the stepping rotors are not exactly the rightmost `num_pawls()` slots.
    ///
    /// On error the previous slot assignment is left untouched.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), EnigmaError> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::config(format!(
                "Machine has {} rotor slots but {} rotors were given",
                self.num_rotors,
                names.len()
            )));
        }

        let first_stepping = self.num_rotors - self.num_pawls;
        let mut selected = Vec::with_capacity(self.num_rotors);
        let mut seen = HashSet::with_capacity(self.num_rotors);
        for (slot, name) in names.iter().map(|name| name.as_ref()).enumerate() {
            let id = self
                .arena
                .find(name)
                .ok_or_else(|| EnigmaError::config(format!("Rotor {} doesn't exist", name)))?;
            if !seen.insert(id) {
                return Err(EnigmaError::config(format!(
                    "Rotor {} is inserted more than once",
                    name
                )));
            }

            let rotor = self.arena.get(id);
            if slot == 0 {
                if !rotor.is_reflecting() {
                    return Err(EnigmaError::config(format!(
                        "First rotor has to be a reflector, got {}",
                        name
                    )));
                }
            } else if rotor.is_reflecting() {
                return Err(EnigmaError::config(format!(
                    "Reflector {} can only be placed in the first slot",
                    name
                )));
            } else if rotor.is_rotating() != (slot >= first_stepping) {
                return Err(EnigmaError::config(format!(
                    "Rotor {} in slot {}: the {} rightmost rotors must be the moving ones",
                    name, slot, self.num_pawls
                )));
            }
            selected.push(id);
        }

        for &id in &selected {
            self.arena.get_mut(id).reset();
        }
        self.slots = selected;
        debug!("rotors inserted: {}", self.slot_names().join(" "));
        Ok(())
    }

    /// Sets the positions of slots `1..N` from `setting`, leftmost first.
    /// The reflector is never set.
    ///
    /// # Errors
    /// - [`EnigmaError::ConfigurationError`] if no rotors are inserted.
    /// - [`EnigmaError::LengthMismatch`] if `setting` does not have
    ///   `num_rotors() - 1` symbols.
    /// - [`EnigmaError::InvalidSymbol`] if a symbol is not in the alphabet.
    pub fn set_positions(&mut self, setting: &str) -> Result<(), EnigmaError> {
        let indices = self.slot_setting(setting)?;
        for (&id, index) in self.slots[1..].iter().zip(indices) {
            self.arena.get_mut(id).set_position(index)?;
        }
        debug!("rotor positions set to {}", setting);
        Ok(())
    }

    /// Sets the ring values of slots `1..N` from `rings`, leftmost first,
    /// then recomputes every ring offset from the current positions.
    ///
    /// # Errors
    /// Same as [`set_positions`](Self::set_positions).
    pub fn set_ring_values(&mut self, rings: &str) -> Result<(), EnigmaError> {
        self.slot_setting(rings)?;
        for (&id, ring) in self.slots[1..].iter().zip(rings.chars()) {
            let rotor = self.arena.get_mut(id);
            rotor.set_ring_value(ring)?;
            rotor.recompute_ring_offset();
        }
        debug!("ring settings set to {}", rings);
        Ok(())
    }

    /// Validates a per-slot setting string and converts it to indices.
    fn slot_setting(&self, setting: &str) -> Result<Vec<usize>, EnigmaError> {
        if self.slots.is_empty() {
            return Err(EnigmaError::config("No rotors have been inserted"));
        }
        let expected = self.num_rotors - 1;
        let found = setting.chars().count();
        if found != expected {
            return Err(EnigmaError::LengthMismatch { expected, found });
        }
        setting
            .chars()
            .map(|ch| self.alphabet.to_index(ch))
            .collect()
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    /// Returns [`EnigmaError::ConfigurationError`] if `plugboard` is over a
    /// different alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<(), EnigmaError> {
        if plugboard.alphabet().as_ref() != self.alphabet.as_ref() {
            return Err(EnigmaError::config(
                "Plugboard uses a different alphabet than the machine",
            ));
        }
        debug!("plugboard set to {}", plugboard);
        self.plugboard = plugboard;
        Ok(())
    }

    /// Returns the current positions of slots `1..N` as symbols, one per slot.
    pub fn positions(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .map(|&id| self.arena.get(id).position_symbol())
            .collect()
    }

    /// Advances the machine one keystroke, then converts index `c`.
    ///
    /// # Errors
    /// - [`EnigmaError::ConfigurationError`] if no rotors are inserted.
    /// - [`EnigmaError::IndexOutOfRange`] if `c >= alphabet size`.
    pub fn convert_index(&mut self, c: usize) -> Result<usize, EnigmaError> {
        if self.slots.is_empty() {
            return Err(EnigmaError::config("No rotors have been inserted"));
        }
        let size = self.alphabet.size();
        if c >= size {
            return Err(EnigmaError::IndexOutOfRange { index: c, size });
        }

        self.step();

        let mut p = self.plugboard.permute(c);
        for &id in self.slots.iter().rev() {
            p = self.arena.get(id).convert_forward(p);
        }
        for &id in self.slots.iter().skip(1) {
            p = self.arena.get(id).convert_backward(p);
        }
        Ok(self.plugboard.invert(p))
    }

    /// Converts `msg` symbol by symbol, advancing the rotors between symbols.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidSymbol`] if `msg` contains a symbol outside the
    ///   alphabet. Rotor state is then undefined until reconfigured.
    /// - [`EnigmaError::ConfigurationError`] if no rotors are inserted.
    pub fn convert(&mut self, msg: &str) -> Result<String, EnigmaError> {
        let mut out = String::with_capacity(msg.len());
        for ch in msg.chars() {
            let index = self.alphabet.to_index(ch)?;
            let converted = self.convert_index(index)?;
            out.push(self.alphabet.to_symbol(converted)?);
        }
        Ok(out)
    }

    /// Decides which rotors move before moving any, then advances them.
    ///
    /// The rightmost rotor always moves. A rotor at its notch moves itself
    /// and its left neighbor, which yields the double step of the middle rotor.
    fn step(&mut self) {
        let n = self.slots.len();
        if self.num_pawls == 0 {
            return;
        }
        let first_stepping = n - self.num_pawls;
        let mut advances = vec![false; n];
        for slot in first_stepping..n - 1 {
            if self.arena.get(self.slots[slot + 1]).at_notch() {
                advances[slot + 1] = true;
                advances[slot] = true;
            }
        }
        advances[n - 1] = true;
        trace!("stepping slots {:?}", advances);

        for (slot, &id) in self.slots.iter().enumerate() {
            if advances[slot] {
                self.arena.get_mut(id).advance();
            }
        }
    }
}
