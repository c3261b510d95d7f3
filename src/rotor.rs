//! Rotor: a permutation mounted on a wheel with position and ring offsets.
//!
//! Rotors come in three closed variants ([`RotorKind`]): fixed, stepping
//! (with notches), and reflecting. All rotors of a machine live in a
//! [`RotorArena`] and are referenced by [`RotorId`], so the same physical
//! rotor can be reselected across message settings without aliasing.

use zeroize::Zeroize;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::permutation::Permutation;

/// Behavior variant of a rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Never moves and has no notch.
    Fixed,
    /// Advances under a pawl. Holds the notch positions as alphabet indices.
    Stepping { notches: Vec<usize> },
    /// Reflector. Never moves, and its permutation is a derangement.
    Reflecting,
}

/// A named rotor: a permutation plus mutable position and ring state.
///
/// `ring_offset` is the shift applied on both sides of the permutation.
/// It is set to the position by [`set_position`](Self::set_position),
/// recomputed as `position - ring` by
/// [`recompute_ring_offset`](Self::recompute_ring_offset), and advanced in
/// step with the position.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    kind: RotorKind,
    permutation: Permutation,
    position: usize,
    ring: usize,
    ring_offset: usize,
}

impl Rotor {
    /// Creates a fixed rotor.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::build(name.into(), RotorKind::Fixed, permutation)
    }

    /// Creates a stepping rotor whose notches are the symbols of `notches`.
    ///
    /// # Errors
    /// - [`EnigmaError::ConfigurationError`] if `notches` is empty.
    /// - [`EnigmaError::InvalidSymbol`] if a notch is not in the alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::default());
    /// let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", alpha).unwrap();
    /// let mut rotor = Rotor::stepping("I", perm, "Q").unwrap();
    /// rotor.set_position_symbol('Q').unwrap();
    /// assert!(rotor.at_notch());
    /// ```
    pub fn stepping(
        name: impl Into<String>,
        permutation: Permutation,
        notches: &str,
    ) -> Result<Self, EnigmaError> {
        let name = name.into();
        if notches.is_empty() {
            return Err(EnigmaError::config(format!(
                "Stepping rotor {} has no notches",
                name
            )));
        }
        let notches = notches
            .chars()
            .map(|ch| permutation.alphabet().to_index(ch))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::build(name, RotorKind::Stepping { notches }, permutation))
    }

    /// Creates a reflector.
    ///
    /// # Errors
    /// Returns [`EnigmaError::ConfigurationError`] if `permutation` has a
    /// fixed point.
    pub fn reflecting(
        name: impl Into<String>,
        permutation: Permutation,
    ) -> Result<Self, EnigmaError> {
        let name = name.into();
        if !permutation.is_derangement() {
            return Err(EnigmaError::config(format!(
                "Reflector {} must map every symbol to a different symbol",
                name
            )));
        }
        Ok(Self::build(name, RotorKind::Reflecting, permutation))
    }

    fn build(name: String, kind: RotorKind, permutation: Permutation) -> Self {
        Rotor {
            name,
            kind,
            permutation,
            position: 0,
            ring: 0,
            ring_offset: 0,
        }
    }

    /// Returns the rotor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rotor variant.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the wiring permutation at position 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet of the wiring.
    pub fn alphabet(&self) -> &Alphabet {
        self.permutation.alphabet()
    }

    /// Returns the alphabet size.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns true iff this rotor has a pawl and can move.
    pub fn is_rotating(&self) -> bool {
        matches!(self.kind, RotorKind::Stepping { .. })
    }

    /// Returns true iff this rotor is a reflector.
    pub fn is_reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflecting)
    }

    /// Returns the symbol shown in the rotor window.
    pub fn position_symbol(&self) -> char {
        self.alphabet().symbol_at(self.position)
    }

    /// Returns the notch indices; empty unless stepping.
    pub fn notches(&self) -> &[usize] {
        match &self.kind {
            RotorKind::Stepping { notches } => notches.as_slice(),
            RotorKind::Fixed | RotorKind::Reflecting => &[],
        }
    }

    /// Returns the current position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the ring value.
    pub fn ring(&self) -> usize {
        self.ring
    }

    /// Returns the offset applied around the permutation.
    pub fn ring_offset(&self) -> usize {
        self.ring_offset
    }

    /// Sets the position to `position` and resets the ring offset to match it.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] if `position >= size()`.
    /// - [`EnigmaError::ConfigurationError`] for a non-zero reflector position.
    pub fn set_position(&mut self, position: usize) -> Result<(), EnigmaError> {
        if position >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: position,
                size: self.size(),
            });
        }
        if self.is_reflecting() && position != 0 {
            return Err(EnigmaError::config(format!(
                "Reflector {} has only one position",
                self.name
            )));
        }
        self.position = position;
        self.ring_offset = position;
        Ok(())
    }

    /// Sets the position to the index of `symbol`.
    ///
    /// # Errors
    /// Same as [`set_position`](Self::set_position), plus
    /// [`EnigmaError::InvalidSymbol`] if `symbol` is not in the alphabet.
    pub fn set_position_symbol(&mut self, symbol: char) -> Result<(), EnigmaError> {
        let position = self.alphabet().to_index(symbol)?;
        self.set_position(position)
    }

    /// Sets the ring value to the index of `symbol`. Takes effect on the next
    /// [`recompute_ring_offset`](Self::recompute_ring_offset).
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `symbol` is not in the alphabet.
    pub fn set_ring_value(&mut self, symbol: char) -> Result<(), EnigmaError> {
        self.ring = self.alphabet().to_index(symbol)?;
        Ok(())
    }

    /// Sets the ring offset to `position - ring`, wrapped.
    pub fn recompute_ring_offset(&mut self) {
        self.ring_offset = self
            .permutation
            .wrap(self.position as i64 - self.ring as i64);
    }

    /// Converts a contact index entering from the right.
    pub fn convert_forward(&self, p: usize) -> usize {
        let offset = self.ring_offset as i64;
        let entered = self.permutation.wrap(p as i64 + offset);
        let exited = self.permutation.permute(entered);
        self.permutation.wrap(exited as i64 - offset)
    }

    /// Converts a contact index entering from the left; inverse of
    /// [`convert_forward`](Self::convert_forward) at the same offsets.
    pub fn convert_backward(&self, e: usize) -> usize {
        let offset = self.ring_offset as i64;
        let entered = self.permutation.wrap(e as i64 + offset);
        let exited = self.permutation.invert(entered);
        self.permutation.wrap(exited as i64 - offset)
    }

    /// Returns true iff this rotor lets its left neighbor advance.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Stepping { notches } => notches.contains(&self.position),
            RotorKind::Fixed | RotorKind::Reflecting => false,
        }
    }

    /// Advances one position. No-op unless stepping.
    pub fn advance(&mut self) {
        if let RotorKind::Stepping { .. } = self.kind {
            self.position = self.permutation.wrap(self.position as i64 + 1);
            self.ring_offset = self.permutation.wrap(self.ring_offset as i64 + 1);
        }
    }

    /// Returns the rotor to position 0 with a zero ring.
    pub(crate) fn reset(&mut self) {
        self.position = 0;
        self.ring = 0;
        self.ring_offset = 0;
    }
}

/// Unique identifier for a rotor within an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub usize);

/// Pool of all rotors available to a machine.
///
/// Stores the rotors in a contiguous `Vec` and hands out [`RotorId`]s; the
/// machine's slots hold ids rather than rotors.
#[derive(Debug, Default)]
pub struct RotorArena {
    rotors: Vec<Rotor>,
}

impl RotorArena {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        RotorArena { rotors: Vec::new() }
    }

    /// Creates a new empty arena with room for `capacity` rotors.
    pub fn with_capacity(capacity: usize) -> Self {
        RotorArena {
            rotors: Vec::with_capacity(capacity),
        }
    }

    /// Adds `rotor` to the pool and returns its id.
    pub fn add(&mut self, rotor: Rotor) -> RotorId {
        let id = RotorId(self.rotors.len());
        self.rotors.push(rotor);
        id
    }

    /// Returns the number of rotors in the pool.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Returns the id of the first rotor named `name`.
    pub fn find(&self, name: &str) -> Option<RotorId> {
        self.rotors
            .iter()
            .position(|r| r.name() == name)
            .map(RotorId)
    }

    /// Returns the rotor with the given id.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this arena.
    pub fn get(&self, id: RotorId) -> &Rotor {
        &self.rotors[id.0]
    }

    /// Returns the rotor with the given id, mutably.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this arena.
    pub fn get_mut(&mut self, id: RotorId) -> &mut Rotor {
        &mut self.rotors[id.0]
    }

    /// Iterates over the rotors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rotor> {
        self.rotors.iter()
    }
}

impl Drop for RotorArena {
    /// Clears all rotor positions and ring settings on drop.
    fn drop(&mut self) {
        for rotor in self.rotors.iter_mut() {
            rotor.position.zeroize();
            rotor.ring.zeroize();
            rotor.ring_offset.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::default())
    }

    fn idx(ch: char) -> usize {
        Alphabet::default().to_index(ch).unwrap()
    }

    fn rotor_iii() -> Rotor {
        let perm = Permutation::new("(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)", upper()).unwrap();
        Rotor::stepping("III", perm, "V").unwrap()
    }

    fn reflector_b() -> Rotor {
        let perm = Permutation::new(
            "(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)",
            upper(),
        )
        .unwrap();
        Rotor::reflecting("B", perm).unwrap()
    }

    fn beta() -> Rotor {
        let perm = Permutation::new("(ALBEVFCYODJWUGNMQTZSKPR) (HIX)", upper()).unwrap();
        Rotor::fixed("Beta", perm)
    }

    #[test]
    fn test_new_rotor_default_values() {
        let rotor = rotor_iii();
        assert_eq!(rotor.name(), "III");
        assert_eq!(rotor.position(), 0);
        assert_eq!(rotor.ring(), 0);
        assert_eq!(rotor.ring_offset(), 0);
        assert!(rotor.is_rotating());
        assert!(!rotor.is_reflecting());
        assert_eq!(rotor.notches(), &[idx('V')]);
    }

    #[test]
    fn test_convert_at_position_zero() {
        assert_eq!(reflector_b().convert_forward(idx('A')), idx('E'));
        assert_eq!(reflector_b().convert_forward(idx('V')), idx('T'));
        assert_eq!(beta().convert_forward(idx('A')), idx('L'));
        assert_eq!(beta().convert_forward(idx('D')), idx('J'));
        assert_eq!(rotor_iii().convert_forward(idx('A')), idx('B'));
        assert_eq!(rotor_iii().convert_forward(idx('H')), idx('P'));
        assert_eq!(rotor_iii().convert_backward(idx('V')), idx('L'));
    }

    #[test]
    fn test_convert_with_offset() {
        let mut rotor = rotor_iii();
        rotor.set_position(1).unwrap();
        // A+1 = B -> D, D-1 = C
        assert_eq!(rotor.convert_forward(idx('A')), idx('C'));
        // Z+1 wraps to A -> B, B-1 = A
        assert_eq!(rotor.convert_forward(idx('Z')), idx('A'));
        assert_eq!(rotor.convert_backward(idx('C')), idx('A'));
    }

    #[test]
    fn test_forward_backward_inverse_for_all_offsets() {
        let mut rotor = rotor_iii();
        for pos in 0..26 {
            for ring in "AGZ".chars() {
                rotor.set_position(pos).unwrap();
                rotor.set_ring_value(ring).unwrap();
                rotor.recompute_ring_offset();
                for p in 0..26 {
                    assert_eq!(rotor.convert_backward(rotor.convert_forward(p)), p);
                }
            }
        }
    }

    #[test]
    fn test_ring_offset_tracks_position_minus_ring() {
        let mut rotor = rotor_iii();
        rotor.set_position_symbol('C').unwrap();
        assert_eq!(rotor.ring_offset(), 2);
        rotor.set_ring_value('E').unwrap();
        assert_eq!(rotor.ring_offset(), 2);
        rotor.recompute_ring_offset();
        assert_eq!(rotor.ring_offset(), 24);
        rotor.advance();
        assert_eq!(rotor.position(), 3);
        assert_eq!(rotor.ring_offset(), 25);
        rotor.advance();
        assert_eq!(rotor.ring_offset(), 0);
    }

    #[test]
    fn test_reflector_constructor_and_predicate() {
        let refl = reflector_b();
        assert!(refl.is_reflecting());
        assert!(!refl.is_rotating());
        assert!(!beta().is_reflecting());
        assert!(!beta().is_rotating());
        assert!(rotor_iii().is_rotating());
    }

    #[test]
    fn test_position_symbol() {
        let mut rotor = rotor_iii();
        assert_eq!(rotor.position_symbol(), 'A');
        rotor.set_position_symbol('Z').unwrap();
        assert_eq!(rotor.position_symbol(), 'Z');
        rotor.advance();
        assert_eq!(rotor.position_symbol(), 'A');
    }

    #[test]
    fn test_advance_wraps() {
        let mut rotor = rotor_iii();
        rotor.set_position_symbol('Z').unwrap();
        rotor.advance();
        assert_eq!(rotor.position(), 0);
    }

    #[test]
    fn test_at_notch() {
        let mut rotor = rotor_iii();
        assert!(!rotor.at_notch());
        rotor.set_position_symbol('V').unwrap();
        assert!(rotor.at_notch());
        rotor.advance();
        assert!(!rotor.at_notch());
    }

    #[test]
    fn test_multiple_notches() {
        let perm = Permutation::new("(AB)", upper()).unwrap();
        let mut rotor = Rotor::stepping("VI", perm, "ZM").unwrap();
        rotor.set_position_symbol('M').unwrap();
        assert!(rotor.at_notch());
        rotor.set_position_symbol('Z').unwrap();
        assert!(rotor.at_notch());
        rotor.set_position_symbol('A').unwrap();
        assert!(!rotor.at_notch());
    }

    #[test]
    fn test_fixed_and_reflector_never_move() {
        let mut fixed = beta();
        fixed.set_position(5).unwrap();
        fixed.advance();
        assert_eq!(fixed.position(), 5);
        assert!(!fixed.at_notch());

        let mut refl = reflector_b();
        refl.advance();
        assert_eq!(refl.position(), 0);
        assert!(!refl.at_notch());
    }

    #[test]
    fn test_reflector_single_position() {
        let mut refl = reflector_b();
        assert!(refl.set_position(0).is_ok());
        assert!(matches!(
            refl.set_position(1),
            Err(EnigmaError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_reflector_requires_derangement() {
        let perm = Permutation::new("(AE) (BN)", upper()).unwrap();
        assert!(matches!(
            Rotor::reflecting("bad", perm),
            Err(EnigmaError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_stepping_requires_valid_notches() {
        let perm = Permutation::new("(AB)", upper()).unwrap();
        assert!(matches!(
            Rotor::stepping("X", perm.clone(), ""),
            Err(EnigmaError::ConfigurationError(_))
        ));
        assert_eq!(
            Rotor::stepping("X", perm, "a").unwrap_err(),
            EnigmaError::InvalidSymbol('a')
        );
    }

    #[test]
    fn test_set_position_out_of_range() {
        let mut rotor = rotor_iii();
        assert_eq!(
            rotor.set_position(26),
            Err(EnigmaError::IndexOutOfRange { index: 26, size: 26 })
        );
    }

    #[test]
    fn test_arena_find_first_match() {
        let mut arena = RotorArena::new();
        assert!(arena.is_empty());
        let first = arena.add(rotor_iii());
        arena.add(beta());
        arena.add(rotor_iii());
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.find("III"), Some(first));
        assert_eq!(arena.find("Beta"), Some(RotorId(1)));
        assert_eq!(arena.find("VII"), None);
    }

    #[test]
    fn test_arena_mutation_through_id() {
        let mut arena = RotorArena::with_capacity(1);
        let id = arena.add(rotor_iii());
        arena.get_mut(id).set_position(7).unwrap();
        assert_eq!(arena.get(id).position(), 7);
        arena.get_mut(id).reset();
        assert_eq!(arena.get(id).position(), 0);
    }
}
