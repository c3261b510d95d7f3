//! Permutation: a substitution over alphabet indices given in cycle notation.
//!
//! The cycle string is parsed once into forward and inverse lookup tables,
//! so [`Permutation::permute`] and [`Permutation::invert`] are plain array
//! reads. The parsed cycles are kept for [`Permutation::is_derangement`] and
//! for rendering the permutation back to notation.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;

/// A bijection over `[0, size)` built from disjoint cycles.
///
/// Symbols that appear in no cycle are fixed points.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<Vec<usize>>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parses `cycles`, a string of the form `"(cccc) (cc) ..."` over the
    /// symbols of `alphabet`. Whitespace is ignored; an empty string is the
    /// identity.
    ///
    /// # Errors
    /// - [`EnigmaError::MalformedCycle`] on an empty cycle `()`, unmatched or
    ///   nested parentheses, a symbol outside any parentheses, or a symbol
    ///   repeated across cycles.
    /// - [`EnigmaError::InvalidSymbol`] if a symbol is not in the alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
    /// let perm = Permutation::new("(BACD)", alpha).unwrap();
    /// assert_eq!(perm.permute(1), 0);
    /// assert_eq!(perm.invert(0), 1);
    /// ```
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self, EnigmaError> {
        let parsed = parse_cycles(cycles, &alphabet)?;
        Ok(Self::from_cycles(parsed, alphabet))
    }

    /// Returns the identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        Self::from_cycles(Vec::new(), alphabet)
    }

    fn from_cycles(cycles: Vec<Vec<usize>>, alphabet: Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut inverse: Vec<usize> = (0..size).collect();
        for cycle in &cycles {
            for (k, &from) in cycle.iter().enumerate() {
                let to = cycle[(k + 1) % cycle.len()];
                forward[from] = to;
                inverse[to] = from;
            }
        }
        Permutation {
            alphabet,
            cycles,
            forward,
            inverse,
        }
    }

    /// Returns the size of the alphabet this permutation acts on.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Reduces `p` into `[0, size)` with floored modulo, so negative values
    /// wrap upward.
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Applies the permutation to index `p` (taken modulo `size()`).
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Applies the inverse permutation to index `c` (taken modulo `size()`).
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Applies the permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `symbol` is not in the alphabet.
    pub fn permute_symbol(&self, symbol: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.to_index(symbol)?;
        self.alphabet.to_symbol(self.permute(index))
    }

    /// Applies the inverse permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `symbol` is not in the alphabet.
    pub fn invert_symbol(&self, symbol: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.to_index(symbol)?;
        self.alphabet.to_symbol(self.invert(index))
    }

    /// Returns true iff no symbol maps to itself.
    pub fn is_derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &j)| i != j)
    }

    /// Returns the alphabet this permutation acts on.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the parsed cycles as index lists, in declaration order.
    pub fn cycles(&self) -> &[Vec<usize>] {
        &self.cycles
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, cycle) in self.cycles.iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "(")?;
            for &i in cycle {
                // Indices were validated against the alphabet at parse time.
                let ch = self.alphabet.to_symbol(i).map_err(|_| fmt::Error)?;
                write!(f, "{}", ch)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Scans cycle notation into index lists.
fn parse_cycles(notation: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>, EnigmaError> {
    let mut cycles: Vec<Vec<usize>> = Vec::new();
    let mut covered = vec![false; alphabet.size()];
    let mut current: Option<Vec<usize>> = None;

    for ch in notation.chars().filter(|c| !c.is_whitespace()) {
        match ch {
            '(' => {
                if current.is_some() {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "nested '(' in \"{}\"",
                        notation
                    )));
                }
                current = Some(Vec::new());
            }
            ')' => {
                let cycle = current.take().ok_or_else(|| {
                    EnigmaError::MalformedCycle(format!("unmatched ')' in \"{}\"", notation))
                })?;
                if cycle.is_empty() {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "empty cycle in \"{}\"",
                        notation
                    )));
                }
                cycles.push(cycle);
            }
            _ => {
                let cycle = current.as_mut().ok_or_else(|| {
                    EnigmaError::MalformedCycle(format!(
                        "symbol '{}' outside parentheses in \"{}\"",
                        ch, notation
                    ))
                })?;
                let index = alphabet.to_index(ch)?;
                if covered[index] {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "symbol '{}' appears more than once in \"{}\"",
                        ch, notation
                    )));
                }
                covered[index] = true;
                cycle.push(index);
            }
        }
    }

    if current.is_some() {
        return Err(EnigmaError::MalformedCycle(format!(
            "unclosed '(' in \"{}\"",
            notation
        )));
    }
    Ok(cycles)
}
