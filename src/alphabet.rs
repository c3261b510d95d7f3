//! Alphabet: bidirectional mapping between symbols and dense indices.

use std::collections::{HashMap, HashSet};

use crate::error::EnigmaError;

/// Symbols of the historical machines.
const DEFAULT_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Ordered set of unique symbols. The k-th symbol has index k.
///
/// Immutable after construction; shared between permutations, rotors and
/// the machine through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    indices: HashMap<char, usize>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::build(DEFAULT_SYMBOLS.chars().collect())
    }
}

impl Alphabet {
    /// Creates an alphabet from the symbols of `chars`, in order.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidAlphabet`] if a symbol is repeated or
    /// fewer than 2 symbols are given.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCD").unwrap();
    /// assert_eq!(alpha.size(), 4);
    /// assert!(Alphabet::new("ABA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self, EnigmaError> {
        let symbols: Vec<char> = chars.chars().collect();
        if symbols.len() < 2 {
            return Err(EnigmaError::InvalidAlphabet(format!(
                "needs at least 2 symbols, got {}",
                symbols.len()
            )));
        }
        let mut seen = HashSet::with_capacity(symbols.len());
        for &ch in &symbols {
            if !seen.insert(ch) {
                return Err(EnigmaError::InvalidAlphabet(format!(
                    "duplicate symbol '{}'",
                    ch
                )));
            }
        }
        Ok(Self::build(symbols))
    }

    fn build(symbols: Vec<char>) -> Self {
        let indices = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, indices }
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if `symbol` belongs to this alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.indices.contains_key(&symbol)
    }

    /// Returns the index of `symbol`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if the symbol is absent.
    pub fn to_index(&self, symbol: char) -> Result<usize, EnigmaError> {
        self.indices
            .get(&symbol)
            .copied()
            .ok_or(EnigmaError::InvalidSymbol(symbol))
    }

    /// Returns the symbol at `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] if `index >= size()`.
    pub fn to_symbol(&self, index: usize) -> Result<char, EnigmaError> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Returns the symbol at `index` taken modulo `size()`.
    pub fn symbol_at(&self, index: usize) -> char {
        self.symbols[index % self.symbols.len()]
    }

    /// Iterates over the symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}
