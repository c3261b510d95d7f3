//! Machine configuration files.
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ          alphabet
//! 5 3                                 rotor slots, pawls
//! I MQ    (AELTPHQXRU) (BKNW) ...     name, type+notches, cycles
//! Beta N  (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B R     (AE) (BN) (CK) ...
//! ```
//!
//! The type token starts with `M` (moving, followed by its notches), `N`
//! (fixed) or `R` (reflector).

use std::iter::Peekable;
use std::str::{FromStr, SplitWhitespace};
use std::sync::Arc;

use log::debug;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Characters reserved by the configuration and setting-line grammars.
const RESERVED: [char; 3] = ['*', '(', ')'];

/// Parsed contents of a configuration file.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub alphabet: Arc<Alphabet>,
    pub num_rotors: usize,
    pub num_pawls: usize,
    pub rotors: Vec<Rotor>,
}

impl MachineConfig {
    /// Builds a machine with no rotors inserted.
    ///
    /// # Errors
    /// Returns [`EnigmaError::ConfigurationError`] for invalid slot or pawl
    /// counts (see [`Machine::new`]).
    pub fn build(self) -> Result<Machine, EnigmaError> {
        Machine::new(self.alphabet, self.num_rotors, self.num_pawls, self.rotors)
    }
}

impl FromStr for MachineConfig {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_config(s)
    }
}

/// Parses a configuration file.
///
/// # Errors
/// - [`EnigmaError::InvalidAlphabet`] for a bad alphabet line.
/// - [`EnigmaError::ConfigurationError`] for missing or malformed counts,
///   unknown rotor types, incomplete rotor descriptors, or bad notches.
/// - [`EnigmaError::MalformedCycle`] / [`EnigmaError::InvalidSymbol`] for bad
///   rotor wiring.
///
/// # Examples
///
/// ```
/// use enigma::config::parse_config;
///
/// let config = parse_config("ABCD\n2 1\nR R (AB) (CD)\nS MA (ABC)\n").unwrap();
/// assert_eq!(config.rotors.len(), 2);
/// let mut machine = config.build().unwrap();
/// machine.insert_rotors(&["R", "S"]).unwrap();
/// ```
pub fn parse_config(text: &str) -> Result<MachineConfig, EnigmaError> {
    let text = text.trim_start();
    let (alphabet_line, rest) = text.split_once('\n').unwrap_or((text, ""));
    let alphabet = Arc::new(parse_alphabet(alphabet_line.trim_end())?);

    let mut tokens = rest.split_whitespace().peekable();
    let num_rotors = parse_count(tokens.next(), "number of rotor slots")?;
    let num_pawls = parse_count(tokens.next(), "number of pawls")?;

    let mut rotors = Vec::new();
    while tokens.peek().is_some() {
        rotors.push(parse_rotor(&mut tokens, &alphabet)?);
    }
    debug!(
        "configuration parsed: {} symbols, {} slots, {} pawls, {} rotors",
        alphabet.size(),
        num_rotors,
        num_pawls,
        rotors.len()
    );

    Ok(MachineConfig {
        alphabet,
        num_rotors,
        num_pawls,
        rotors,
    })
}

fn parse_alphabet(line: &str) -> Result<Alphabet, EnigmaError> {
    if let Some(ch) = line
        .chars()
        .find(|c| c.is_whitespace() || RESERVED.contains(c))
    {
        return Err(EnigmaError::InvalidAlphabet(format!(
            "alphabet may not contain {:?}",
            ch
        )));
    }
    Alphabet::new(line)
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize, EnigmaError> {
    let token = token.ok_or_else(|| {
        EnigmaError::config(format!("configuration file truncated: missing {}", what))
    })?;
    token
        .parse()
        .map_err(|_| EnigmaError::config(format!("invalid {}: {:?}", what, token)))
}

fn parse_rotor(
    tokens: &mut Peekable<SplitWhitespace<'_>>,
    alphabet: &Arc<Alphabet>,
) -> Result<Rotor, EnigmaError> {
    let name = tokens
        .next()
        .ok_or_else(|| EnigmaError::config("bad rotor description"))?;
    if name.starts_with('(') {
        return Err(EnigmaError::config(format!(
            "cycle {} does not follow a rotor name and type",
            name
        )));
    }
    let type_token = tokens
        .next()
        .filter(|t| !t.starts_with('('))
        .ok_or_else(|| EnigmaError::config(format!("bad rotor description for {}", name)))?;

    let mut cycles = String::new();
    let mut depth = 0i64;
    while let Some(&token) = tokens.peek() {
        if depth == 0 && !token.starts_with('(') {
            break;
        }
        depth += token.matches('(').count() as i64 - token.matches(')').count() as i64;
        cycles.push_str(token);
        cycles.push(' ');
        tokens.next();
    }
    let permutation = Permutation::new(&cycles, alphabet.clone())?;

    let mut chars = type_token.chars();
    let kind = chars.next();
    let notches = chars.as_str();
    match kind {
        Some('M') => Rotor::stepping(name, permutation, notches),
        Some('N') if notches.is_empty() => Ok(Rotor::fixed(name, permutation)),
        Some('R') if notches.is_empty() => Rotor::reflecting(name, permutation),
        Some('N') | Some('R') => Err(EnigmaError::config(format!(
            "Rotor {} cannot have notches",
            name
        ))),
        _ => Err(EnigmaError::config(format!(
            "Rotor type of {} is incorrect: {:?}",
            name, type_token
        ))),
    }
}
