//! Enigma rotor cipher machine simulator.
//!
//! Encodes and decodes text by passing each symbol through a plugboard, a
//! chain of substitution rotors, and a reflector, stepping the rotors
//! between symbols. The stepping logic reproduces the double step of the
//! historical machines, so ciphertext matches the published naval vectors.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbols <-> dense indices)
//!     ↓ shared by
//! Permutation  (cycle notation, forward and inverse tables)
//!     ↓ wired into
//! Rotor        (fixed | stepping | reflecting, position and ring offsets)
//!     ↓ pooled in a RotorArena, selected into slots of
//! Machine      (stepping decision, plugboard, forward and backward passes)
//! ```
//!
//! [`config`], [`setting`] and [`driver`] read the text formats used to
//! describe machines and message batches; the `enigma` binary wires them to
//! files.
//!
//! # Examples
//!
//! Encrypt and decrypt with the same setting:
//!
//! ```
//! use enigma::config::parse_config;
//!
//! let config = "ABCDEFGHIJKLMNOPQRSTUVWXYZ
//!  5 3
//!  III MV  (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//!  IV MJ   (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
//!  I MQ    (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  Beta N  (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R     (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)";
//!
//! let mut machine = parse_config(config).unwrap().build().unwrap();
//! machine.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
//!
//! machine.set_positions("AXLE").unwrap();
//! let cipher = machine.convert("HELLOWORLD").unwrap();
//!
//! machine.set_positions("AXLE").unwrap();
//! assert_eq!(machine.convert(&cipher).unwrap(), "HELLOWORLD");
//! ```
//!
//! Build the components by hand:
//!
//! ```
//! use std::sync::Arc;
//! use enigma::{Alphabet, Permutation};
//!
//! let alpha = Arc::new(Alphabet::default());
//! let plugboard = Permutation::new("(HQ) (EX) (IP) (TR) (BY)", alpha).unwrap();
//! assert_eq!(plugboard.permute_symbol('H').unwrap(), 'Q');
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod driver;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod setting;
pub mod utils;

pub use alphabet::Alphabet;
pub use error::EnigmaError;
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorArena, RotorId, RotorKind};
