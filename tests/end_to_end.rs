//! Configuration, driver and command-line tests through the public API.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use enigma::config::parse_config;
use enigma::driver::process_messages;
use enigma::EnigmaError;

const NAVAL_CONFIG: &str = include_str!("data/naval.conf");
const TRIVIAL_IN: &str = include_str!("data/trivial.in");
const TRIVIAL_OUT: &str = include_str!("data/trivial.out");

fn enigma() -> Command {
    Command::new(env!("CARGO_BIN_EXE_enigma"))
}

// ═══════════════════════════════════════════════════════════════════════
// Configuration errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn alphabet_with_reserved_symbol_rejected() {
    let text = "AB*D\n2 1\nR R (AB) (*D)\nS MA (AB)\n";
    assert!(matches!(
        parse_config(text),
        Err(EnigmaError::InvalidAlphabet(_))
    ));
}

#[test]
fn rotor_with_unknown_type_rejected() {
    let text = "ABCD\n2 1\nR R (AB) (CD)\nS XA (AB)\n";
    assert!(matches!(
        parse_config(text),
        Err(EnigmaError::ConfigurationError(_))
    ));
}

#[test]
fn rotor_with_foreign_symbol_rejected() {
    let text = "ABCD\n2 1\nR R (AB) (CD)\nS MA (AE)\n";
    assert!(matches!(
        parse_config(text),
        Err(EnigmaError::InvalidSymbol('E'))
    ));
}

#[test]
fn reflector_with_fixed_point_rejected() {
    let text = "ABCD\n2 1\nR R (AB)\nS MA (AB)\n";
    assert!(matches!(
        parse_config(text).and_then(|config| config.build()),
        Err(EnigmaError::ConfigurationError(_))
    ));
}

#[test]
fn more_pawls_than_rotors_rejected() {
    let text = "ABCD\n2 3\nR R (AB) (CD)\nS MA (AB)\n";
    assert!(matches!(
        parse_config(text).and_then(|config| config.build()),
        Err(EnigmaError::ConfigurationError(_))
    ));
}

#[test]
fn pawl_in_every_slot_rejected() {
    let text = "ABCD\n3 3\nR R (AB) (CD)\nS MA (ABC)\nT MB (AD)\n";
    assert!(matches!(
        parse_config(text).and_then(|config| config.build()),
        Err(EnigmaError::ConfigurationError(_))
    ));

    let text = "ABCD\n1 1\nR R (AB) (CD)\n";
    assert!(matches!(
        parse_config(text).and_then(|config| config.build()),
        Err(EnigmaError::ConfigurationError(_))
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Setting errors
// ═══════════════════════════════════════════════════════════════════════

fn run(input: &str) -> Result<String, EnigmaError> {
    let mut machine = parse_config(NAVAL_CONFIG).unwrap().build().unwrap();
    process_messages(&mut machine, input)
}

#[test]
fn setting_with_unknown_rotor() {
    assert!(matches!(
        run("* B Beta III IV IX AXLE\nHELLO\n"),
        Err(EnigmaError::ConfigurationError(_))
    ));
}

#[test]
fn setting_with_misplaced_reflector() {
    assert!(matches!(
        run("* Beta B III IV I AXLE\nHELLO\n"),
        Err(EnigmaError::ConfigurationError(_))
    ));
}

#[test]
fn setting_with_non_moving_rotor_in_pawl_slot() {
    assert!(matches!(
        run("* B III Beta IV I AXLE\nHELLO\n"),
        Err(EnigmaError::ConfigurationError(_))
    ));
}

#[test]
fn setting_with_repeated_rotor() {
    assert!(matches!(
        run("* B Beta I I I AXLE\nHELLO\n"),
        Err(EnigmaError::ConfigurationError(_))
    ));
}

#[test]
fn setting_with_bad_position_symbol() {
    assert_eq!(
        run("* B Beta III IV I AX1E\nHELLO\n"),
        Err(EnigmaError::InvalidSymbol('1'))
    );
}

#[test]
fn setting_with_bad_plugboard() {
    assert!(matches!(
        run("* B Beta III IV I AXLE (HQ) (HX)\nHELLO\n"),
        Err(EnigmaError::MalformedCycle(_))
    ));
}

#[test]
fn setting_with_ring_values() {
    let out = run("* B Beta III IV I AXLE BCDE (HQ) (EX) (IP) (TR) (BY)\nHELLO WORLD\n").unwrap();
    assert_eq!(out, "TPUEM RRCIT\n");
}

// ═══════════════════════════════════════════════════════════════════════
// Command line
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn cli_files_in_and_out() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("naval.conf");
    let input = dir.path().join("trivial.in");
    let output = dir.path().join("trivial.out");
    fs::write(&config, NAVAL_CONFIG).unwrap();
    fs::write(&input, TRIVIAL_IN).unwrap();

    let status = enigma()
        .arg(&config)
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read_to_string(&output).unwrap(), TRIVIAL_OUT);
}

#[test]
fn cli_stdin_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("naval.conf");
    fs::write(&config, NAVAL_CONFIG).unwrap();

    let mut child = enigma()
        .arg(&config)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(TRIVIAL_IN.as_bytes())
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), TRIVIAL_OUT);
}

#[test]
fn cli_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = enigma()
        .arg(dir.path().join("missing.conf"))
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("Error:"));
}

#[test]
fn cli_bad_message_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("naval.conf");
    let input = dir.path().join("bad.in");
    fs::write(&config, NAVAL_CONFIG).unwrap();
    fs::write(&input, "HELLO\n").unwrap();

    let out = enigma().arg(&config).arg(&input).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("setting"));
}
