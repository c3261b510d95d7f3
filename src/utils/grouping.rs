//! Message grouping and whitespace utilities.
//!
//! Converted messages are printed in fixed groups of symbols separated by a
//! single space, the way the historical operators transmitted them.

/// Number of symbols per output group.
pub const GROUP_SIZE: usize = 5;

/// Splits `text` into groups of `size` symbols joined by single spaces.
/// The last group may be shorter. A `size` of 0 returns `text` unchanged.
///
/// # Examples
///
/// ```
/// use enigma::utils::grouping::group_symbols;
///
/// assert_eq!(group_symbols("QVPQSOKOILPU", 5), "QVPQS OKOIL PU");
/// ```
pub fn group_symbols(text: &str, size: usize) -> String {
    if size == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + text.len() / size);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 && i % size == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Removes all whitespace from `line`.
pub fn strip_whitespace(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace()).collect()
}
