//! Prefix encoding for UUID-keyed tables.

use crate::StoreError;

const UUID_LEN: usize = 36;
/// Hex offsets at which a canonical UUID carries a hyphen.
const HYPHEN_AT: [usize; 4] = [8, 12, 16, 20];

/// Validate a UUID prefix and rewrite it into canonical (lowercase,
/// hyphenated) form so it can be matched against stored ids as a plain string
/// prefix. Hyphens in the input are ignored; the remaining hex digits must
/// form whole bytes.
pub fn uuid_prefix(prefix: &str) -> Result<String, StoreError> {
    if prefix.len() > UUID_LEN {
        return Err(StoreError::TooLong(prefix.len()));
    }
    let hyphens = prefix.matches('-').count();
    if hyphens > HYPHEN_AT.len() {
        return Err(StoreError::TooManyHyphens(hyphens));
    }
    let hex: Vec<char> = prefix.chars().filter(|c| *c != '-').collect();
    if hex.len() % 2 != 0 {
        return Err(StoreError::OddLength);
    }
    if let Some(bad) = hex.iter().find(|c| !c.is_ascii_hexdigit()) {
        return Err(StoreError::InvalidEncoding(*bad));
    }

    let mut out = String::with_capacity(hex.len() + HYPHEN_AT.len());
    for (i, c) in hex.iter().enumerate() {
        if HYPHEN_AT.contains(&i) {
            out.push('-');
        }
        out.push(c.to_ascii_lowercase());
    }
    Ok(out)
}
