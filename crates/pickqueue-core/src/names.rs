//! Member name normalization
//!
//! Names are stored in title case. Lookups compare normalized forms, so
//! `"sarah johnson"`, `"SARAH  Johnson"` and `"Sarah Johnson"` all refer to
//! the same member.

use crate::errors::{QueueError, Result};

/// Normalize a raw name for storage and lookup.
///
/// Trims, collapses internal whitespace runs to a single space, and title-cases.
///
/// # Errors
///
/// Returns `InvalidName` if nothing but whitespace was supplied.
pub fn normalize_name(raw: &str) -> Result<String> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.is_empty() {
        return Err(QueueError::InvalidName {
            name: raw.to_string(),
        });
    }
    Ok(title_case(&words.join(" ")))
}

/// Title-case a string.
///
/// A letter is uppercased when the character before it is not a letter and
/// lowercased otherwise, so `o'brien` becomes `O'Brien`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Case-insensitive equality on normalized names
pub fn same_member(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
