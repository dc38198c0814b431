//! String helpers shared by the text widgets.
//!
//! Indices are character indices, not byte offsets, so the helpers are safe
//! to call with any UTF-8 input.

use crate::error::{WidgetError, WidgetResult};

/// The standard Roman numeral table, largest value first.
pub const ROMAN_NUMERALS: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Largest number [`convert_to_roman`] accepts.
pub const MAX_ROMAN: u32 = 3999;

/// Surround `text` with `prefix` and `suffix`.
///
/// ```
/// use trellis::text::add_prefix_and_suffix;
///
/// assert_eq!(add_prefix_and_suffix("60", "fps: ", " Hz"), "fps: 60 Hz");
/// ```
pub fn add_prefix_and_suffix(text: &str, prefix: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + text.len() + suffix.len());
    out.push_str(prefix);
    out.push_str(text);
    out.push_str(suffix);
    out
}

/// Insert `addition` before the character at `index`.
///
/// An index past the end appends.
pub fn insert(text: &str, index: usize, addition: &str) -> String {
    let offset = byte_offset(text, index);
    let mut out = String::with_capacity(text.len() + addition.len());
    out.push_str(&text[..offset]);
    out.push_str(addition);
    out.push_str(&text[offset..]);
    out
}

/// Remove the characters in `start..end`.
///
/// Both bounds are clamped to the text; an empty or inverted range returns
/// the text unchanged.
pub fn delete(text: &str, start: usize, end: usize) -> String {
    if start >= end {
        return text.to_string();
    }
    let from = byte_offset(text, start);
    let to = byte_offset(text, end);
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..from]);
    out.push_str(&text[to..]);
    out
}

fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Convert `number` (1..=3999) to an uppercase Roman numeral.
pub fn convert_to_roman(number: u32) -> WidgetResult<String> {
    if !(1..=MAX_ROMAN).contains(&number) {
        return Err(WidgetError::OutOfRange {
            value: i64::from(number),
            min: 1,
            max: i64::from(MAX_ROMAN),
        });
    }
    convert_to_roman_with(number, &ROMAN_NUMERALS)
}

/// Convert `number` with a custom `(value, numeral)` table.
///
/// The table must be non-empty with strictly descending, non-zero values,
/// and must be able to represent `number` exactly.
pub fn convert_to_roman_with(number: u32, table: &[(u32, &str)]) -> WidgetResult<String> {
    if number == 0 {
        return Err(WidgetError::OutOfRange {
            value: 0,
            min: 1,
            max: i64::from(u32::MAX),
        });
    }
    if table.is_empty() {
        return Err(WidgetError::Lookup("numeral table is empty".into()));
    }
    if let Some((value, numeral)) = table.iter().find(|(value, _)| *value == 0) {
        return Err(WidgetError::Lookup(format!(
            "numeral `{numeral}` has value {value}"
        )));
    }
    if table.windows(2).any(|pair| pair[0].0 <= pair[1].0) {
        return Err(WidgetError::Lookup(
            "numeral values must be strictly descending".into(),
        ));
    }

    let mut remaining = number;
    let mut result = String::new();
    for &(value, numeral) in table {
        let count = remaining / value;
        result.push_str(&numeral.repeat(count as usize));
        remaining -= value * count;
    }
    if remaining != 0 {
        return Err(WidgetError::Lookup(format!(
            "table cannot represent the remainder {remaining} of {number}"
        )));
    }
    Ok(result)
}
