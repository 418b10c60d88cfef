//! Style value types and their string parsers.

mod border_image;
mod color;
mod font;
mod padding;
mod value;

pub use border_image::BorderImage;
pub use color::Color;
pub use font::FontWeight;
pub use padding::Padding;
pub use value::StyleValue;

/// Read the integer at the start of `s`, C `atoi` style.
///
/// Leading whitespace and one sign are accepted; reading stops at the first
/// non-digit. Returns `None` if there are no digits at all. Out of range
/// values saturate.
pub(crate) fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}
