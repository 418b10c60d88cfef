//! Padding values.

use super::leading_int;

/// Space around a widget's content, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    /// Equal padding on every side.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Parse 1 to 4 space separated integers in CSS shorthand order.
    ///
    /// Each value is read up to its first non-digit, so `4px` is 4. Any other
    /// number of values gives zero padding.
    pub fn parse(value: &str) -> Self {
        let values: Vec<f32> = value
            .split_whitespace()
            .map(|v| leading_int(v).unwrap_or(0) as f32)
            .collect();

        match values[..] {
            [all] => Self::uniform(all),
            [vertical, horizontal] => Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            },
            [top, horizontal, bottom] => Self {
                top,
                right: horizontal,
                bottom,
                left: horizontal,
            },
            [top, right, bottom, left] => Self {
                top,
                right,
                bottom,
                left,
            },
            _ => Self::default(),
        }
    }

    /// Sum of the left and right padding.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom padding.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}
