//! Typed style property values.

use super::{BorderImage, Color, FontWeight, Padding};

/// A resolved style property value.
///
/// The variant always matches the [`PropertyKind`](crate::style::PropertyKind)
/// of the property it was resolved for.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Int(i32),
    UInt(u32),
    Double(f64),
    Bool(bool),
    /// `None` for an unset string (`none` in a stylesheet).
    String(Option<String>),
    /// The numeric value of an enum nick.
    Enum(i32),
    Color(Color),
    BorderImage(BorderImage),
    FontWeight(FontWeight),
    Padding(Padding),
}

impl StyleValue {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The string value; `None` both for unset strings and other variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i32> {
        match self {
            Self::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_border_image(&self) -> Option<&BorderImage> {
        match self {
            Self::BorderImage(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_font_weight(&self) -> Option<FontWeight> {
        match self {
            Self::FontWeight(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_padding(&self) -> Option<Padding> {
        match self {
            Self::Padding(v) => Some(*v),
            _ => None,
        }
    }
}
