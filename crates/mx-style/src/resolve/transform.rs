//! Conversion of raw declaration text into typed values.

use crate::rules::DeclarationValue;
use crate::style::{PropertyKind, StyleProperty};
use crate::types::{BorderImage, Color, FontWeight, Padding, StyleValue, leading_int};

/// Map a property name to the name used in stylesheets.
///
/// Vendor properties are declared as `x-mx-foo` but written `-mx-foo` in
/// CSS, so only the leading `x` is dropped.
pub fn normalize_property_name(name: &str) -> &str {
    if name.starts_with("x-mx") { &name[1..] } else { name }
}

/// Convert a declaration into a value of the property's kind.
///
/// Never fails: a value that cannot be converted is logged and replaced by
/// the kind's zero value (or the property default, for enums).
pub fn transform_value(
    declaration: &DeclarationValue,
    property: &StyleProperty,
    type_name: &str,
    resolution: f64,
) -> StyleValue {
    let raw = declaration.as_str();

    if let Some(parse_fn) = property.parse_fn {
        return parse_fn(declaration).unwrap_or_else(|| {
            warn_untransformable(property, type_name, raw);
            property.kind.zero_value()
        });
    }

    match property.kind {
        PropertyKind::Int => {
            let mut number = leading_int(raw).unwrap_or(0);
            if property.name == "font-size" && raw.ends_with("pt") {
                number = (number as f64 * resolution / 72.0).round() as i64;
            }
            StyleValue::Int(number.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        }
        PropertyKind::UInt => {
            let number = leading_int(raw).unwrap_or(0);
            StyleValue::UInt(number.clamp(0, u32::MAX as i64) as u32)
        }
        PropertyKind::BorderImage => {
            let image = BorderImage::parse(raw, declaration.source_dir()).unwrap_or_else(|| {
                tracing::warn!("Could not parse border image from \"{}\"", raw);
                BorderImage::default()
            });
            StyleValue::BorderImage(image)
        }
        PropertyKind::FontWeight => StyleValue::FontWeight(FontWeight::from_css(raw)),
        PropertyKind::String => {
            if raw == "none" {
                StyleValue::String(None)
            } else {
                StyleValue::String(Some(strip_quotes(raw).to_string()))
            }
        }
        PropertyKind::Enum(_) => match property.kind.enum_value(raw) {
            Some(value) => StyleValue::Enum(value),
            None => {
                warn_untransformable(property, type_name, raw);
                property.default.clone()
            }
        },
        PropertyKind::Color => match Color::parse(raw) {
            Some(color) => StyleValue::Color(color),
            None => fallback(property, type_name, raw),
        },
        PropertyKind::Padding => StyleValue::Padding(Padding::parse(raw)),
        PropertyKind::Bool => match raw {
            "true" | "TRUE" | "1" => StyleValue::Bool(true),
            "false" | "FALSE" | "0" => StyleValue::Bool(false),
            _ => fallback(property, type_name, raw),
        },
        PropertyKind::Double => match raw.parse::<f64>() {
            Ok(value) => StyleValue::Double(value),
            Err(_) => fallback(property, type_name, raw),
        },
    }
}

/// Remove one layer of matching single or double quotes.
fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2
            && let Some(inner) = raw.strip_prefix(quote).and_then(|s| s.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}

fn fallback(property: &StyleProperty, type_name: &str, raw: &str) -> StyleValue {
    warn_untransformable(property, type_name, raw);
    property.kind.zero_value()
}

fn warn_untransformable(property: &StyleProperty, type_name: &str, raw: &str) {
    tracing::warn!(
        "Error setting property \"{}\" on \"{}\", could not transform \"{}\" from string to type {}",
        property.name,
        type_name,
        raw,
        property.kind.type_name()
    );
}
