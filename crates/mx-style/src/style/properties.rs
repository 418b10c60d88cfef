//! Style property manifests.
//!
//! A stylable widget type declares the style properties it reads, each with a
//! kind, a default value and optionally a custom parser. The style engine
//! consults the manifest to turn raw declaration text into typed values.

use crate::rules::DeclarationValue;
use crate::types::{BorderImage, Color, FontWeight, Padding, StyleValue};

/// One accepted nick of an enum property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumNick {
    pub nick: &'static str,
    pub value: i32,
}

impl EnumNick {
    pub const fn new(nick: &'static str, value: i32) -> Self {
        Self { nick, value }
    }
}

/// The value type a style property resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Int,
    UInt,
    Double,
    Bool,
    String,
    /// An enum with its accepted nicks.
    Enum(&'static [EnumNick]),
    Color,
    BorderImage,
    FontWeight,
    Padding,
}

impl PropertyKind {
    /// The value used when a declaration cannot be converted.
    pub fn zero_value(&self) -> StyleValue {
        match self {
            Self::Int => StyleValue::Int(0),
            Self::UInt => StyleValue::UInt(0),
            Self::Double => StyleValue::Double(0.0),
            Self::Bool => StyleValue::Bool(false),
            Self::String => StyleValue::String(None),
            Self::Enum(_) => StyleValue::Enum(0),
            Self::Color => StyleValue::Color(Color::TRANSPARENT),
            Self::BorderImage => StyleValue::BorderImage(BorderImage::default()),
            Self::FontWeight => StyleValue::FontWeight(FontWeight::Normal),
            Self::Padding => StyleValue::Padding(Padding::default()),
        }
    }

    /// Type name used in log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Double => "double",
            Self::Bool => "boolean",
            Self::String => "string",
            Self::Enum(_) => "enum",
            Self::Color => "color",
            Self::BorderImage => "border-image",
            Self::FontWeight => "font-weight",
            Self::Padding => "padding",
        }
    }

    /// Look up an enum nick.
    pub fn enum_value(&self, nick: &str) -> Option<i32> {
        match self {
            Self::Enum(nicks) => nicks.iter().find(|n| n.nick == nick).map(|n| n.value),
            _ => None,
        }
    }
}

/// Custom conversion from raw declaration text. `None` means "could not parse".
pub type ParseFn = fn(&DeclarationValue) -> Option<StyleValue>;

/// A style property declared by a stylable widget type.
#[derive(Debug, Clone)]
pub struct StyleProperty {
    /// Property name. Vendor properties use an `x-mx-` prefix, which
    /// stylesheets spell `-mx-`.
    pub name: &'static str,
    pub kind: PropertyKind,
    /// Value used when no rule sets the property.
    pub default: StyleValue,
    /// Overrides the built-in conversion for `kind`.
    pub parse_fn: Option<ParseFn>,
}

impl StyleProperty {
    /// Create a property.
    pub fn new(name: &'static str, kind: PropertyKind, default: StyleValue) -> Self {
        Self {
            name,
            kind,
            default,
            parse_fn: None,
        }
    }

    /// Use a custom parser instead of the built-in conversion.
    pub fn with_parser(mut self, parse_fn: ParseFn) -> Self {
        self.parse_fn = Some(parse_fn);
        self
    }
}

/// The style properties of one stylable widget type.
#[derive(Debug, Clone, Default)]
pub struct PropertyManifest {
    properties: Vec<StyleProperty>,
}

impl PropertyManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// The properties every widget has.
    pub fn widget() -> Self {
        Self::new()
            .with(StyleProperty::new(
                "background-color",
                PropertyKind::Color,
                StyleValue::Color(Color::from_rgba8(255, 255, 255, 0)),
            ))
            .with(StyleProperty::new(
                "color",
                PropertyKind::Color,
                StyleValue::Color(Color::BLACK),
            ))
            .with(StyleProperty::new(
                "background-image",
                PropertyKind::BorderImage,
                StyleValue::BorderImage(BorderImage::default()),
            ))
            .with(StyleProperty::new(
                "font-family",
                PropertyKind::String,
                StyleValue::String(Some("Sans".to_string())),
            ))
            .with(StyleProperty::new("font-size", PropertyKind::Int, StyleValue::Int(12)))
            .with(StyleProperty::new(
                "font-weight",
                PropertyKind::FontWeight,
                StyleValue::FontWeight(FontWeight::Normal),
            ))
            .with(StyleProperty::new(
                "border-image",
                PropertyKind::BorderImage,
                StyleValue::BorderImage(BorderImage::default()),
            ))
            .with(StyleProperty::new(
                "padding",
                PropertyKind::Padding,
                StyleValue::Padding(Padding::default()),
            ))
            .with(StyleProperty::new(
                "x-mx-border-image-transition-duration",
                PropertyKind::UInt,
                StyleValue::UInt(0),
            ))
    }

    /// Add a property, replacing one with the same name.
    pub fn with(mut self, property: StyleProperty) -> Self {
        self.insert(property);
        self
    }

    /// Add a property, replacing one with the same name.
    pub fn insert(&mut self, property: StyleProperty) {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }

    /// Find a property by name.
    pub fn find(&self, name: &str) -> Option<&StyleProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Iterate over properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleProperty> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIGN: &[EnumNick] = &[
        EnumNick::new("start", 0),
        EnumNick::new("middle", 1),
        EnumNick::new("end", 2),
    ];

    #[test]
    fn widget_manifest_defaults() {
        let manifest = PropertyManifest::widget();
        assert_eq!(manifest.len(), 9);

        let font_size = manifest.find("font-size").unwrap();
        assert_eq!(font_size.kind, PropertyKind::Int);
        assert_eq!(font_size.default, StyleValue::Int(12));

        let family = manifest.find("font-family").unwrap();
        assert_eq!(family.default.as_str(), Some("Sans"));

        let color = manifest.find("color").unwrap();
        assert_eq!(color.default.as_color(), Some(Color::BLACK));

        assert!(manifest.find("x-mx-border-image-transition-duration").is_some());
        assert!(manifest.find("margin").is_none());
    }

    #[test]
    fn insert_replaces_by_name() {
        let manifest = PropertyManifest::widget()
            .with(StyleProperty::new("font-size", PropertyKind::Int, StyleValue::Int(9)));

        assert_eq!(manifest.len(), 9);
        assert_eq!(manifest.find("font-size").unwrap().default, StyleValue::Int(9));
    }

    #[test]
    fn enum_nicks() {
        let kind = PropertyKind::Enum(ALIGN);
        assert_eq!(kind.enum_value("middle"), Some(1));
        assert_eq!(kind.enum_value("center"), None);
        assert_eq!(PropertyKind::Int.enum_value("middle"), None);
        assert_eq!(kind.zero_value(), StyleValue::Enum(0));
    }
}
