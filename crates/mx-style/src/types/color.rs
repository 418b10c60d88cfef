//! Color values.

use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};

/// An 8-bit per channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::from_rgba8(0, 0, 0, 0);
    pub const BLACK: Self = Self::from_rgba8(0, 0, 0, 255);
    pub const WHITE: Self = Self::from_rgba8(255, 255, 255, 255);

    /// Create a color from its channels.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let channel = |i: usize, width: usize| -> Option<u8> {
            let v = u8::from_str_radix(&hex[i * width..(i + 1) * width], 16).ok()?;
            // Short form: `f` means `ff`.
            Some(if width == 1 { v * 17 } else { v })
        };

        match hex.len() {
            3 => Some(Self::from_rgb8(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            4 => Some(Self::from_rgba8(
                channel(0, 1)?,
                channel(1, 1)?,
                channel(2, 1)?,
                channel(3, 1)?,
            )),
            6 => Some(Self::from_rgb8(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
            8 => Some(Self::from_rgba8(
                channel(0, 2)?,
                channel(1, 2)?,
                channel(2, 2)?,
                channel(3, 2)?,
            )),
            _ => None,
        }
    }

    /// Look up a color keyword.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::from_rgb8(255, 0, 0),
            "green" => Self::from_rgb8(0, 128, 0),
            "lime" => Self::from_rgb8(0, 255, 0),
            "blue" => Self::from_rgb8(0, 0, 255),
            "yellow" => Self::from_rgb8(255, 255, 0),
            "cyan" | "aqua" => Self::from_rgb8(0, 255, 255),
            "magenta" | "fuchsia" => Self::from_rgb8(255, 0, 255),
            "gray" | "grey" => Self::from_rgb8(128, 128, 128),
            "silver" => Self::from_rgb8(192, 192, 192),
            "maroon" => Self::from_rgb8(128, 0, 0),
            "olive" => Self::from_rgb8(128, 128, 0),
            "navy" => Self::from_rgb8(0, 0, 128),
            "teal" => Self::from_rgb8(0, 128, 128),
            "purple" => Self::from_rgb8(128, 0, 128),
            "orange" => Self::from_rgb8(255, 165, 0),
            "pink" => Self::from_rgb8(255, 192, 203),
            "brown" => Self::from_rgb8(165, 42, 42),
            "crimson" => Self::from_rgb8(220, 20, 60),
            _ => return None,
        };
        Some(color)
    }

    /// Parse a declaration value: hex, `rgb()`, `rgba()` or a keyword.
    pub fn parse(value: &str) -> Option<Self> {
        let mut input = ParserInput::new(value);
        let mut parser = Parser::new(&mut input);
        parser
            .parse_entirely(|p| parse_color(p))
            .ok()
    }
}

fn parse_color<'i>(parser: &mut Parser<'i, '_>) -> Result<Color, CssParseError<'i, ()>> {
    let token = parser.next()?.clone();

    match token {
        Token::Hash(hash) | Token::IDHash(hash) => {
            Color::from_hex(&hash).ok_or_else(|| parser.new_custom_error(()))
        }
        Token::Ident(name) => Color::from_name(&name).ok_or_else(|| parser.new_custom_error(())),
        Token::Function(name)
            if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
        {
            parser.parse_nested_block(|p| {
                let r = parse_color_component(p)?;
                p.expect_comma()?;
                let g = parse_color_component(p)?;
                p.expect_comma()?;
                let b = parse_color_component(p)?;
                let a = if p.try_parse(|p| p.expect_comma()).is_ok() {
                    parse_alpha_component(p)?
                } else {
                    255
                };
                Ok::<_, CssParseError<'_, ()>>(Color::from_rgba8(r, g, b, a))
            })
        }
        _ => Err(parser.new_custom_error(())),
    }
}

fn parse_color_component<'i>(parser: &mut Parser<'i, '_>) -> Result<u8, CssParseError<'i, ()>> {
    match parser.next()? {
        Token::Number { value, .. } => Ok(value.round().clamp(0.0, 255.0) as u8),
        Token::Percentage { unit_value, .. } => Ok((unit_value * 255.0).round().clamp(0.0, 255.0) as u8),
        _ => Err(parser.new_custom_error(())),
    }
}

fn parse_alpha_component<'i>(parser: &mut Parser<'i, '_>) -> Result<u8, CssParseError<'i, ()>> {
    let alpha = match parser.next()? {
        Token::Number { value, .. } => *value,
        Token::Percentage { unit_value, .. } => *unit_value,
        _ => return Err(parser.new_custom_error(())),
    };
    Ok((alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}
