//! Border image values.

use std::path::{Path, PathBuf};

use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};

/// A nine-slice image: a source image and the widths of its four edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderImage {
    /// The image file; `None` for `border-image: none`.
    pub uri: Option<PathBuf>,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl BorderImage {
    /// Parse `none` or `url(<path>) top [right [bottom [left]]]`.
    ///
    /// Relative paths are resolved against `base_dir`, the directory of the
    /// stylesheet the value came from. Returns `None` if the value is
    /// malformed.
    pub fn parse(value: &str, base_dir: Option<&Path>) -> Option<Self> {
        let value = value.trim();
        if value == "none" {
            return Some(Self::default());
        }

        let mut input = ParserInput::new(value);
        let mut parser = Parser::new(&mut input);
        let (url, slices) = parser
            .parse_entirely(|p| {
                let url = p.expect_url()?.to_string();
                let mut slices = Vec::with_capacity(4);
                while slices.len() < 4 && !p.is_exhausted() {
                    slices.push(parse_slice(p)?);
                }
                Ok::<_, CssParseError<'_, ()>>((url, slices))
            })
            .ok()?;

        let path = PathBuf::from(url);
        let uri = match base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        };

        let (top, right, bottom, left) = match slices[..] {
            [all] => (all, all, all, all),
            [vertical, horizontal] => (vertical, horizontal, vertical, horizontal),
            [top, horizontal, bottom] => (top, horizontal, bottom, horizontal),
            [top, right, bottom, left] => (top, right, bottom, left),
            // At least the top width is required.
            _ => return None,
        };

        Some(Self {
            uri: Some(uri),
            top,
            right,
            bottom,
            left,
        })
    }

    /// Returns `true` if there is no image.
    pub fn is_none(&self) -> bool {
        self.uri.is_none()
    }
}

/// An edge width; a unit suffix such as `px` is ignored.
fn parse_slice<'i>(parser: &mut Parser<'i, '_>) -> Result<i32, CssParseError<'i, ()>> {
    match parser.next()? {
        Token::Number {
            int_value: Some(v), ..
        }
        | Token::Dimension {
            int_value: Some(v), ..
        } => Ok(*v),
        _ => Err(parser.new_custom_error(())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_empty() {
        let image = BorderImage::parse("none", None).unwrap();
        assert!(image.is_none());
        assert_eq!(image, BorderImage::default());
    }

    #[test]
    fn slice_shorthand() {
        let image = BorderImage::parse("url(a.png) 5", None).unwrap();
        assert_eq!((image.top, image.right, image.bottom, image.left), (5, 5, 5, 5));

        let image = BorderImage::parse("url(a.png) 5 10", None).unwrap();
        assert_eq!((image.top, image.right, image.bottom, image.left), (5, 10, 5, 10));

        let image = BorderImage::parse("url(a.png) 1 2 3", None).unwrap();
        assert_eq!((image.top, image.right, image.bottom, image.left), (1, 2, 3, 2));

        let image = BorderImage::parse("url('a.png') 1 2 3 4", None).unwrap();
        assert_eq!((image.top, image.right, image.bottom, image.left), (1, 2, 3, 4));
    }

    #[test]
    fn relative_paths_use_the_stylesheet_dir() {
        let image = BorderImage::parse("url(\"button.png\") 4px", Some(Path::new("/themes/mx"))).unwrap();
        assert_eq!(image.uri.as_deref(), Some(Path::new("/themes/mx/button.png")));
        assert_eq!(image.left, 4);

        let image = BorderImage::parse("url(/abs/button.png) 4", Some(Path::new("/themes/mx"))).unwrap();
        assert_eq!(image.uri.as_deref(), Some(Path::new("/abs/button.png")));
    }

    #[test]
    fn malformed_values() {
        assert_eq!(BorderImage::parse("button.png 4", None), None);
        assert_eq!(BorderImage::parse("url(a.png) x", None), None);
        assert_eq!(BorderImage::parse("url(a.png) 1 2 3 4 5", None), None);
        assert_eq!(BorderImage::parse("url(a.png)", None), None);
    }
}
