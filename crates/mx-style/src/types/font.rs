//! Font values.

/// Font weight keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Bolder,
    Lighter,
}

impl FontWeight {
    /// Parse a weight keyword; anything unrecognized is `Normal`.
    pub fn from_css(value: &str) -> Self {
        match value.trim() {
            "bold" => Self::Bold,
            "bolder" => Self::Bolder,
            "lighter" => Self::Lighter,
            _ => Self::Normal,
        }
    }

    /// The CSS keyword for this weight.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
            Self::Bolder => "bolder",
            Self::Lighter => "lighter",
        }
    }
}
