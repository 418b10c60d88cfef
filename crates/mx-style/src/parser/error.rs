//! CSS parsing errors.

use cssparser::{BasicParseErrorKind, ParseErrorKind};

/// CSS parse error with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The error message describing what went wrong.
    pub message: String,
    /// Line number where the error occurred (1-indexed).
    pub line: u32,
    /// Column number where the error occurred (1-indexed).
    pub column: u32,
}

impl ParseError {
    /// Create a new parse error with the given message and location.
    pub fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CSS parse error at {}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Grammar violations reported by the stylesheet parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum SyntaxError {
    #[error("expected a selector before '{{'")]
    EmptySelector,
    #[error("'{0}' must follow a selector")]
    DanglingCombinator(char),
    #[error("expected a name after '{0}'")]
    ExpectedName(char),
    #[error("unhandled selector token")]
    UnhandledSelector,
    #[error("expected '{{' after selector")]
    ExpectedBlock,
    #[error("expected a property name")]
    ExpectedPropertyName,
    #[error("expected ':' after property name")]
    ExpectedColon,
    #[error("expected ';' after property value")]
    ExpectedSemicolon,
}

impl<'i> From<cssparser::ParseError<'i, SyntaxError>> for ParseError {
    fn from(error: cssparser::ParseError<'i, SyntaxError>) -> Self {
        let message = match error.kind {
            ParseErrorKind::Custom(syntax) => syntax.to_string(),
            ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
                format!("unexpected token {:?}", token)
            }
            ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
                "unexpected end of input".to_string()
            }
            ParseErrorKind::Basic(other) => format!("{:?}", other),
        };
        // cssparser lines are 0-based, columns 1-based.
        Self::new(message, error.location.line + 1, error.location.column)
    }
}
