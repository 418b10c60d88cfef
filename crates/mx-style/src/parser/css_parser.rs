//! CSS syntax parser using the `cssparser` crate.
//!
//! The accepted language is a small subset of CSS:
//!
//! ```text
//! stylesheet  := rule*
//! rule        := selectors '{' declaration* '}'
//! selectors   := chain (',' chain)*
//! chain       := compound ((S | '>') compound)*
//! compound    := (type | '*')? ('#' id | '.' class | ':' pseudo)*
//! declaration := name ':' value ';'
//! ```
//!
//! Declaration values are kept as trimmed source text without comments.
//! Parsing stops at the first malformed rule; that rule is dropped and every
//! earlier rule is kept.

use std::path::Path;
use std::sync::Arc;

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, Token};

use super::ParseError;
use super::error::SyntaxError;
use crate::rules::{DeclarationTable, DeclarationValue};
use crate::selector::{Combinator, Selector, SelectorArena, SelectorId, TypeSelector};

type RuleResult<'i, T> = Result<T, CssParseError<'i, SyntaxError>>;

/// One successfully parsed rule.
#[derive(Debug, Clone)]
pub struct ParsedRule {
    /// The rightmost selector of each chain in the rule's selector list.
    pub selectors: Vec<SelectorId>,
    /// The declaration block shared by those selectors.
    pub declarations: Arc<DeclarationTable>,
}

/// Result of parsing a stylesheet.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Rules parsed before parsing stopped, in source order.
    pub rules: Vec<ParsedRule>,
    /// The error that stopped parsing, if any.
    pub error: Option<ParseError>,
}

impl ParseOutcome {
    /// Convert into a `Result`, discarding the partial rules on error.
    pub fn into_result(self) -> Result<Vec<ParsedRule>, ParseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.rules),
        }
    }
}

/// Parse a CSS stylesheet into `arena`.
///
/// Selectors are pushed into the arena; every declaration value records
/// `origin` as its source. On a grammar error the selectors of the failing
/// rule are removed from the arena again and the error is returned alongside
/// the rules that were parsed before it.
///
/// # Example
///
/// ```
/// use mx_style::parser::parse_css;
/// use mx_style::selector::SelectorArena;
///
/// let mut arena = SelectorArena::new();
/// let outcome = parse_css("Button, Label { color: red; }", None, &mut arena);
/// assert!(outcome.error.is_none());
/// assert_eq!(outcome.rules[0].selectors.len(), 2);
/// ```
pub fn parse_css(css: &str, origin: Option<Arc<Path>>, arena: &mut SelectorArena) -> ParseOutcome {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut outcome = ParseOutcome::default();

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let mark = arena.len();
        match parse_rule(&mut parser, origin.as_ref(), arena) {
            Ok(rule) => outcome.rules.push(rule),
            Err(e) => {
                arena.truncate(mark);
                let error = ParseError::from(e);
                let name = origin
                    .as_deref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "<data>".to_string());
                tracing::warn!("CSS parse error in '{}': {}", name, error);
                outcome.error = Some(error);
                break;
            }
        }
    }

    outcome
}

/// Parse a single CSS rule: selectors { declarations }
fn parse_rule<'i>(
    parser: &mut Parser<'i, '_>,
    origin: Option<&Arc<Path>>,
    arena: &mut SelectorArena,
) -> RuleResult<'i, ParsedRule> {
    let selectors = parser.parse_until_before(Delimiter::CurlyBracketBlock, |p| {
        parse_selector_list(p, arena)
    })?;

    let location = parser.current_source_location();
    match parser.next() {
        Ok(Token::CurlyBracketBlock) => {}
        _ => return Err(location.new_custom_error(SyntaxError::ExpectedBlock)),
    }

    let declarations = Arc::new(parser.parse_nested_block(|p| parse_declarations(p, origin))?);

    for &id in &selectors {
        let selector = arena.get_mut(id);
        selector.declarations = Some(Arc::clone(&declarations));
        selector.origin = origin.cloned();
    }

    Ok(ParsedRule {
        selectors,
        declarations,
    })
}

/// Builds the chains of one selector list.
#[derive(Default)]
struct ChainBuilder {
    /// The compound selector being read.
    current: Option<Selector>,
    /// The finished compound on the left of a combinator.
    left: Option<(SelectorId, Combinator)>,
    /// Whitespace followed `current`.
    after_whitespace: bool,
}

impl ChainBuilder {
    /// The compound selector to add a part to, starting one if needed.
    fn compound(&mut self, arena: &mut SelectorArena) -> &mut Selector {
        if self.after_whitespace
            && let Some(selector) = self.current.take()
        {
            let id = arena.push(selector);
            self.left = Some((id, Combinator::Descendant));
        }
        self.after_whitespace = false;

        let left = self.left.take();
        self.current.get_or_insert_with(|| {
            let mut selector = Selector::new();
            match left {
                Some((id, Combinator::Child)) => selector.parent = Some(id),
                Some((id, Combinator::Descendant)) => selector.ancestor = Some(id),
                None => {}
            }
            selector
        })
    }

    /// Close the current compound and remember it as the left side of `combinator`.
    fn combine(&mut self, combinator: Combinator, arena: &mut SelectorArena) -> bool {
        self.after_whitespace = false;
        match self.current.take() {
            Some(selector) => {
                self.left = Some((arena.push(selector), combinator));
                true
            }
            None => false,
        }
    }

    /// Close the chain, returning its rightmost selector.
    fn finish(&mut self, arena: &mut SelectorArena) -> Result<SelectorId, SyntaxError> {
        self.after_whitespace = false;
        match (self.current.take(), self.left.take()) {
            (Some(selector), _) => Ok(arena.push(selector)),
            (None, Some(_)) => Err(SyntaxError::DanglingCombinator('>')),
            (None, None) => Err(SyntaxError::EmptySelector),
        }
    }
}

/// Parse a comma-separated selector list up to the declaration block.
fn parse_selector_list<'i>(
    parser: &mut Parser<'i, '_>,
    arena: &mut SelectorArena,
) -> RuleResult<'i, Vec<SelectorId>> {
    let mut heads = vec![];
    let mut chain = ChainBuilder::default();

    parser.skip_whitespace();

    loop {
        let location = parser.current_source_location();
        let token = match parser.next_including_whitespace() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) => {
                if chain.current.is_some() {
                    chain.after_whitespace = true;
                }
            }

            Token::Ident(name) => {
                let selector = chain.compound(arena);
                if !selector.is_empty() {
                    return Err(location.new_unexpected_token_error(Token::Ident(name)));
                }
                selector.type_selector = Some(TypeSelector::Named(name.to_string()));
            }

            Token::Delim('*') => {
                let selector = chain.compound(arena);
                if !selector.is_empty() {
                    return Err(location.new_unexpected_token_error(Token::Delim('*')));
                }
                selector.type_selector = Some(TypeSelector::Universal);
            }

            Token::IDHash(id) | Token::Hash(id) => {
                let selector = chain.compound(arena);
                selector.id = Some(id.to_string());
            }

            Token::Delim('.') => {
                let class = expect_name(parser, '.')?;
                chain.compound(arena).class = Some(class);
            }

            Token::Colon => {
                let pseudo_class = expect_name(parser, ':')?;
                let selector = chain.compound(arena);
                *selector = std::mem::take(selector).with_pseudo_class(pseudo_class);
            }

            Token::Delim('>') => {
                if !chain.combine(Combinator::Child, arena) {
                    return Err(location.new_custom_error(SyntaxError::DanglingCombinator('>')));
                }
            }

            Token::Comma => {
                let head = chain.finish(arena).map_err(|e| location.new_custom_error(e))?;
                heads.push(head);
            }

            _ => return Err(location.new_custom_error(SyntaxError::UnhandledSelector)),
        }
    }

    let location = parser.current_source_location();
    let head = chain.finish(arena).map_err(|e| location.new_custom_error(e))?;
    heads.push(head);

    Ok(heads)
}

/// Read the identifier that must directly follow `after`.
fn expect_name<'i>(parser: &mut Parser<'i, '_>, after: char) -> RuleResult<'i, String> {
    let location = parser.current_source_location();
    match parser.next_including_whitespace() {
        Ok(Token::Ident(name)) => Ok(name.to_string()),
        _ => Err(location.new_custom_error(SyntaxError::ExpectedName(after))),
    }
}

/// Parse the contents of a declaration block.
fn parse_declarations<'i>(
    parser: &mut Parser<'i, '_>,
    origin: Option<&Arc<Path>>,
) -> RuleResult<'i, DeclarationTable> {
    let mut table = DeclarationTable::new();

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let location = parser.current_source_location();
        let name = match parser.next() {
            Ok(Token::Ident(name)) => name.to_string(),
            _ => return Err(location.new_custom_error(SyntaxError::ExpectedPropertyName)),
        };

        let location = parser.current_source_location();
        if parser.expect_colon().is_err() {
            return Err(location.new_custom_error(SyntaxError::ExpectedColon));
        }

        let value = parser.parse_until_before(Delimiter::Semicolon, |p| {
            let mut value = String::new();
            collect_value(p, &mut value)?;
            Ok::<_, CssParseError<'i, SyntaxError>>(value.trim().to_string())
        })?;

        let location = parser.current_source_location();
        match parser.next() {
            Ok(Token::Semicolon) => {}
            _ => return Err(location.new_custom_error(SyntaxError::ExpectedSemicolon)),
        }

        table.insert(name, DeclarationValue::new(value, origin.cloned()));
    }

    Ok(table)
}

/// Append the source text of every remaining token to `out`.
///
/// Comments are dropped and each run of whitespace becomes one space.
/// Blocks are copied with their contents and closing bracket.
fn collect_value<'i>(parser: &mut Parser<'i, '_>, out: &mut String) -> RuleResult<'i, ()> {
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(t) => t.clone(),
            Err(_) => return Ok(()),
        };

        let close = match token {
            Token::Comment(_) => continue,
            Token::WhiteSpace(_) => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                continue;
            }
            Token::Function(_) | Token::ParenthesisBlock => ')',
            Token::SquareBracketBlock => ']',
            Token::CurlyBracketBlock => '}',
            _ => {
                out.push_str(parser.slice_from(start));
                continue;
            }
        };

        out.push_str(parser.slice_from(start));
        parser.parse_nested_block(|p| collect_value(p, out))?;
        out.push(close);
    }
}
