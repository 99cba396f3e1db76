//! Boundaries of embedded regions.
//!
//! The expression lexer never decides where a region ends: these scanners
//! do, from positions that are always token boundaries. Quoted strings are
//! skipped with the expression lexer's own string rule, so a region end found
//! here never splits an expression token differently on restart.

use lazy_static::lazy_static;
use regex::Regex;

use super::state::Quote;
use crate::expr::string_end;
use crate::html;

lazy_static! {
    // `{` switch-value `,` plural|select `,`
    static ref EXPANSION_FORM_START: Regex =
        Regex::new(r"^\{\s*[^\s{},<][^{},<]*,\s*(?:plural|select)\s*,").unwrap();
}

/// Where an interpolation opened at some offset ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InterpolationRegion {
    /// The close delimiter starts at `close`
    Terminated { close: usize },
    /// No close delimiter before `end` (a tag start, the attribute's closing
    /// quote, or the end of input)
    Unterminated { end: usize },
}

/// Find the end of an interpolation whose body starts at `body_start`.
///
/// In character data the region is cut short by anything that starts
/// markup; inside an attribute value, by the attribute's closing quote.
pub(crate) fn interpolation_region(
    source: &str,
    body_start: usize,
    close: &str,
    attribute_quote: Option<Quote>,
) -> InterpolationRegion {
    let attribute_quote = attribute_quote.map(Quote::char);
    let mut i = body_start;
    while let Some(c) = source[i..].chars().next() {
        let rest = &source[i..];
        if Some(c) == attribute_quote {
            return InterpolationRegion::Unterminated { end: i };
        }
        if rest.starts_with(close) {
            return InterpolationRegion::Terminated { close: i };
        }
        if attribute_quote.is_none() && html::markup_start(rest).is_some() {
            return InterpolationRegion::Unterminated { end: i };
        }
        if c == '"' || c == '\'' {
            i = string_end(source, i, attribute_quote);
            continue;
        }
        i += c.len_utf8();
    }
    InterpolationRegion::Unterminated { end: source.len() }
}

/// Position of the `;` or `)` ending the block parameter that continues at
/// `from`, given the current parenthesis depth. `@let` has no parameter
/// list, so only `;` ends it. Returns the end of input when unterminated.
pub(crate) fn block_parameter_end(source: &str, from: usize, paren_level: u32, is_let: bool) -> usize {
    let mut depth = paren_level;
    let mut i = from;
    while let Some(c) = source[i..].chars().next() {
        match c {
            '"' | '\'' => {
                i = string_end(source, i, None);
                continue;
            }
            '(' => depth += 1,
            ')' if depth == 0 && !is_let => return i,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => return i,
            _ => {}
        }
        i += c.len_utf8();
    }
    source.len()
}

/// End of the attribute value continuing at `from`: the closing quote, or
/// whitespace/`>` for unquoted values.
pub(crate) fn attribute_value_end(source: &str, from: usize, quote: Option<Quote>) -> usize {
    let rest = &source[from..];
    let end = match quote {
        Some(quote) => rest.find(quote.char()),
        None => rest.find(|c: char| html::is_whitespace(c) || c == '>'),
    };
    from + end.unwrap_or(rest.len())
}

/// Whether an ICU expansion form (`{count, plural, ...}`) starts here.
pub(crate) fn is_expansion_form_start(rest: &str) -> bool {
    rest.starts_with('{') && EXPANSION_FORM_START.is_match(rest)
}
