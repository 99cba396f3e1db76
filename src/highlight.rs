//! Token kind → highlight key mapping and terminal rendering.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::expr::ExprKind;
use crate::token::{Token, TokenKind};

// ANSI color codes (256-color palette)
const TAG: &str = "\x1b[38;5;180m"; // Tan
const ATTR: &str = "\x1b[38;5;250m"; // Light gray
const STRING: &str = "\x1b[38;5;72m"; // Teal green
const KEYWORD: &str = "\x1b[38;5;173m"; // Orange
const BUILTIN: &str = "\x1b[38;5;103m"; // Lavender
const NUMBER: &str = "\x1b[38;5;73m"; // Cyan
const COMMENT: &str = "\x1b[38;5;243m"; // Dark gray
const BAD: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Highlighting category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKey {
    Tag,
    AttributeName,
    /// Binding attribute names: `[x]`, `(y)`, `*ngIf`, `#ref`
    Binding,
    AttributeValue,
    Entity,
    Comment,
    /// Interpolation, block and expansion-form punctuation
    TemplateDelimiter,
    BlockName,
    Keyword,
    Identifier,
    Number,
    String,
    Operator,
    Text,
    BadCharacter,
}

impl HighlightKey {
    pub fn color(self) -> Option<&'static str> {
        match self {
            HighlightKey::Tag => Some(TAG),
            HighlightKey::AttributeName => Some(ATTR),
            HighlightKey::Binding | HighlightKey::TemplateDelimiter => Some(BUILTIN),
            HighlightKey::AttributeValue | HighlightKey::String => Some(STRING),
            HighlightKey::Entity | HighlightKey::Number => Some(NUMBER),
            HighlightKey::Comment => Some(COMMENT),
            HighlightKey::BlockName | HighlightKey::Keyword => Some(KEYWORD),
            HighlightKey::BadCharacter => Some(BAD),
            HighlightKey::Identifier | HighlightKey::Operator | HighlightKey::Text => None,
        }
    }
}

lazy_static! {
    static ref HIGHLIGHTS: HashMap<TokenKind, HighlightKey> = {
        use HighlightKey as H;
        use TokenKind as T;
        HashMap::from([
            (T::TagStart, H::Tag),
            (T::EndTagStart, H::Tag),
            (T::TagName, H::Tag),
            (T::TagEnd, H::Tag),
            (T::EmptyElementEnd, H::Tag),
            (T::TagCharacters, H::Tag),
            (T::DoctypeStart, H::Tag),
            (T::DoctypeEnd, H::Tag),
            (T::AttributeName, H::AttributeName),
            (T::Eq, H::AttributeName),
            (T::PropertyBindingName, H::Binding),
            (T::EventBindingName, H::Binding),
            (T::BananaBoxBindingName, H::Binding),
            (T::TemplateBindingsName, H::Binding),
            (T::LetName, H::Binding),
            (T::ReferenceName, H::Binding),
            (T::AttributeValueStartDelimiter, H::AttributeValue),
            (T::AttributeValueEndDelimiter, H::AttributeValue),
            (T::AttributeValue, H::AttributeValue),
            (T::CharEntityRef, H::Entity),
            (T::CommentStart, H::Comment),
            (T::CommentCharacters, H::Comment),
            (T::CommentEnd, H::Comment),
            (T::InterpolationStart, H::TemplateDelimiter),
            (T::InterpolationEnd, H::TemplateDelimiter),
            (T::ExpansionFormStart, H::TemplateDelimiter),
            (T::ExpansionFormEnd, H::TemplateDelimiter),
            (T::ExpansionFormCaseStart, H::TemplateDelimiter),
            (T::ExpansionFormCaseEnd, H::TemplateDelimiter),
            (T::ExpansionFormComma, H::TemplateDelimiter),
            (T::BlockParametersStart, H::TemplateDelimiter),
            (T::BlockParametersEnd, H::TemplateDelimiter),
            (T::BlockSemicolon, H::TemplateDelimiter),
            (T::BlockStart, H::TemplateDelimiter),
            (T::BlockEnd, H::TemplateDelimiter),
            (T::BlockName, H::BlockName),
            (T::ExpansionFormContent, H::Text),
            (T::DataCharacters, H::Text),
            (T::RawText, H::Text),
            (T::Whitespace, H::Text),
            (T::RealWhitespace, H::Text),
            (T::ExprWhitespace, H::Text),
        ])
    };
}

/// Highlight key for a token kind. Total over all kinds.
pub fn highlight_key(kind: TokenKind) -> HighlightKey {
    match kind {
        TokenKind::Expr(expr) => expr_key(expr),
        kind => HIGHLIGHTS.get(&kind).copied().unwrap_or(HighlightKey::Text),
    }
}

fn expr_key(kind: ExprKind) -> HighlightKey {
    match kind {
        ExprKind::Identifier => HighlightKey::Identifier,
        ExprKind::BlockParameterName => HighlightKey::Keyword,
        ExprKind::Number => HighlightKey::Number,
        ExprKind::String => HighlightKey::String,
        ExprKind::CharEntityRef => HighlightKey::Entity,
        ExprKind::BadCharacter => HighlightKey::BadCharacter,
        kind if kind.is_keyword() => HighlightKey::Keyword,
        _ => HighlightKey::Operator,
    }
}

/// Render `source` with ANSI colors from its tokens.
pub fn render_ansi(source: &str, tokens: &[Token]) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    for token in tokens {
        let text = token.text(source);
        match highlight_key(token.kind).color() {
            Some(color) => {
                out.push_str(color);
                out.push_str(text);
                out.push_str(RESET);
            }
            None => out.push_str(text),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LexerConfig;
    use crate::lexer::Lexer;

    #[test]
    fn test_every_markup_kind_has_an_entry() {
        assert_eq!(highlight_key(TokenKind::TagName), HighlightKey::Tag);
        assert_eq!(highlight_key(TokenKind::PropertyBindingName), HighlightKey::Binding);
        assert_eq!(highlight_key(TokenKind::BlockName), HighlightKey::BlockName);
        assert_eq!(highlight_key(TokenKind::Expr(ExprKind::Typeof)), HighlightKey::Keyword);
        assert_eq!(highlight_key(TokenKind::Expr(ExprKind::QuestionDot)), HighlightKey::Operator);
    }

    #[test]
    fn test_render_preserves_text() {
        let source = "<b [x]=\"1 + a\">{{ 'hi' }}</b>";
        let tokens: Vec<_> = Lexer::new(source, &LexerConfig::default()).unwrap().collect();
        let rendered = render_ansi(source, &tokens);
        let plain = rendered
            .split('\x1b')
            .enumerate()
            .map(|(i, part)| if i == 0 { part } else { part.split_once('m').map_or("", |(_, rest)| rest) })
            .collect::<String>();
        assert_eq!(plain, source);
        assert!(rendered.contains(&format!("{NUMBER}1{RESET}")));
        assert!(rendered.contains(&format!("{STRING}'hi'{RESET}")));
    }
}
