//! Embedded expression grammar.
//!
//! The markup tokenizer hands this module one region at a time (an
//! interpolation body, a binding value, a block parameter) and takes a single
//! token from its start. The lexer is stateless between tokens, so lexing one
//! token at a time yields the same stream as lexing the whole region.

mod lexeme;

use logos::Logos;
use serde::Serialize;

use crate::config::TemplateSyntax;
use crate::html;
use crate::token::{Token, TokenKind};
use lexeme::Lexeme;

/// Token kinds of the embedded expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExprKind {
    Identifier,

    // === Keywords ===
    As,
    Else,
    False,
    If,
    In,
    Let,
    Null,
    This,
    True,
    Typeof,
    Undefined,
    Var,
    Void,

    // === Literals ===
    Number,
    String,
    CharEntityRef,

    // === Punctuation ===
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Dot,
    /// `?.`
    QuestionDot,
    Comma,
    Colon,
    Semicolon,
    Question,
    /// `??`
    QuestionQuestion,

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Excl,
    Eq,
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AndAnd,
    OrOr,
    Pipe,
    Amp,
    Caret,
    Hash,

    /// Leading name of a block parameter (`track`, `on`, `as`, ...)
    BlockParameterName,
    /// Character the grammar does not recognise
    BadCharacter,
}

impl ExprKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            ExprKind::As
                | ExprKind::Else
                | ExprKind::False
                | ExprKind::If
                | ExprKind::In
                | ExprKind::Let
                | ExprKind::Null
                | ExprKind::This
                | ExprKind::True
                | ExprKind::Typeof
                | ExprKind::Undefined
                | ExprKind::Var
                | ExprKind::Void
        )
    }

    /// Identifier-like: may start a named block parameter.
    pub fn is_word(self) -> bool {
        self == ExprKind::Identifier || self.is_keyword()
    }

    /// Keywords introduced by a later syntax lex as identifiers before it.
    fn for_syntax(self, syntax: TemplateSyntax) -> ExprKind {
        match self {
            ExprKind::Typeof | ExprKind::Void | ExprKind::In if !syntax.has_extended_keywords() => {
                ExprKind::Identifier
            }
            kind => kind,
        }
    }
}

/// Lex the first token of a non-empty region.
///
/// Returns the token kind (`Whitespace` or `Expr`) and its length in bytes.
/// Characters outside the grammar become single-character `BadCharacter`
/// tokens, so the result always has a positive length.
pub(crate) fn next_token(region: &str, syntax: TemplateSyntax) -> (TokenKind, usize) {
    if let Some(len) = html::entity_len(region) {
        return (TokenKind::Expr(ExprKind::CharEntityRef), len);
    }
    if region.starts_with(['"', '\'']) {
        return (TokenKind::Expr(ExprKind::String), string_end(region, 0, None));
    }
    let mut lexer = Lexeme::lexer(region);
    match lexer.next() {
        Some(Ok(lexeme)) => {
            let kind = match lexeme.kind() {
                Some(kind) => TokenKind::Expr(kind.for_syntax(syntax)),
                None => TokenKind::Whitespace,
            };
            (kind, lexer.span().end)
        }
        _ => {
            let len = region.chars().next().map_or(region.len(), char::len_utf8);
            (TokenKind::Expr(ExprKind::BadCharacter), len)
        }
    }
}

/// End (exclusive) of the string literal whose quote is at `start`.
///
/// A literal ends after its matching quote, or before a newline, a `stop`
/// character (the quote of an enclosing attribute value) or a backslash
/// that escapes nothing. Region scanning uses the same rule, so a region
/// end never falls inside a string token.
pub(crate) fn string_end(source: &str, start: usize, stop: Option<char>) -> usize {
    let mut chars = source[start..].char_indices();
    let Some((_, open)) = chars.next() else {
        return start;
    };
    while let Some((offset, c)) = chars.next() {
        let at = start + offset;
        if Some(c) == stop || c == '\n' {
            return at;
        }
        if c == open {
            return at + c.len_utf8();
        }
        if c == '\\' {
            match chars.next() {
                Some((_, escaped)) if escaped != '\n' => continue,
                _ => return at,
            }
        }
    }
    source.len()
}

/// Tokenize a standalone expression, for callers that lex binding values
/// outside of a template.
pub fn tokenize_expression(source: &str, syntax: TemplateSyntax) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < source.len() {
        let (kind, len) = next_token(&source[pos..], syntax);
        tokens.push(Token::new(kind, pos, pos + len));
        pos += len;
    }
    tokens
}
