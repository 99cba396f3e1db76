use logos::Logos;

use super::ExprKind;

/// Raw lexemes of the Angular expression grammar.
///
/// String literals and entity references are scanned by hand in the parent
/// module. Every pattern here accepts all of its non-empty prefixes that the
/// shorter tokens do not already cover, so the longest match never needs to
/// backtrack.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexeme {
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,

    // Keywords
    #[token("as")]
    As,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("let")]
    Let,
    #[token("null")]
    Null,
    #[token("this")]
    This,
    #[token("true")]
    True,
    #[token("typeof")]
    Typeof,
    #[token("undefined")]
    Undefined,
    #[token("var")]
    Var,
    #[token("void")]
    Void,

    // Literals
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]*)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]*)?")]
    Number,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(".")]
    Dot,
    #[token("?.")]
    QuestionDot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("?")]
    Question,
    #[token("??")]
    QuestionQuestion,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Excl,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!=")]
    NotEq,
    #[token("!==")]
    NotEqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("^")]
    Caret,
    #[token("#")]
    Hash,
}

impl Lexeme {
    /// Expression kind for this lexeme, or `None` for whitespace.
    pub(crate) fn kind(self) -> Option<ExprKind> {
        let kind = match self {
            Lexeme::Whitespace => return None,
            Lexeme::Identifier => ExprKind::Identifier,
            Lexeme::As => ExprKind::As,
            Lexeme::Else => ExprKind::Else,
            Lexeme::False => ExprKind::False,
            Lexeme::If => ExprKind::If,
            Lexeme::In => ExprKind::In,
            Lexeme::Let => ExprKind::Let,
            Lexeme::Null => ExprKind::Null,
            Lexeme::This => ExprKind::This,
            Lexeme::True => ExprKind::True,
            Lexeme::Typeof => ExprKind::Typeof,
            Lexeme::Undefined => ExprKind::Undefined,
            Lexeme::Var => ExprKind::Var,
            Lexeme::Void => ExprKind::Void,
            Lexeme::Number => ExprKind::Number,
            Lexeme::LParen => ExprKind::LParen,
            Lexeme::RParen => ExprKind::RParen,
            Lexeme::LBracket => ExprKind::LBracket,
            Lexeme::RBracket => ExprKind::RBracket,
            Lexeme::LBrace => ExprKind::LBrace,
            Lexeme::RBrace => ExprKind::RBrace,
            Lexeme::Dot => ExprKind::Dot,
            Lexeme::QuestionDot => ExprKind::QuestionDot,
            Lexeme::Comma => ExprKind::Comma,
            Lexeme::Colon => ExprKind::Colon,
            Lexeme::Semicolon => ExprKind::Semicolon,
            Lexeme::Question => ExprKind::Question,
            Lexeme::QuestionQuestion => ExprKind::QuestionQuestion,
            Lexeme::Plus => ExprKind::Plus,
            Lexeme::Minus => ExprKind::Minus,
            Lexeme::Star => ExprKind::Star,
            Lexeme::Slash => ExprKind::Slash,
            Lexeme::Percent => ExprKind::Percent,
            Lexeme::Excl => ExprKind::Excl,
            Lexeme::Eq => ExprKind::Eq,
            Lexeme::EqEq => ExprKind::EqEq,
            Lexeme::EqEqEq => ExprKind::EqEqEq,
            Lexeme::NotEq => ExprKind::NotEq,
            Lexeme::NotEqEq => ExprKind::NotEqEq,
            Lexeme::Lt => ExprKind::Lt,
            Lexeme::Gt => ExprKind::Gt,
            Lexeme::LtEq => ExprKind::LtEq,
            Lexeme::GtEq => ExprKind::GtEq,
            Lexeme::AndAnd => ExprKind::AndAnd,
            Lexeme::OrOr => ExprKind::OrOr,
            Lexeme::Pipe => ExprKind::Pipe,
            Lexeme::Amp => ExprKind::Amp,
            Lexeme::Caret => ExprKind::Caret,
            Lexeme::Hash => ExprKind::Hash,
        };
        Some(kind)
    }
}
