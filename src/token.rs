use serde::Serialize;

use crate::attributes::AttributeKind;
use crate::expr::ExprKind;

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // === Markup ===
    /// `<` opening a start tag
    TagStart,
    /// `</` opening an end tag
    EndTagStart,
    TagName,
    /// `>` closing a tag
    TagEnd,
    /// `/>` closing a self-closing tag
    EmptyElementEnd,
    AttributeName,
    /// `=` between attribute name and value
    Eq,
    AttributeValueStartDelimiter,
    AttributeValueEndDelimiter,
    /// Fragment of an attribute value that is not an expression
    AttributeValue,
    /// Whitespace inside markup constructs (tags, block headers)
    Whitespace,
    /// Whitespace in character data
    RealWhitespace,
    DataCharacters,
    /// `&amp;`, `&#65;`, `&#x41;`
    CharEntityRef,
    /// Stray characters inside a tag
    TagCharacters,
    CommentStart,
    CommentCharacters,
    CommentEnd,
    DoctypeStart,
    DoctypeEnd,
    /// Content of `<script>` and `<style>` elements
    RawText,

    // === Binding attribute names ===
    PropertyBindingName,
    EventBindingName,
    BananaBoxBindingName,
    TemplateBindingsName,
    LetName,
    ReferenceName,

    // === Template ===
    InterpolationStart,
    InterpolationEnd,
    ExpansionFormStart,
    ExpansionFormEnd,
    ExpansionFormCaseStart,
    ExpansionFormCaseEnd,
    ExpansionFormContent,
    ExpansionFormComma,
    /// `@if`, `@else if`, `@for`, ... (includes the `@`)
    BlockName,
    BlockParametersStart,
    BlockParametersEnd,
    BlockSemicolon,
    /// `{` opening a block body
    BlockStart,
    /// `}` closing a block body
    BlockEnd,
    /// Whitespace inside an embedded expression
    ExprWhitespace,
    /// Token of the embedded expression grammar
    Expr(ExprKind),
}

impl TokenKind {
    /// Attribute-name token kind for a classified attribute.
    pub fn for_attribute(kind: AttributeKind) -> TokenKind {
        match kind {
            AttributeKind::Regular => TokenKind::AttributeName,
            AttributeKind::PropertyBinding => TokenKind::PropertyBindingName,
            AttributeKind::EventBinding => TokenKind::EventBindingName,
            AttributeKind::BananaBox => TokenKind::BananaBoxBindingName,
            AttributeKind::TemplateBindings => TokenKind::TemplateBindingsName,
            AttributeKind::Let => TokenKind::LetName,
            AttributeKind::Reference => TokenKind::ReferenceName,
        }
    }

    pub fn is_attribute_name(self) -> bool {
        matches!(
            self,
            TokenKind::AttributeName
                | TokenKind::PropertyBindingName
                | TokenKind::EventBindingName
                | TokenKind::BananaBoxBindingName
                | TokenKind::TemplateBindingsName
                | TokenKind::LetName
                | TokenKind::ReferenceName
        )
    }

    /// Kinds whose adjacent runs are merged into a single token.
    pub fn is_coalescing(self) -> bool {
        matches!(
            self,
            TokenKind::CommentCharacters
                | TokenKind::Whitespace
                | TokenKind::RealWhitespace
                | TokenKind::AttributeValue
                | TokenKind::DataCharacters
                | TokenKind::TagCharacters
        )
    }
}

/// A token: kind plus byte range into the lexed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One token per line: `Kind start..end "text"`. This is the format of the
/// `.expected.tokens` fixtures and of `ng-lex tokens`.
pub fn dump_tokens(source: &str, tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&format!(
            "{:?} {}..{} {:?}\n",
            token.kind,
            token.start,
            token.end,
            token.text(source)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_kinds_map_to_name_tokens() {
        assert_eq!(TokenKind::for_attribute(AttributeKind::Regular), TokenKind::AttributeName);
        assert_eq!(
            TokenKind::for_attribute(AttributeKind::BananaBox),
            TokenKind::BananaBoxBindingName
        );
        assert!(TokenKind::for_attribute(AttributeKind::Reference).is_attribute_name());
    }

    #[test]
    fn test_token_text() {
        let source = "<div>";
        let token = Token::new(TokenKind::TagName, 1, 4);
        assert_eq!(token.text(source), "div");
        assert_eq!(token.len(), 3);
    }

    #[test]
    fn test_dump_format() {
        let source = "<a>{{x}}";
        let tokens = [
            Token::new(TokenKind::TagStart, 0, 1),
            Token::new(TokenKind::Expr(ExprKind::Identifier), 5, 6),
        ];
        assert_eq!(dump_tokens(source, &tokens), "TagStart 0..1 \"<\"\nExpr(Identifier) 5..6 \"x\"\n");
    }

    #[test]
    fn test_coalescing_kinds() {
        assert!(TokenKind::DataCharacters.is_coalescing());
        assert!(!TokenKind::CharEntityRef.is_coalescing());
        assert!(!TokenKind::ExprWhitespace.is_coalescing());
    }
}
