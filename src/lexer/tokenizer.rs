//! Markup tokenizer: the state machine underneath the merging layer.
//!
//! Each call to [`Tokenizer::next_raw`] produces exactly one raw token and
//! records the state the tokenizer was in when that token started. All
//! cross-token memory lives in [`LexerState`]; looking ahead or behind in the
//! buffer is fine because the whole buffer is always available, including
//! after a restart.

use tracing::{debug, trace, warn};

use super::regions::{self, InterpolationRegion};
use super::state::{BaseState, LexerState, Quote};
use crate::attributes::classify_attribute;
use crate::config::{LexerConfig, TemplateSyntax};
use crate::expr::{self, ExprKind};
use crate::html::{self, MarkupStart};
use crate::token::TokenKind;

/// Zero-width transitions allowed before a step must consume input.
const MAX_TRANSITIONS: usize = 8;

/// A token straight from the state machine, before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawToken {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// State the tokenizer was in when this token started
    pub state: LexerState,
}

/// The parts of [`LexerConfig`] the state machine consults.
#[derive(Debug, Clone)]
struct Options {
    open: String,
    close: String,
    syntax: TemplateSyntax,
    expansion_forms: bool,
}

pub(crate) struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    state: LexerState,
    options: Options,
    /// End of the interpolation opened at the cached offset; derived data,
    /// recomputed after a restart
    region_cache: Option<(usize, InterpolationRegion)>,
    /// `(parameter_start, end)` of the block parameter being lexed
    parameter_end_cache: Option<(usize, usize)>,
    /// `(from, end, quote)`: no value terminator between `from` and `end`
    value_end_cache: Option<(usize, usize, Option<Quote>)>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str, config: &LexerConfig) -> Self {
        Self::resume(source, config, 0, LexerState::default())
    }

    pub fn resume(source: &'a str, config: &LexerConfig, pos: usize, state: LexerState) -> Self {
        Self {
            source,
            pos,
            state,
            options: Options {
                open: config.interpolation_open().to_string(),
                close: config.interpolation_close().to_string(),
                syntax: config.template_syntax,
                expansion_forms: config.tokenize_expansion_forms,
            },
            region_cache: None,
            parameter_end_cache: None,
            value_end_cache: None,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn state(&self) -> &LexerState {
        &self.state
    }

    /// Produce the next raw token, or `None` at the end of input.
    pub fn next_raw(&mut self) -> Option<RawToken> {
        let mut transitions = 0;
        while self.pos < self.source.len() {
            let start_state = self.state.clone();
            if let Some((kind, end)) = self.step() {
                let token = RawToken { kind, start: self.pos, end, state: start_state };
                trace!(?kind, start = self.pos, end, state = ?token.state.base, "raw token");
                self.pos = end;
                return Some(token);
            }
            transitions += 1;
            if transitions > MAX_TRANSITIONS {
                // Stuck: force one character of data so the stream always advances
                warn!(pos = self.pos, state = ?self.state.base, "tokenizer made no progress");
                let end = self.pos + self.first_char().map_or(1, char::len_utf8);
                let token = RawToken { kind: TokenKind::DataCharacters, start: self.pos, end, state: start_state };
                self.state.base = BaseState::Data;
                self.pos = end;
                return Some(token);
            }
        }
        None
    }

    /// One state-machine step: a token `(kind, end)`, or `None` after a
    /// zero-width state change.
    fn step(&mut self) -> Option<(TokenKind, usize)> {
        match self.state.base {
            BaseState::Data => Some(self.lex_data()),
            BaseState::TagOpen => self.lex_tag_name(false),
            BaseState::EndTagOpen => self.lex_tag_name(true),
            BaseState::EndTag => self.lex_end_tag(),
            BaseState::TagAttributes => self.lex_tag_attributes(),
            BaseState::AttributeName => self.lex_after_attribute_name(),
            BaseState::BeforeAttributeValue => self.lex_before_attribute_value(),
            BaseState::AttributeValue => self.lex_quoted_value(),
            BaseState::AttributeValueUnquoted => self.lex_unquoted_value(),
            BaseState::Interpolation => self.lex_interpolation(),
            BaseState::UnterminatedInterpolation => self.lex_unterminated_interpolation(),
            BaseState::Comment => Some(self.lex_comment()),
            BaseState::Doctype => Some(self.lex_doctype()),
            BaseState::RawText => self.lex_raw_text(),
            BaseState::ExpansionFormContent | BaseState::ExpansionFormCaseEnd => {
                Some(self.lex_expansion_form())
            }
            BaseState::BlockName => self.lex_after_block_name(),
            BaseState::BlockParametersStart | BaseState::BlockParameter => {
                Some(self.lex_block_parameter())
            }
            BaseState::BlockParameterEnd => self.lex_after_block_parameters(),
        }
    }

    // === Character data ===

    fn lex_data(&mut self) -> (TokenKind, usize) {
        let pos = self.pos;
        let rest = self.rest();

        if self.state.expansion_form_nesting_level > 0 && rest.starts_with('}') {
            self.state.expansion_form_nesting_level -= 1;
            self.state.base = BaseState::ExpansionFormCaseEnd;
            return (TokenKind::ExpansionFormCaseEnd, pos + 1);
        }
        if rest.starts_with(self.options.open.as_str()) {
            return self.open_interpolation();
        }
        if let Some(start) = html::markup_start(rest) {
            let (kind, next) = match start {
                MarkupStart::Comment => (TokenKind::CommentStart, BaseState::Comment),
                MarkupStart::Doctype => (TokenKind::DoctypeStart, BaseState::Doctype),
                MarkupStart::EndTag => (TokenKind::EndTagStart, BaseState::EndTagOpen),
                MarkupStart::StartTag => (TokenKind::TagStart, BaseState::TagOpen),
            };
            self.state.base = next;
            return (kind, pos + start.delimiter_len());
        }
        if let Some(len) = html::entity_len(rest) {
            return (TokenKind::CharEntityRef, pos + len);
        }
        if self.options.syntax.supports_blocks() {
            if self.at_block_start() {
                return self.lex_block_name();
            }
            if rest.starts_with('}') {
                return (TokenKind::BlockEnd, pos + 1);
            }
        }
        if self.options.expansion_forms && regions::is_expansion_form_start(rest) {
            self.state.expansion_form_nesting_level += 1;
            self.state.base = BaseState::ExpansionFormContent;
            return (TokenKind::ExpansionFormStart, pos + 1);
        }

        let Some(first) = self.first_char() else {
            return (TokenKind::DataCharacters, pos);
        };
        if html::is_whitespace(first) {
            return (TokenKind::RealWhitespace, self.scan_while(pos, html::is_whitespace));
        }
        let open_first = self.options.open.chars().next();
        let end = self.scan_while(pos + first.len_utf8(), |c| {
            !(html::is_whitespace(c) || matches!(c, '<' | '&' | '@' | '{' | '}') || Some(c) == open_first)
        });
        (TokenKind::DataCharacters, end)
    }

    // === Interpolation ===

    fn open_interpolation(&mut self) -> (TokenKind, usize) {
        let start = self.pos;
        self.state.interpolation_start_offset = Some(start);
        self.state.base = match self.interpolation_region() {
            InterpolationRegion::Terminated { .. } => BaseState::Interpolation,
            InterpolationRegion::Unterminated { end } => {
                debug!(start, end, "unterminated interpolation");
                BaseState::UnterminatedInterpolation
            }
        };
        (TokenKind::InterpolationStart, start + self.options.open.len())
    }

    fn interpolation_region(&mut self) -> InterpolationRegion {
        let start = self.state.interpolation_start_offset.unwrap_or(self.pos);
        if let Some((cached_start, region)) = self.region_cache {
            if cached_start == start {
                return region;
            }
        }
        let body_start = (start + self.options.open.len()).min(self.source.len());
        let region = regions::interpolation_region(
            self.source,
            body_start,
            &self.options.close,
            self.state.quote,
        );
        self.region_cache = Some((start, region));
        region
    }

    fn lex_interpolation(&mut self) -> Option<(TokenKind, usize)> {
        match self.interpolation_region() {
            InterpolationRegion::Terminated { close } if self.pos >= close => {
                let end = close + self.options.close.len();
                self.leave_interpolation();
                Some((TokenKind::InterpolationEnd, end))
            }
            InterpolationRegion::Terminated { close } => Some(self.lex_expression(close)),
            InterpolationRegion::Unterminated { .. } => {
                self.state.base = BaseState::UnterminatedInterpolation;
                None
            }
        }
    }

    /// Recovery: the opened region is plain text up to where it was cut off.
    fn lex_unterminated_interpolation(&mut self) -> Option<(TokenKind, usize)> {
        let end = match self.interpolation_region() {
            InterpolationRegion::Unterminated { end } => end,
            InterpolationRegion::Terminated { .. } => {
                self.state.base = BaseState::Interpolation;
                return None;
            }
        };
        if self.pos >= end {
            self.leave_interpolation();
            return None;
        }
        if self.state.in_attribute_value() {
            return Some((TokenKind::AttributeValue, end));
        }
        let first = self.first_char()?;
        let (kind, run_end) = if html::is_whitespace(first) {
            (TokenKind::RealWhitespace, self.scan_while(self.pos, html::is_whitespace))
        } else {
            (TokenKind::DataCharacters, self.scan_while(self.pos, |c| !html::is_whitespace(c)))
        };
        Some((kind, run_end.min(end)))
    }

    fn leave_interpolation(&mut self) {
        self.state.interpolation_start_offset = None;
        self.state.base = if self.state.in_attribute_value() {
            BaseState::AttributeValue
        } else {
            BaseState::Data
        };
    }

    /// One embedded-expression token from the region ending at `region_end`.
    fn lex_expression(&self, region_end: usize) -> (TokenKind, usize) {
        let (kind, len) = expr::next_token(&self.source[self.pos..region_end], self.options.syntax);
        (kind, self.pos + len)
    }

    // === Tags ===

    fn lex_tag_name(&mut self, end_tag: bool) -> Option<(TokenKind, usize)> {
        let end = self.scan_while(self.pos, |c| {
            !(html::is_whitespace(c) || matches!(c, '>' | '/' | '<' | '"' | '\'' | '='))
        });
        if end_tag {
            self.state.base = BaseState::EndTag;
        } else {
            self.state.raw_text = html::raw_text_element(&self.source[self.pos..end]);
            self.state.base = BaseState::TagAttributes;
        }
        (end > self.pos).then_some((TokenKind::TagName, end))
    }

    fn lex_end_tag(&mut self) -> Option<(TokenKind, usize)> {
        let pos = self.pos;
        match self.first_char()? {
            c if html::is_whitespace(c) => Some((TokenKind::Whitespace, self.scan_while(pos, html::is_whitespace))),
            '>' => {
                self.state.base = BaseState::Data;
                Some((TokenKind::TagEnd, pos + 1))
            }
            '<' => {
                debug!(pos, "unclosed end tag");
                self.state.base = BaseState::Data;
                None
            }
            _ => {
                let end = self.scan_while(pos, |c| !(html::is_whitespace(c) || c == '>' || c == '<'));
                Some((TokenKind::TagCharacters, end))
            }
        }
    }

    fn lex_tag_attributes(&mut self) -> Option<(TokenKind, usize)> {
        let pos = self.pos;
        let rest = self.rest();
        match self.first_char()? {
            c if html::is_whitespace(c) => Some((TokenKind::Whitespace, self.scan_while(pos, html::is_whitespace))),
            '>' => {
                self.state.quote = None;
                self.state.binding = false;
                self.state.base = if self.state.raw_text.is_some() {
                    BaseState::RawText
                } else {
                    BaseState::Data
                };
                Some((TokenKind::TagEnd, pos + 1))
            }
            '/' if rest.starts_with("/>") => {
                self.state.clear_tag_flags();
                self.state.base = BaseState::Data;
                Some((TokenKind::EmptyElementEnd, pos + 2))
            }
            '<' => {
                debug!(pos, "unclosed start tag");
                self.state.clear_tag_flags();
                self.state.base = BaseState::Data;
                None
            }
            '"' | '\'' | '=' | '/' => Some((TokenKind::TagCharacters, pos + 1)),
            _ => {
                let end = self.attribute_name_end();
                let info = classify_attribute(&self.source[pos..end]);
                self.state.binding = info.is_template_expression;
                self.state.base = BaseState::AttributeName;
                Some((TokenKind::for_attribute(info.kind), end))
            }
        }
    }

    fn attribute_name_end(&self) -> usize {
        let rest = self.rest();
        rest.char_indices()
            .find(|&(offset, c)| {
                html::is_whitespace(c)
                    || matches!(c, '=' | '>' | '<' | '"' | '\'')
                    || (c == '/' && rest[offset..].starts_with("/>"))
            })
            .map_or(self.source.len(), |(offset, _)| self.pos + offset)
    }

    fn lex_after_attribute_name(&mut self) -> Option<(TokenKind, usize)> {
        let pos = self.pos;
        match self.first_char()? {
            c if html::is_whitespace(c) => Some((TokenKind::Whitespace, self.scan_while(pos, html::is_whitespace))),
            '=' => {
                self.state.base = BaseState::BeforeAttributeValue;
                Some((TokenKind::Eq, pos + 1))
            }
            _ => {
                self.state.binding = false;
                self.state.base = BaseState::TagAttributes;
                None
            }
        }
    }

    fn lex_before_attribute_value(&mut self) -> Option<(TokenKind, usize)> {
        let pos = self.pos;
        let rest = self.rest();
        match self.first_char()? {
            c if html::is_whitespace(c) => Some((TokenKind::Whitespace, self.scan_while(pos, html::is_whitespace))),
            c @ ('"' | '\'') => {
                self.state.quote = Quote::from_char(c);
                self.state.base = BaseState::AttributeValue;
                Some((TokenKind::AttributeValueStartDelimiter, pos + 1))
            }
            '>' | '<' => {
                self.state.binding = false;
                self.state.base = BaseState::TagAttributes;
                None
            }
            '/' if rest.starts_with("/>") => {
                self.state.binding = false;
                self.state.base = BaseState::TagAttributes;
                None
            }
            _ => {
                self.state.base = BaseState::AttributeValueUnquoted;
                None
            }
        }
    }

    fn lex_quoted_value(&mut self) -> Option<(TokenKind, usize)> {
        let pos = self.pos;
        let Some(quote) = self.state.quote else {
            self.state.base = BaseState::TagAttributes;
            return None;
        };
        let rest = self.rest();
        let first = self.first_char()?;
        if first == quote.char() {
            self.state.quote = None;
            self.state.binding = false;
            self.state.base = BaseState::TagAttributes;
            return Some((TokenKind::AttributeValueEndDelimiter, pos + 1));
        }
        if self.state.binding {
            let end = self.attribute_value_end(Some(quote));
            return Some(self.lex_expression(end));
        }
        if rest.starts_with(self.options.open.as_str()) {
            return Some(self.open_interpolation());
        }
        if let Some(len) = html::entity_len(rest) {
            return Some((TokenKind::CharEntityRef, pos + len));
        }
        let open_first = self.options.open.chars().next();
        let end = self.scan_while(pos + first.len_utf8(), |c| {
            !(c == quote.char() || c == '&' || Some(c) == open_first)
        });
        Some((TokenKind::AttributeValue, end))
    }

    fn lex_unquoted_value(&mut self) -> Option<(TokenKind, usize)> {
        let end = self.attribute_value_end(None);
        if end == self.pos {
            self.state.binding = false;
            self.state.base = BaseState::TagAttributes;
            return None;
        }
        if self.state.binding {
            return Some(self.lex_expression(end));
        }
        self.state.base = BaseState::TagAttributes;
        Some((TokenKind::AttributeValue, end))
    }

    /// First value terminator at or after the current position. A cached
    /// end stays valid for every position between where it was found and it.
    fn attribute_value_end(&mut self, quote: Option<Quote>) -> usize {
        if let Some((from, end, cached_quote)) = self.value_end_cache {
            if cached_quote == quote && (from..=end).contains(&self.pos) {
                return end;
            }
        }
        let end = regions::attribute_value_end(self.source, self.pos, quote);
        self.value_end_cache = Some((self.pos, end, quote));
        end
    }

    fn lex_raw_text(&mut self) -> Option<(TokenKind, usize)> {
        let element = self.state.raw_text.take();
        self.state.base = BaseState::Data;
        let name = element?.name();
        let end = self
            .rest()
            .match_indices("</")
            .map(|(offset, _)| self.pos + offset)
            .find(|&at| {
                self.source
                    .get(at + 2..at + 2 + name.len())
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            })
            .unwrap_or(self.source.len());
        (end > self.pos).then_some((TokenKind::RawText, end))
    }

    // === Comments and doctype ===

    fn lex_comment(&mut self) -> (TokenKind, usize) {
        let rest = self.rest();
        if rest.starts_with("-->") {
            self.state.base = BaseState::Data;
            return (TokenKind::CommentEnd, self.pos + 3);
        }
        let end = rest.find("-->").map_or(self.source.len(), |offset| self.pos + offset);
        (TokenKind::CommentCharacters, end)
    }

    fn lex_doctype(&mut self) -> (TokenKind, usize) {
        let pos = self.pos;
        match self.first_char() {
            Some(c) if html::is_whitespace(c) => (TokenKind::Whitespace, self.scan_while(pos, html::is_whitespace)),
            Some('>') => {
                self.state.base = BaseState::Data;
                (TokenKind::DoctypeEnd, pos + 1)
            }
            _ => (TokenKind::TagName, self.scan_while(pos, |c| !(html::is_whitespace(c) || c == '>'))),
        }
    }

    // === Expansion forms ===

    /// Header and case selectors of an expansion form (odd nesting levels).
    fn lex_expansion_form(&mut self) -> (TokenKind, usize) {
        let pos = self.pos;
        match self.first_char() {
            Some('}') => {
                self.state.expansion_form_nesting_level =
                    self.state.expansion_form_nesting_level.saturating_sub(1);
                self.state.base = BaseState::Data;
                (TokenKind::ExpansionFormEnd, pos + 1)
            }
            Some('{') => {
                self.state.expansion_form_nesting_level += 1;
                self.state.base = BaseState::Data;
                (TokenKind::ExpansionFormCaseStart, pos + 1)
            }
            Some(',') => (TokenKind::Expr(ExprKind::Comma), pos + 1),
            Some(c) if html::is_whitespace(c) => (TokenKind::Whitespace, self.scan_while(pos, html::is_whitespace)),
            _ => {
                let end = self.scan_while(pos, |c| !(html::is_whitespace(c) || matches!(c, ',' | '{' | '}')));
                let kind = if html::is_identifier(&self.source[pos..end]) {
                    TokenKind::Expr(ExprKind::Identifier)
                } else {
                    TokenKind::DataCharacters
                };
                (kind, end)
            }
        }
    }

    // === Blocks ===

    /// `@` followed by a letter, not glued to a preceding word (`a@b.c`).
    fn at_block_start(&self) -> bool {
        let rest = self.rest().as_bytes();
        rest.first() == Some(&b'@')
            && rest.get(1).is_some_and(u8::is_ascii_alphabetic)
            && !self.source[..self.pos].chars().next_back().is_some_and(html::is_identifier_char)
    }

    fn lex_block_name(&mut self) -> (TokenKind, usize) {
        let name_start = self.pos + 1;
        let name_end = self.scan_while(name_start, html::is_block_name_char);
        let mut name = &self.source[name_start..name_end];
        let mut end = name_end;
        if name == "else" {
            let if_start = self.scan_while(name_end, html::is_whitespace);
            let after_if = &self.source[if_start..];
            let is_else_if = if_start > name_end
                && after_if.starts_with("if")
                && !after_if[2..].chars().next().is_some_and(html::is_block_name_char);
            if is_else_if {
                name = "else if";
                end = if_start + 2;
            }
        }
        self.state.clear_block();
        self.state.block_name = Some(name.to_string());
        self.state.base = BaseState::BlockName;
        (TokenKind::BlockName, end)
    }

    fn is_let_block(&self) -> bool {
        self.options.syntax.supports_let() && self.state.block_name.as_deref() == Some("let")
    }

    fn lex_after_block_name(&mut self) -> Option<(TokenKind, usize)> {
        let pos = self.pos;
        let first = self.first_char()?;
        if html::is_whitespace(first) {
            return Some((TokenKind::Whitespace, self.scan_while(pos, html::is_whitespace)));
        }
        if self.is_let_block() {
            self.state.parameter_start = pos;
            self.state.base = BaseState::BlockParameter;
            return None;
        }
        match first {
            '(' => {
                self.state.parameter_index = 0;
                self.state.parameter_start = pos + 1;
                self.state.block_paren_level = 0;
                self.state.base = BaseState::BlockParametersStart;
                Some((TokenKind::BlockParametersStart, pos + 1))
            }
            '{' => Some(self.open_block_body()),
            _ => {
                debug!(pos, block = ?self.state.block_name, "block without parameters or body");
                self.state.clear_block();
                self.state.base = BaseState::Data;
                None
            }
        }
    }

    fn lex_block_parameter(&mut self) -> (TokenKind, usize) {
        let pos = self.pos;
        let is_let = self.is_let_block();
        let end = self.block_parameter_end(is_let);

        if end == pos {
            if self.rest().starts_with(';') {
                if is_let {
                    self.state.clear_block();
                    self.state.base = BaseState::Data;
                } else {
                    self.state.parameter_index += 1;
                    self.state.parameter_start = pos + 1;
                    self.state.base = BaseState::BlockParameter;
                }
                return (TokenKind::BlockSemicolon, pos + 1);
            }
            self.state.base = BaseState::BlockParameterEnd;
            return (TokenKind::BlockParametersEnd, pos + 1);
        }

        let (kind, token_end) = self.lex_expression(end);
        let kind = match kind {
            TokenKind::Expr(ExprKind::LParen) => {
                self.state.block_paren_level += 1;
                kind
            }
            TokenKind::Expr(ExprKind::RParen) => {
                self.state.block_paren_level = self.state.block_paren_level.saturating_sub(1);
                kind
            }
            TokenKind::Expr(expr_kind) if expr_kind.is_word() && self.starts_named_parameter() => {
                TokenKind::Expr(ExprKind::BlockParameterName)
            }
            kind => kind,
        };
        self.state.base = BaseState::BlockParameter;
        (kind, token_end)
    }

    /// End of the current block parameter. Paren tokens keep
    /// `block_paren_level` in step with the scan, so the end found at the
    /// parameter's first token holds until the parameter closes.
    fn block_parameter_end(&mut self, is_let: bool) -> usize {
        let key = self.state.parameter_start;
        if let Some((start, end)) = self.parameter_end_cache {
            if start == key && self.pos <= end {
                return end;
            }
        }
        let end = regions::block_parameter_end(self.source, self.pos, self.state.block_paren_level, is_let);
        self.parameter_end_cache = Some((key, end));
        end
    }

    /// The token at the current position is the first of a parameter that
    /// begins with a name (`track`, `on`, `when`, ...).
    fn starts_named_parameter(&self) -> bool {
        let block = self.state.block_name.as_deref().unwrap_or_default();
        let named = self.state.parameter_index > 0 || !html::has_primary_expression(block);
        let lead = self.source.get(self.state.parameter_start..self.pos).unwrap_or_default();
        named && lead.chars().all(html::is_whitespace)
    }

    fn lex_after_block_parameters(&mut self) -> Option<(TokenKind, usize)> {
        let pos = self.pos;
        match self.first_char()? {
            c if html::is_whitespace(c) => Some((TokenKind::Whitespace, self.scan_while(pos, html::is_whitespace))),
            '{' => Some(self.open_block_body()),
            _ => {
                debug!(pos, block = ?self.state.block_name, "block parameters not followed by a body");
                self.state.clear_block();
                self.state.base = BaseState::Data;
                None
            }
        }
    }

    fn open_block_body(&mut self) -> (TokenKind, usize) {
        self.state.clear_block();
        self.state.base = BaseState::Data;
        (TokenKind::BlockStart, self.pos + 1)
    }

    // === Low-level helpers ===

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn first_char(&self) -> Option<char> {
        let b = *self.source.as_bytes().get(self.pos)?;
        // Simple ASCII fast path
        if b < 128 { Some(b as char) } else { self.rest().chars().next() }
    }

    /// First position at or after `from` whose character fails `pred`.
    fn scan_while(&self, from: usize, pred: impl Fn(char) -> bool) -> usize {
        self.source[from..]
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(self.source.len(), |(offset, _)| from + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(source: &str) -> Vec<(TokenKind, &str)> {
        raw_with(source, &LexerConfig::default())
    }

    fn raw_with<'s>(source: &'s str, config: &LexerConfig) -> Vec<(TokenKind, &'s str)> {
        let mut tokenizer = Tokenizer::new(source, config);
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next_raw() {
            tokens.push((token.kind, &source[token.start..token.end]));
        }
        tokens
    }

    #[test]
    fn test_simple_tag() {
        assert_eq!(
            raw("<div>Hello</div>"),
            vec![
                (TokenKind::TagStart, "<"),
                (TokenKind::TagName, "div"),
                (TokenKind::TagEnd, ">"),
                (TokenKind::DataCharacters, "Hello"),
                (TokenKind::EndTagStart, "</"),
                (TokenKind::TagName, "div"),
                (TokenKind::TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn test_data_runs_split_at_specials() {
        assert_eq!(
            raw("a&&b"),
            vec![(TokenKind::DataCharacters, "a"), (TokenKind::DataCharacters, "&"), (TokenKind::DataCharacters, "&b")]
        );
    }

    #[test]
    fn test_interpolation_raw_tokens() {
        let tokens = raw("{{ a }}");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::InterpolationStart, "{{"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Expr(ExprKind::Identifier), "a"),
                (TokenKind::Whitespace, " "),
                (TokenKind::InterpolationEnd, "}}"),
            ]
        );
    }

    #[test]
    fn test_unterminated_interpolation_recovers_as_data() {
        let tokens = raw("{{ a <b>");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::InterpolationStart, "{{"),
                (TokenKind::RealWhitespace, " "),
                (TokenKind::DataCharacters, "a"),
                (TokenKind::RealWhitespace, " "),
                (TokenKind::TagStart, "<"),
                (TokenKind::TagName, "b"),
                (TokenKind::TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn test_binding_value_uses_expression_grammar() {
        let tokens = raw("<a [x]=\"b.c\">");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::TagStart, "<"),
                (TokenKind::TagName, "a"),
                (TokenKind::Whitespace, " "),
                (TokenKind::PropertyBindingName, "[x]"),
                (TokenKind::Eq, "="),
                (TokenKind::AttributeValueStartDelimiter, "\""),
                (TokenKind::Expr(ExprKind::Identifier), "b"),
                (TokenKind::Expr(ExprKind::Dot), "."),
                (TokenKind::Expr(ExprKind::Identifier), "c"),
                (TokenKind::AttributeValueEndDelimiter, "\""),
                (TokenKind::TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn test_unquoted_values() {
        let tokens = raw("<a b=c (d)=e()>");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::TagStart, "<"),
                (TokenKind::TagName, "a"),
                (TokenKind::Whitespace, " "),
                (TokenKind::AttributeName, "b"),
                (TokenKind::Eq, "="),
                (TokenKind::AttributeValue, "c"),
                (TokenKind::Whitespace, " "),
                (TokenKind::EventBindingName, "(d)"),
                (TokenKind::Eq, "="),
                (TokenKind::Expr(ExprKind::Identifier), "e"),
                (TokenKind::Expr(ExprKind::LParen), "("),
                (TokenKind::Expr(ExprKind::RParen), ")"),
                (TokenKind::TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn test_raw_text_element() {
        let tokens = raw("<script>a < b</SCRIPT>");
        assert_eq!(tokens[3], (TokenKind::RawText, "a < b"));
        assert_eq!(tokens[4], (TokenKind::EndTagStart, "</"));
        assert_eq!(tokens[5], (TokenKind::TagName, "SCRIPT"));
    }

    #[test]
    fn test_empty_raw_text_element() {
        let tokens = raw("<style></style>");
        assert_eq!(tokens[3], (TokenKind::EndTagStart, "</"));
    }

    #[test]
    fn test_block_parameters() {
        let tokens = raw("@for (item of items; track item.id) {}");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::BlockName, "@for"),
                (TokenKind::Whitespace, " "),
                (TokenKind::BlockParametersStart, "("),
                (TokenKind::Expr(ExprKind::Identifier), "item"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Expr(ExprKind::Identifier), "of"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Expr(ExprKind::Identifier), "items"),
                (TokenKind::BlockSemicolon, ";"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Expr(ExprKind::BlockParameterName), "track"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Expr(ExprKind::Identifier), "item"),
                (TokenKind::Expr(ExprKind::Dot), "."),
                (TokenKind::Expr(ExprKind::Identifier), "id"),
                (TokenKind::BlockParametersEnd, ")"),
                (TokenKind::Whitespace, " "),
                (TokenKind::BlockStart, "{"),
                (TokenKind::BlockEnd, "}"),
            ]
        );
    }

    #[test]
    fn test_block_paren_level_tracks_nesting() {
        let source = "@if (f(a)) {";
        let mut tokenizer = Tokenizer::new(source, &LexerConfig::default());
        let mut levels = Vec::new();
        while let Some(token) = tokenizer.next_raw() {
            levels.push((token.kind, tokenizer.state().block_paren_level));
        }
        assert!(levels.contains(&(TokenKind::Expr(ExprKind::LParen), 1)));
        assert!(levels.contains(&(TokenKind::Expr(ExprKind::RParen), 0)));
        assert!(levels.contains(&(TokenKind::BlockParametersEnd, 0)));
    }

    #[test]
    fn test_else_if_block_name() {
        let tokens = raw("@else if (b) {");
        assert_eq!(tokens[0], (TokenKind::BlockName, "@else if"));
        let tokens = raw("@else iffy");
        assert_eq!(tokens[0], (TokenKind::BlockName, "@else"));
    }

    #[test]
    fn test_at_sign_glued_to_word_is_data() {
        let tokens = raw("mail@example.com");
        assert!(tokens.iter().all(|(kind, _)| *kind == TokenKind::DataCharacters));
    }

    #[test]
    fn test_let_declaration() {
        let tokens = raw("@let x = a;b");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::BlockName, "@let"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Expr(ExprKind::Identifier), "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Expr(ExprKind::Eq), "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Expr(ExprKind::Identifier), "a"),
                (TokenKind::BlockSemicolon, ";"),
                (TokenKind::DataCharacters, "b"),
            ]
        );
    }

    #[test]
    fn test_blocks_disabled_in_v2() {
        let config = LexerConfig { template_syntax: TemplateSyntax::V2, ..LexerConfig::default() };
        let tokens = raw_with("@if (a) {}", &config);
        assert!(tokens.iter().all(|(kind, _)| matches!(kind, TokenKind::DataCharacters | TokenKind::RealWhitespace)));
    }

    #[test]
    fn test_expansion_form_levels() {
        let source = "{n, plural, =1 {one}}";
        let mut tokenizer = Tokenizer::new(source, &LexerConfig::default());
        let mut seen = Vec::new();
        while let Some(token) = tokenizer.next_raw() {
            seen.push((token.kind, tokenizer.state().expansion_form_nesting_level));
        }
        assert_eq!(seen.first(), Some(&(TokenKind::ExpansionFormStart, 1)));
        assert!(seen.contains(&(TokenKind::ExpansionFormCaseStart, 2)));
        assert!(seen.contains(&(TokenKind::ExpansionFormCaseEnd, 1)));
        assert_eq!(seen.last(), Some(&(TokenKind::ExpansionFormEnd, 0)));
    }

    #[test]
    fn test_tag_recovery_on_nested_open() {
        let tokens = raw("<a <b>");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::TagStart, "<"),
                (TokenKind::TagName, "a"),
                (TokenKind::Whitespace, " "),
                (TokenKind::TagStart, "<"),
                (TokenKind::TagName, "b"),
                (TokenKind::TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn test_start_state_recorded() {
        let mut tokenizer = Tokenizer::new("<a>{{b}}", &LexerConfig::default());
        let mut states = Vec::new();
        while let Some(token) = tokenizer.next_raw() {
            states.push(token.state.base);
        }
        assert_eq!(
            states,
            vec![
                BaseState::Data,
                BaseState::TagOpen,
                BaseState::TagAttributes,
                BaseState::Data,
                BaseState::Interpolation,
                BaseState::Interpolation,
            ]
        );
    }

    #[test]
    fn test_attribute_name_stops_before_self_closing() {
        assert_eq!(
            raw("<a b/>"),
            vec![
                (TokenKind::TagStart, "<"),
                (TokenKind::TagName, "a"),
                (TokenKind::Whitespace, " "),
                (TokenKind::AttributeName, "b"),
                (TokenKind::EmptyElementEnd, "/>"),
            ]
        );
        assert_eq!(raw("<a b/c>")[3], (TokenKind::AttributeName, "b/c"));
    }

    #[test]
    fn test_resumed_regions_match_full_run() {
        let config = LexerConfig::default();
        let sources = [
            "@for (x of f(a, (b)); track g(x)) {}",
            "@let v = (a; b) + 'x;y'; tail",
            "<p [x]=\"a + b.c\" (y)=f(z) t=u>",
            "@if (a; as b",
            "<p [x]=\"a + b",
        ];
        for source in sources {
            let mut full = Tokenizer::new(source, &config);
            let mut tokens = Vec::new();
            while let Some(token) = full.next_raw() {
                tokens.push(token);
            }
            for (index, token) in tokens.iter().enumerate() {
                let mut resumed = Tokenizer::resume(source, &config, token.start, token.state.clone());
                let mut rest = Vec::new();
                while let Some(token) = resumed.next_raw() {
                    rest.push(token);
                }
                assert_eq!(rest, tokens[index..], "{:?} resumed at {}", source, token.start);
            }
        }
    }
}
