//! Normalizing layer over the raw token stream.
//!
//! Raw tokens are reclassified using their start state and one token of
//! lookahead, then adjacent runs of the same text-like kind are coalesced.
//! Every classified token keeps the raw state it started in, so the state at
//! the start of the next token to be yielded is always at hand for
//! checkpoints.

use std::collections::VecDeque;

use tracing::debug;

use super::state::LexerState;
use super::tokenizer::{RawToken, Tokenizer};
use crate::expr::ExprKind;
use crate::token::{Token, TokenKind};

/// A token with its final kind, not yet coalesced.
#[derive(Debug, Clone)]
struct Classified {
    token: Token,
    state: LexerState,
}

pub(crate) struct Merger<'a> {
    tokenizer: Tokenizer<'a>,
    highlight_mode: bool,
    lookahead: Option<RawToken>,
    ready: VecDeque<Classified>,
}

impl<'a> Merger<'a> {
    pub fn new(tokenizer: Tokenizer<'a>, highlight_mode: bool) -> Self {
        Self { tokenizer, highlight_mode, lookahead: None, ready: VecDeque::new() }
    }

    /// Offset and state at the start of the next token to be yielded, or at
    /// the end of input when the stream is exhausted.
    pub fn next_start(&mut self) -> (usize, LexerState) {
        if let Some(next) = self.peek_classified() {
            return (next.token.start, next.state.clone());
        }
        (self.tokenizer.position(), self.tokenizer.state().clone())
    }

    fn pull_raw(&mut self) -> Option<RawToken> {
        self.lookahead.take().or_else(|| self.tokenizer.next_raw())
    }

    fn peek_raw(&mut self) -> Option<&RawToken> {
        if self.lookahead.is_none() {
            self.lookahead = self.tokenizer.next_raw();
        }
        self.lookahead.as_ref()
    }

    fn peek_classified(&mut self) -> Option<&Classified> {
        if self.ready.is_empty() {
            self.fill();
        }
        self.ready.front()
    }

    fn next_classified(&mut self) -> Option<Classified> {
        if self.ready.is_empty() {
            self.fill();
        }
        self.ready.pop_front()
    }

    /// Classify at least one more raw token, unless the input is exhausted.
    fn fill(&mut self) {
        let Some(raw) = self.pull_raw() else {
            return;
        };
        if raw.kind == TokenKind::CharEntityRef && !self.highlight_mode {
            self.fill_entity_run(raw);
            return;
        }
        let kind = self.classify(&raw);
        self.push(kind, raw);
    }

    /// Entities directly followed by attribute text are part of that text.
    fn fill_entity_run(&mut self, first: RawToken) {
        let mut run = vec![first];
        while self.peek_raw().is_some_and(|next| next.kind == TokenKind::CharEntityRef) {
            run.extend(self.pull_raw());
        }
        let merged = self.peek_raw().is_some_and(|next| next.kind == TokenKind::AttributeValue);
        let kind = if merged { TokenKind::AttributeValue } else { TokenKind::CharEntityRef };
        for raw in run {
            self.push(kind, raw);
        }
    }

    fn push(&mut self, kind: TokenKind, raw: RawToken) {
        self.ready.push_back(Classified {
            token: Token::new(kind, raw.start, raw.end),
            state: raw.state,
        });
    }

    fn classify(&mut self, raw: &RawToken) -> TokenKind {
        let mut kind = raw.kind;

        if kind == TokenKind::InterpolationStart {
            let opens_expression = self.peek_raw().is_some_and(|next| {
                next.kind == TokenKind::InterpolationEnd || next.state.in_expression()
            });
            if !opens_expression {
                debug!(start = raw.start, "interpolation start degraded to text");
                kind = if raw.state.in_attribute_value() {
                    TokenKind::AttributeValue
                } else {
                    TokenKind::DataCharacters
                };
            }
        }

        if kind == TokenKind::Whitespace && raw.state.in_expression() {
            kind = TokenKind::ExprWhitespace;
        }

        if raw.state.in_expansion_form() {
            kind = match kind {
                TokenKind::Whitespace
                | TokenKind::RealWhitespace
                | TokenKind::DataCharacters
                | TokenKind::Expr(ExprKind::Identifier) => TokenKind::ExpansionFormContent,
                TokenKind::Expr(ExprKind::Comma) => TokenKind::ExpansionFormComma,
                kind => kind,
            };
        }

        kind
    }
}

impl Iterator for Merger<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut token = self.next_classified()?.token;
        if token.kind.is_coalescing() {
            while self.peek_classified().is_some_and(|next| next.token.kind == token.kind) {
                if let Some(next) = self.next_classified() {
                    token.end = next.token.end;
                }
            }
        }
        Some(token)
    }
}
