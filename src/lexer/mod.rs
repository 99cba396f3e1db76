//! Restartable template lexer.
//!
//! [`Lexer`] is a pull iterator over [`Token`]s. It can be paused at any
//! token boundary with [`Lexer::checkpoint`] and a new lexer started from the
//! resulting [`Snapshot`] yields exactly the tokens an uninterrupted run would have.

mod merge;
pub mod positions;
mod regions;
mod state;
mod tokenizer;

pub use state::{BaseState, LexerState, Quote, Snapshot, is_restartable_state};

use tracing::debug;

use crate::config::LexerConfig;
use crate::error::{ConfigError, ResumeError};
use crate::token::Token;
use merge::Merger;
use tokenizer::Tokenizer;

pub struct Lexer<'a> {
    source: &'a str,
    merger: Merger<'a>,
    fingerprint: u64,
}

impl<'a> Lexer<'a> {
    /// Start tokenizing `source` from the beginning.
    pub fn new(source: &'a str, config: &LexerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            merger: Merger::new(Tokenizer::new(source, config), config.highlight_mode),
            fingerprint: config.fingerprint(),
        })
    }

    /// Resume tokenizing `source` from a snapshot taken by [`Lexer::checkpoint`].
    ///
    /// The snapshot must come from a lexer with the same configuration and
    /// point into `source`; the buffer contents before the snapshot offset
    /// are expected to be unchanged.
    pub fn resume_from(source: &'a str, config: &LexerConfig, snapshot: &Snapshot) -> Result<Self, ResumeError> {
        config.validate()?;
        let fingerprint = config.fingerprint();
        if snapshot.config_fingerprint() != fingerprint {
            debug!(offset = snapshot.offset(), "snapshot rejected: configuration mismatch");
            return Err(ResumeError::ConfigMismatch);
        }
        let state = snapshot.restore()?;
        if !state.is_restartable() {
            debug!(offset = snapshot.offset(), state = snapshot.state(), "snapshot rejected: not restartable");
            return Err(ResumeError::NotRestartable { state: snapshot.state() });
        }
        let offset = snapshot.offset();
        if offset > source.len() {
            return Err(ResumeError::OffsetOutOfBounds { offset, len: source.len() });
        }
        if !source.is_char_boundary(offset) {
            return Err(ResumeError::OffsetNotCharBoundary { offset });
        }
        if !fits_source(source, config, offset, &state) {
            debug!(offset, state = snapshot.state(), "snapshot rejected: does not match the source");
            return Err(ResumeError::InvalidState { state: snapshot.state() });
        }

        Ok(Self {
            source,
            merger: Merger::new(Tokenizer::resume(source, config, offset, state), config.highlight_mode),
            fingerprint,
        })
    }

    /// Capture the state at the start of the next token to be yielded.
    pub fn checkpoint(&mut self) -> Result<Snapshot, ResumeError> {
        let (offset, state) = self.merger.next_start();
        if !state.is_restartable() {
            return Err(ResumeError::NotRestartable { state: state.encode() });
        }
        Ok(Snapshot::capture(offset, &state, self.fingerprint))
    }

    /// Offset where the next token starts (the source length when done).
    pub fn offset(&mut self) -> usize {
        self.merger.next_start().0
    }

    /// Lexer state at [`Lexer::offset`].
    pub fn state(&mut self) -> LexerState {
        self.merger.next_start().1
    }

    pub fn source(&self) -> &'a str {
        self.source
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.merger.next()
    }
}

/// Cross-check the fields the encoded state does not cover against the
/// buffer being resumed.
fn fits_source(source: &str, config: &LexerConfig, offset: usize, state: &LexerState) -> bool {
    let in_interpolation = matches!(state.base, BaseState::Interpolation | BaseState::UnterminatedInterpolation);
    let interpolation_ok = match state.interpolation_start_offset {
        Some(start) => {
            in_interpolation
                && start <= offset
                && source.get(start..).is_some_and(|rest| rest.starts_with(config.interpolation_open()))
        }
        None => !in_interpolation,
    };
    interpolation_ok && state.parameter_start <= source.len()
}
