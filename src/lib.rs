//! Restartable lexer for Angular-style HTML templates.
//!
//! One token stream covers the markup, the embedded expressions (in
//! interpolations, binding attribute values and block parameters), control
//! flow blocks and ICU expansion forms:
//!
//! ```
//! use ng_template_lexer::{LexerConfig, TokenKind, tokenize};
//!
//! let source = "<b [title]=\"name\">{{ greeting }}</b>";
//! let kinds: Vec<TokenKind> = tokenize(source, &LexerConfig::default())
//!     .unwrap()
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(kinds[3], TokenKind::PropertyBindingName);
//! ```
//!
//! Tokens partition the input. A [`Lexer`] can hand out a [`Snapshot`] at any
//! token boundary whose state is restartable; [`resume_from`] continues from
//! it with exactly the tokens a full run would produce.

pub mod attributes;
pub mod config;
pub mod error;
pub mod expr;
pub mod highlight;
pub mod html;
pub mod lexer;
pub mod token;

pub use attributes::{AttributeInfo, AttributeKind, classify_attribute};
pub use config::{Delimiters, LexerConfig, TemplateSyntax};
pub use error::{ConfigError, ResumeError};
pub use expr::ExprKind;
pub use lexer::{BaseState, Lexer, LexerState, Snapshot, is_restartable_state};
pub use token::{Token, TokenKind, dump_tokens};

/// Tokenize a template from the start.
pub fn tokenize<'a>(source: &'a str, config: &LexerConfig) -> Result<Lexer<'a>, ConfigError> {
    Lexer::new(source, config)
}

/// Continue tokenizing from a snapshot.
pub fn resume_from<'a>(source: &'a str, config: &LexerConfig, snapshot: &Snapshot) -> Result<Lexer<'a>, ResumeError> {
    Lexer::resume_from(source, config, snapshot)
}

/// Check that `tokens` partition `source`: contiguous, non-empty, covering
/// every byte.
pub fn is_partition(source: &str, tokens: &[Token]) -> bool {
    let mut pos = 0;
    for token in tokens {
        if token.start != pos || token.end <= token.start {
            return false;
        }
        pos = token.end;
    }
    pos == source.len()
}

/// Verify restart equivalence at every restartable token boundary.
///
/// Returns the offset of the first boundary where a resumed lexer diverges
/// from the full run, or `None` when all of them agree.
pub fn first_restart_mismatch(source: &str, config: &LexerConfig) -> Result<Option<usize>, ConfigError> {
    let full: Vec<Token> = Lexer::new(source, config)?.collect();
    let mut lexer = Lexer::new(source, config)?;
    for index in 0..=full.len() {
        if let Ok(snapshot) = lexer.checkpoint() {
            let agrees = match resume_from(source, config, &snapshot) {
                Ok(resumed) => resumed.eq(full[index..].iter().copied()),
                Err(_) => false,
            };
            if !agrees {
                return Ok(Some(snapshot.offset()));
            }
        }
        lexer.next();
    }
    Ok(None)
}
