use thiserror::Error;

/// Invalid lexer configuration, rejected before any tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("interpolation delimiter must not be empty")]
    EmptyDelimiter,
    #[error("invalid interpolation delimiter `{delimiter}`: {reason}")]
    InvalidDelimiter { delimiter: String, reason: &'static str },
    #[error("interpolation start and end delimiters must differ (both `{0}`)")]
    IdenticalDelimiters(String),
    #[error("invalid configuration: {0}")]
    Parse(String),
    #[error("unknown template syntax version `{0}` (expected 2, 17, 18.1 or 20)")]
    UnknownSyntax(String),
}

/// A snapshot that cannot be used to resume tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResumeError {
    #[error("lexer state {state:#x} is not restartable")]
    NotRestartable { state: u32 },
    #[error("snapshot was taken with a different lexer configuration")]
    ConfigMismatch,
    #[error("snapshot offset {offset} is past the end of the source ({len} bytes)")]
    OffsetOutOfBounds { offset: usize, len: usize },
    #[error("snapshot offset {offset} is not on a character boundary")]
    OffsetNotCharBoundary { offset: usize },
    #[error("invalid encoded lexer state {state:#x}")]
    InvalidState { state: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Terminal rendering for errors reported by the command-line tools.
pub trait Render: std::fmt::Display {
    /// Render the error without color
    fn render(&self) -> String {
        format!("error: {}\n", self)
    }

    /// Render the error with ANSI color codes
    fn render_color(&self) -> String {
        format!("\x1b[1;31merror\x1b[0m: \x1b[1m{}\x1b[0m\n", self)
    }
}

impl Render for ConfigError {}
impl Render for ResumeError {}
