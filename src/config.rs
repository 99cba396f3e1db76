//! Lexer configuration.
//!
//! Loaded from JSON by the command-line tools (`#[serde(default)]`, so any
//! subset of fields works) or built in code with struct update syntax.
//! [`LexerConfig::validate`] runs before any tokenization starts.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Angular template syntax generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TemplateSyntax {
    /// Interpolations, bindings and expansion forms only
    V2,
    /// Control-flow blocks (`@if`, `@for`, `@switch`, `@defer`, ...)
    V17,
    /// `@let` declarations
    V18_1,
    /// `typeof`, `void` and `in` expression keywords
    #[default]
    V20,
}

impl TemplateSyntax {
    pub fn supports_blocks(self) -> bool {
        self >= TemplateSyntax::V17
    }

    pub fn supports_let(self) -> bool {
        self >= TemplateSyntax::V18_1
    }

    pub fn has_extended_keywords(self) -> bool {
        self >= TemplateSyntax::V20
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateSyntax::V2 => "2",
            TemplateSyntax::V17 => "17",
            TemplateSyntax::V18_1 => "18.1",
            TemplateSyntax::V20 => "20",
        }
    }
}

impl fmt::Display for TemplateSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateSyntax {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version = s.trim();
        let version = version.strip_prefix(['v', 'V']).unwrap_or(version);
        match version {
            "2" => Ok(TemplateSyntax::V2),
            "17" => Ok(TemplateSyntax::V17),
            "18.1" | "18_1" => Ok(TemplateSyntax::V18_1),
            "20" => Ok(TemplateSyntax::V20),
            _ => Err(ConfigError::UnknownSyntax(s.to_string())),
        }
    }
}

impl TryFrom<String> for TemplateSyntax {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TemplateSyntax> for String {
    fn from(value: TemplateSyntax) -> Self {
        value.as_str().to_string()
    }
}

/// Interpolation start/end delimiter pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self { open: open.into(), close: close.into() }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for delimiter in [&self.open, &self.close] {
            if delimiter.is_empty() {
                return Err(ConfigError::EmptyDelimiter);
            }
            if delimiter.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidDelimiter {
                    delimiter: delimiter.clone(),
                    reason: "contains whitespace",
                });
            }
            if delimiter.contains(['"', '\'']) {
                return Err(ConfigError::InvalidDelimiter {
                    delimiter: delimiter.clone(),
                    reason: "contains a quote",
                });
            }
        }
        if self.open == self.close {
            return Err(ConfigError::IdenticalDelimiters(self.open.clone()));
        }
        Ok(())
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("{{", "}}")
    }
}

/// Options recognised by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    /// Keep character entity references in attribute values as separate tokens
    pub highlight_mode: bool,
    pub template_syntax: TemplateSyntax,
    /// Custom interpolation delimiters (`{{`/`}}` when unset)
    pub interpolation: Option<Delimiters>,
    /// Recognise ICU expansion forms (`{count, plural, ...}`)
    pub tokenize_expansion_forms: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            highlight_mode: false,
            template_syntax: TemplateSyntax::default(),
            interpolation: None,
            tokenize_expansion_forms: true,
        }
    }
}

impl LexerConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LexerConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.interpolation {
            Some(delimiters) => delimiters.validate(),
            None => Ok(()),
        }
    }

    pub fn interpolation_open(&self) -> &str {
        self.interpolation.as_ref().map_or("{{", |d| d.open.as_str())
    }

    pub fn interpolation_close(&self) -> &str {
        self.interpolation.as_ref().map_or("}}", |d| d.close.as_str())
    }

    /// Identity of the configuration, stored in snapshots.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.highlight_mode.hash(&mut hasher);
        self.template_syntax.hash(&mut hasher);
        self.interpolation_open().hash(&mut hasher);
        self.interpolation_close().hash(&mut hasher);
        self.tokenize_expansion_forms.hash(&mut hasher);
        hasher.finish()
    }
}
