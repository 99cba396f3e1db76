//! Checkpointable lexer state.
//!
//! Everything the tokenizer carries from one token to the next lives in
//! [`LexerState`]. Tokenizing from a given offset with a given state is
//! deterministic, which is what makes [`Snapshot`]s usable as restart points.
//!
//! The base state and its sub-flags pack into one `u32`:
//!
//! | bits  | meaning                                   |
//! |-------|-------------------------------------------|
//! | 0-7   | [`BaseState`]                             |
//! | 8-9   | attribute quote (none, `"`, `'`)          |
//! | 10    | attribute value is an embedded expression |
//! | 11-12 | raw-text element (none, script, style)    |

use serde::{Deserialize, Serialize};

use crate::error::ResumeError;
use crate::html::RawTextElement;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BaseState {
    #[default]
    Data = 0,
    /// After `<`, before the tag name
    TagOpen,
    /// After `</`, before the tag name
    EndTagOpen,
    /// After an end tag name, before `>`
    EndTag,
    TagAttributes,
    /// After an attribute name, before `=`
    AttributeName,
    /// After `=`, before the value
    BeforeAttributeValue,
    /// Inside a quoted attribute value
    AttributeValue,
    AttributeValueUnquoted,
    Interpolation,
    UnterminatedInterpolation,
    Comment,
    Doctype,
    /// Content of a `<script>` or `<style>` element
    RawText,
    ExpansionFormContent,
    ExpansionFormCaseEnd,
    /// After a block name, before `(` or `{`
    BlockName,
    /// Right after the `(` of a block header
    BlockParametersStart,
    BlockParameter,
    /// After the `)` of a block header, before `{`
    BlockParameterEnd,
}

impl BaseState {
    const ALL: [BaseState; 20] = [
        BaseState::Data,
        BaseState::TagOpen,
        BaseState::EndTagOpen,
        BaseState::EndTag,
        BaseState::TagAttributes,
        BaseState::AttributeName,
        BaseState::BeforeAttributeValue,
        BaseState::AttributeValue,
        BaseState::AttributeValueUnquoted,
        BaseState::Interpolation,
        BaseState::UnterminatedInterpolation,
        BaseState::Comment,
        BaseState::Doctype,
        BaseState::RawText,
        BaseState::ExpansionFormContent,
        BaseState::ExpansionFormCaseEnd,
        BaseState::BlockName,
        BaseState::BlockParametersStart,
        BaseState::BlockParameter,
        BaseState::BlockParameterEnd,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<BaseState> {
        BaseState::ALL.get(code as usize).copied()
    }

    /// Block headers and expansion forms depend on context that the encoded
    /// state alone does not describe, so they are never restart points.
    pub fn is_restartable(self) -> bool {
        !matches!(
            self,
            BaseState::ExpansionFormContent
                | BaseState::ExpansionFormCaseEnd
                | BaseState::BlockName
                | BaseState::BlockParametersStart
                | BaseState::BlockParameter
                | BaseState::BlockParameterEnd
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    pub fn from_char(c: char) -> Option<Quote> {
        match c {
            '"' => Some(Quote::Double),
            '\'' => Some(Quote::Single),
            _ => None,
        }
    }

    pub fn char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

const QUOTE_SHIFT: u32 = 8;
const BINDING_BIT: u32 = 1 << 10;
const RAW_TEXT_SHIFT: u32 = 11;
const KNOWN_BITS: u32 = 0x1FFF;

/// Mutable state of the markup tokenizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexerState {
    pub base: BaseState,
    /// Quote of the attribute value being scanned (also while inside an
    /// interpolation in that value)
    pub quote: Option<Quote>,
    /// The current attribute's value is an embedded expression
    pub binding: bool,
    /// The open tag is `<script>` or `<style>`
    pub raw_text: Option<RawTextElement>,
    pub block_name: Option<String>,
    pub parameter_index: u32,
    pub parameter_start: usize,
    pub block_paren_level: u32,
    pub expansion_form_nesting_level: u32,
    pub interpolation_start_offset: Option<usize>,
}

impl LexerState {
    pub fn encode(&self) -> u32 {
        let quote = match self.quote {
            None => 0,
            Some(Quote::Double) => 1,
            Some(Quote::Single) => 2,
        };
        let raw_text = match self.raw_text {
            None => 0,
            Some(RawTextElement::Script) => 1,
            Some(RawTextElement::Style) => 2,
        };
        let mut state = self.base.code() as u32 | (quote << QUOTE_SHIFT) | (raw_text << RAW_TEXT_SHIFT);
        if self.binding {
            state |= BINDING_BIT;
        }
        state
    }

    /// Base state and flags of an encoded state; the remaining fields are
    /// left at their defaults.
    pub fn decode(state: u32) -> Result<LexerState, ResumeError> {
        let invalid = || ResumeError::InvalidState { state };
        if state & !KNOWN_BITS != 0 {
            return Err(invalid());
        }
        let base = BaseState::from_code((state & 0xFF) as u8).ok_or_else(invalid)?;
        let quote = match (state >> QUOTE_SHIFT) & 0b11 {
            0 => None,
            1 => Some(Quote::Double),
            2 => Some(Quote::Single),
            _ => return Err(invalid()),
        };
        let raw_text = match (state >> RAW_TEXT_SHIFT) & 0b11 {
            0 => None,
            1 => Some(RawTextElement::Script),
            2 => Some(RawTextElement::Style),
            _ => return Err(invalid()),
        };
        Ok(LexerState {
            base,
            quote,
            binding: state & BINDING_BIT != 0,
            raw_text,
            ..LexerState::default()
        })
    }

    pub fn is_restartable(&self) -> bool {
        self.expansion_form_nesting_level == 0 && self.base.is_restartable()
    }

    /// Tokens starting in this state belong to the embedded expression grammar.
    pub fn in_expression(&self) -> bool {
        match self.base {
            BaseState::Interpolation | BaseState::BlockParametersStart | BaseState::BlockParameter => {
                true
            }
            BaseState::AttributeValue | BaseState::AttributeValueUnquoted => self.binding,
            _ => false,
        }
    }

    /// Tokens starting in this state are expansion-form text.
    pub fn in_expansion_form(&self) -> bool {
        self.expansion_form_nesting_level > 0
            && matches!(
                self.base,
                BaseState::Data | BaseState::ExpansionFormContent | BaseState::ExpansionFormCaseEnd
            )
    }

    /// Whether an interpolation opened in this state sits in an attribute value.
    pub fn in_attribute_value(&self) -> bool {
        self.quote.is_some()
    }

    /// Leave the current tag: attribute and raw-text flags no longer apply.
    pub(crate) fn clear_tag_flags(&mut self) {
        self.quote = None;
        self.binding = false;
        self.raw_text = None;
    }

    pub(crate) fn clear_block(&mut self) {
        self.block_name = None;
        self.parameter_index = 0;
        self.parameter_start = 0;
        self.block_paren_level = 0;
    }
}

/// Whether tokenization can resume from an encoded state at the given
/// expansion-form nesting level.
pub fn is_restartable_state(state: u32, expansion_form_nesting_level: u32) -> bool {
    expansion_form_nesting_level == 0
        && LexerState::decode(state).is_ok_and(|decoded| decoded.base.is_restartable())
}

/// Immutable restart point: an offset plus the full lexer state there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    offset: usize,
    state: u32,
    block_name: Option<String>,
    parameter_index: u32,
    parameter_start: usize,
    block_paren_level: u32,
    expansion_form_nesting_level: u32,
    interpolation_start_offset: Option<usize>,
    config_fingerprint: u64,
}

impl Snapshot {
    pub(crate) fn capture(offset: usize, state: &LexerState, config_fingerprint: u64) -> Snapshot {
        Snapshot {
            offset,
            state: state.encode(),
            block_name: state.block_name.clone(),
            parameter_index: state.parameter_index,
            parameter_start: state.parameter_start,
            block_paren_level: state.block_paren_level,
            expansion_form_nesting_level: state.expansion_form_nesting_level,
            interpolation_start_offset: state.interpolation_start_offset,
            config_fingerprint,
        }
    }

    pub(crate) fn restore(&self) -> Result<LexerState, ResumeError> {
        let decoded = LexerState::decode(self.state)?;
        Ok(LexerState {
            block_name: self.block_name.clone(),
            parameter_index: self.parameter_index,
            parameter_start: self.parameter_start,
            block_paren_level: self.block_paren_level,
            expansion_form_nesting_level: self.expansion_form_nesting_level,
            interpolation_start_offset: self.interpolation_start_offset,
            ..decoded
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn block_name(&self) -> Option<&str> {
        self.block_name.as_deref()
    }

    pub fn parameter_index(&self) -> u32 {
        self.parameter_index
    }

    pub fn parameter_start(&self) -> usize {
        self.parameter_start
    }

    pub fn block_paren_level(&self) -> u32 {
        self.block_paren_level
    }

    pub fn expansion_form_nesting_level(&self) -> u32 {
        self.expansion_form_nesting_level
    }

    pub fn interpolation_start_offset(&self) -> Option<usize> {
        self.interpolation_start_offset
    }

    pub fn config_fingerprint(&self) -> u64 {
        self.config_fingerprint
    }

    pub fn is_restartable(&self) -> bool {
        is_restartable_state(self.state, self.expansion_form_nesting_level)
    }
}
