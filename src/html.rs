//! HTML character classes and lookahead predicates shared by the tokenizer
//! and the region scanners.

/// Elements whose content is raw text: no tags, entities or interpolation.
/// https://html.spec.whatwg.org/multipage/syntax.html#raw-text-elements
const RAW_TEXT_ELEMENTS: &[(&str, RawTextElement)] = &[
    ("script", RawTextElement::Script),
    ("style", RawTextElement::Style),
];

/// Blocks whose first parameter is an expression rather than a named
/// parameter (`@if (cond)` vs `@defer (on idle)`).
const PRIMARY_EXPRESSION_BLOCKS: &[&str] = &["if", "else if", "for", "switch", "case", "let"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawTextElement {
    Script,
    Style,
}

impl RawTextElement {
    pub fn name(self) -> &'static str {
        match self {
            RawTextElement::Script => "script",
            RawTextElement::Style => "style",
        }
    }
}

/// Markup construct that starts at a `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupStart {
    /// `<!--`
    Comment,
    /// `<!doctype`, any case
    Doctype,
    /// `</` followed by a letter
    EndTag,
    /// `<` followed by a letter
    StartTag,
}

impl MarkupStart {
    /// Length of the opening delimiter.
    pub fn delimiter_len(self) -> usize {
        match self {
            MarkupStart::Comment => 4,
            MarkupStart::Doctype => 9,
            MarkupStart::EndTag => 2,
            MarkupStart::StartTag => 1,
        }
    }
}

pub fn raw_text_element(tag: &str) -> Option<RawTextElement> {
    RAW_TEXT_ELEMENTS
        .iter()
        .find(|(name, _)| tag.eq_ignore_ascii_case(name))
        .map(|(_, element)| *element)
}

pub fn has_primary_expression(block_name: &str) -> bool {
    PRIMARY_EXPRESSION_BLOCKS.contains(&block_name)
}

/// HTML whitespace: space, tab, LF, CR, form feed.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

pub fn is_block_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => chars.all(is_identifier_char),
        _ => false,
    }
}

/// Which markup construct, if any, starts at the beginning of `rest`.
///
/// A `<` not followed by one of these (`< a`, `<![CDATA[`, `<?xml`) is
/// character data.
pub fn markup_start(rest: &str) -> Option<MarkupStart> {
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    match bytes.get(1) {
        Some(b) if b.is_ascii_alphabetic() => Some(MarkupStart::StartTag),
        Some(b'/') if bytes.get(2).is_some_and(u8::is_ascii_alphabetic) => Some(MarkupStart::EndTag),
        Some(b'!') if rest.starts_with("<!--") => Some(MarkupStart::Comment),
        Some(b'!') if bytes.len() >= 9 && bytes[2..9].eq_ignore_ascii_case(b"doctype") => {
            Some(MarkupStart::Doctype)
        }
        _ => None,
    }
}

/// Length of a complete character entity reference at the start of `rest`:
/// `&name;`, `&#123;` or `&#x7B;`. An `&` without the closing `;` is not an
/// entity.
pub fn entity_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'&') {
        return None;
    }
    let (body_start, pred): (usize, fn(&u8) -> bool) = match bytes.get(1) {
        Some(b'#') if matches!(bytes.get(2), Some(b'x' | b'X')) => (3, u8::is_ascii_hexdigit),
        Some(b'#') => (2, u8::is_ascii_digit),
        Some(b) if b.is_ascii_alphabetic() => (1, u8::is_ascii_alphanumeric),
        _ => return None,
    };
    let body_end = scan(bytes, body_start, pred);
    (body_end > body_start && bytes.get(body_end) == Some(&b';')).then_some(body_end + 1)
}

fn scan(bytes: &[u8], from: usize, pred: fn(&u8) -> bool) -> usize {
    let mut i = from;
    while i < bytes.len() && pred(&bytes[i]) {
        i += 1;
    }
    i
}
