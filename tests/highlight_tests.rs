use ng_template_lexer::highlight::render_ansi;
use ng_template_lexer::{LexerConfig, Token, tokenize};

/// Helper to make ANSI codes visible for comparison
fn visible_ansi(s: &str) -> String {
    // Replace ANSI escape sequences like \x1b[38;5;180m with ‹38;5;180›
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next(); // consume '['
            result.push('‹');
            // consume until 'm'
            for nc in chars.by_ref() {
                if nc == 'm' {
                    result.push('›');
                    break;
                }
                result.push(nc);
            }
        } else {
            result.push(c);
        }
    }
    result
}

fn highlighted(source: &str) -> String {
    let tokens: Vec<Token> = tokenize(source, &LexerConfig::default()).unwrap().collect();
    visible_ansi(&render_ansi(source, &tokens))
}

#[test]
fn test_tag() {
    assert_eq!(highlighted("<br>"), "‹38;5;180›<‹0›‹38;5;180›br‹0›‹38;5;180›>‹0›");
}

#[test]
fn test_interpolation() {
    assert_eq!(highlighted("{{ n }}"), "‹38;5;103›{{‹0› n ‹38;5;103›}}‹0›");
}

#[test]
fn test_block_header() {
    assert_eq!(
        highlighted("@if (a) {}"),
        "‹38;5;173›@if‹0› ‹38;5;103›(‹0›a‹38;5;103›)‹0› ‹38;5;103›{‹0›‹38;5;103›}‹0›"
    );
}

#[test]
fn test_plain_text_is_uncolored() {
    assert_eq!(highlighted("just text"), "just text");
}
