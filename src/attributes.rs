//! Attribute name classification.
//!
//! Angular decorates attribute names with brackets and prefixes to mark
//! bindings: `[value]`, `(click)`, `[(ngModel)]`, `*ngIf`, `#ref`, `let-item`
//! and their canonical `bind-`/`on-`/`bindon-`/`ref-` spellings. The lexer
//! consults this module for every attribute name so it knows whether the
//! attribute value is an embedded expression.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeKind {
    Regular,
    PropertyBinding,
    EventBinding,
    /// Two-way binding: `[(x)]` or `bindon-x`
    BananaBox,
    /// Structural directive shorthand: `*ngFor`
    TemplateBindings,
    /// Template variable: `let-item`
    Let,
    /// Template reference: `#input` or `ref-input`
    Reference,
}

impl AttributeKind {
    /// Whether the value of an attribute of this kind is an embedded expression.
    pub fn is_template_expression(self) -> bool {
        !matches!(self, AttributeKind::Regular | AttributeKind::Let | AttributeKind::Reference)
    }
}

/// Result of classifying an attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeInfo<'a> {
    pub kind: AttributeKind,
    /// Bound name with the decoration stripped (`value` for `[value]`)
    pub name: &'a str,
    pub is_template_expression: bool,
}

impl<'a> AttributeInfo<'a> {
    fn new(kind: AttributeKind, name: &'a str) -> Self {
        Self { kind, name, is_template_expression: kind.is_template_expression() }
    }
}

/// Canonical prefixes, checked after the bracket forms.
const PREFIXES: &[(&str, AttributeKind)] = &[
    ("bindon-", AttributeKind::BananaBox),
    ("bind-", AttributeKind::PropertyBinding),
    ("on-", AttributeKind::EventBinding),
];

/// Classify an attribute name. Total: anything unrecognised is `Regular`.
pub fn classify_attribute(name: &str) -> AttributeInfo<'_> {
    if let Some(inner) = surrounded(name, "[(", ")]") {
        return AttributeInfo::new(AttributeKind::BananaBox, inner);
    }
    if let Some(inner) = surrounded(name, "(", ")") {
        return AttributeInfo::new(AttributeKind::EventBinding, inner);
    }
    if let Some(inner) = surrounded(name, "[", "]") {
        return AttributeInfo::new(AttributeKind::PropertyBinding, inner);
    }
    for (prefix, kind) in PREFIXES {
        if let Some(rest) = non_empty_suffix(name, prefix) {
            return AttributeInfo::new(*kind, rest);
        }
    }
    if let Some(rest) = non_empty_suffix(name, "*") {
        return AttributeInfo::new(AttributeKind::TemplateBindings, rest);
    }
    if let Some(rest) = non_empty_suffix(name, "let-") {
        return AttributeInfo::new(AttributeKind::Let, rest);
    }
    if let Some(rest) = non_empty_suffix(name, "#").or_else(|| non_empty_suffix(name, "ref-")) {
        return AttributeInfo::new(AttributeKind::Reference, rest);
    }
    AttributeInfo::new(AttributeKind::Regular, name)
}

fn surrounded<'a>(name: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let inner = name.strip_prefix(open)?.strip_suffix(close)?;
    (!inner.is_empty()).then_some(inner)
}

fn non_empty_suffix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_forms() {
        let info = classify_attribute("[(ngModel)]");
        assert_eq!(info.kind, AttributeKind::BananaBox);
        assert_eq!(info.name, "ngModel");
        assert!(info.is_template_expression);

        let info = classify_attribute("(click)");
        assert_eq!(info.kind, AttributeKind::EventBinding);
        assert_eq!(info.name, "click");

        let info = classify_attribute("[class.active]");
        assert_eq!(info.kind, AttributeKind::PropertyBinding);
        assert_eq!(info.name, "class.active");
    }

    #[test]
    fn test_canonical_prefixes() {
        assert_eq!(classify_attribute("bind-value").kind, AttributeKind::PropertyBinding);
        assert_eq!(classify_attribute("on-click").kind, AttributeKind::EventBinding);
        assert_eq!(classify_attribute("bindon-model").kind, AttributeKind::BananaBox);
        assert_eq!(classify_attribute("bindon-model").name, "model");
    }

    #[test]
    fn test_template_bindings() {
        let info = classify_attribute("*ngFor");
        assert_eq!(info.kind, AttributeKind::TemplateBindings);
        assert_eq!(info.name, "ngFor");
        assert!(info.is_template_expression);
    }

    #[test]
    fn test_let_and_reference_are_not_expressions() {
        let info = classify_attribute("let-item");
        assert_eq!(info.kind, AttributeKind::Let);
        assert!(!info.is_template_expression);

        let info = classify_attribute("#input");
        assert_eq!(info.kind, AttributeKind::Reference);
        assert_eq!(info.name, "input");
        assert!(!info.is_template_expression);

        assert_eq!(classify_attribute("ref-input").kind, AttributeKind::Reference);
    }

    #[test]
    fn test_regular() {
        for name in ["class", "href", "data-id", "(ns1:a", "bind-", "[]", "()", "*", "#", "on"] {
            let info = classify_attribute(name);
            assert_eq!(info.kind, AttributeKind::Regular, "{name}");
            assert_eq!(info.name, name);
            assert!(!info.is_template_expression);
        }
    }

    #[test]
    fn test_namespaced_event() {
        let info = classify_attribute("(ns1:a)");
        assert_eq!(info.kind, AttributeKind::EventBinding);
        assert_eq!(info.name, "ns1:a");
    }

    #[test]
    fn test_empty_banana_falls_through_to_property() {
        let info = classify_attribute("[()]");
        assert_eq!(info.kind, AttributeKind::PropertyBinding);
        assert_eq!(info.name, "()");
    }
}
