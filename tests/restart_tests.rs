//! Property-based tests for coverage, restart equivalence and termination
//!
//! Inputs are built from template fragments rather than arbitrary bytes, so
//! unbalanced interpolations, blocks, expansion forms and quotes show up in
//! almost every case.

use ng_template_lexer::{
    AttributeKind, LexerConfig, TemplateSyntax, Token, classify_attribute, first_restart_mismatch, is_partition,
    tokenize,
};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "<", ">", "</", "/>", "div", "script", " ", "\n", "=", "\"", "'", "[x]", "(y)", "*z", "{{", "}}", "{", "}",
    "(", ")", ";", ",", " plural,", "@if", "@for", "@let", "@else if", "track", "a", "&amp;", "&", "<!--", "-->",
    "\\", "é", "👋",
];

/// Generate a template from a soup of markup and template fragments
fn template_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40).prop_map(|parts| parts.concat())
}

fn config_strategy() -> impl Strategy<Value = LexerConfig> {
    (
        any::<bool>(),
        prop_oneof![
            Just(TemplateSyntax::V2),
            Just(TemplateSyntax::V17),
            Just(TemplateSyntax::V18_1),
            Just(TemplateSyntax::V20),
        ],
        any::<bool>(),
    )
        .prop_map(|(highlight_mode, template_syntax, tokenize_expansion_forms)| LexerConfig {
            highlight_mode,
            template_syntax,
            interpolation: None,
            tokenize_expansion_forms,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn test_tokens_partition_input(input in template_strategy(), config in config_strategy()) {
        let tokens: Vec<Token> = tokenize(&input, &config).unwrap().collect();
        prop_assert!(is_partition(&input, &tokens), "tokens {:?} for {:?}", tokens, input);
    }

    #[test]
    fn test_restart_equivalence(input in template_strategy(), config in config_strategy()) {
        prop_assert_eq!(first_restart_mismatch(&input, &config).unwrap(), None, "input {:?}", input);
    }

    #[test]
    fn test_token_count_is_bounded(input in template_strategy()) {
        // Every token consumes at least one byte
        let count = tokenize(&input, &LexerConfig::default()).unwrap().count();
        prop_assert!(count <= input.len());
    }

    #[test]
    fn test_arbitrary_text_partitions(input in "\\PC{0,64}") {
        let tokens: Vec<Token> = tokenize(&input, &LexerConfig::default()).unwrap().collect();
        prop_assert!(is_partition(&input, &tokens));
    }

    #[test]
    fn test_classifier_is_pure(name in "[\\[\\]()*#a-z-]{0,12}") {
        prop_assert_eq!(classify_attribute(&name), classify_attribute(&name));
    }

    #[test]
    fn test_bracket_forms_are_disjoint(inner in "[a-z][a-z.]{0,8}") {
        let banana = format!("[({})]", inner);
        let property = format!("[{}]", inner);
        let event = format!("({})", inner);
        prop_assert_eq!(classify_attribute(&banana).kind, AttributeKind::BananaBox);
        prop_assert_eq!(classify_attribute(&property).kind, AttributeKind::PropertyBinding);
        prop_assert_eq!(classify_attribute(&event).kind, AttributeKind::EventBinding);
        prop_assert_eq!(classify_attribute(&inner).kind, AttributeKind::Regular);
        prop_assert_eq!(classify_attribute(&banana).name, inner.as_str());
    }
}
