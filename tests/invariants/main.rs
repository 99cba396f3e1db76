//! Whole-stream invariants over every fixture, under several configurations:
//! the tokens partition the input, and resuming from any restartable
//! boundary reproduces the rest of the stream.
//!
//! Run with: cargo test --test invariants

use libtest_mimic::{Arguments, Failed, Trial};
use ng_template_lexer::{LexerConfig, TemplateSyntax, Token, first_restart_mismatch, is_partition, tokenize};
use std::fs;
use std::path::PathBuf;

fn fixtures() -> Vec<PathBuf> {
    let pattern = format!("{}/tests/fixtures/**/*.html", env!("CARGO_MANIFEST_DIR"));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map(|paths| paths.filter_map(Result::ok).collect())
        .unwrap_or_default();
    files.sort();
    files
}

fn configs() -> Vec<(&'static str, LexerConfig)> {
    vec![
        ("default", LexerConfig::default()),
        ("highlight", LexerConfig { highlight_mode: true, ..LexerConfig::default() }),
        ("v2", LexerConfig { template_syntax: TemplateSyntax::V2, ..LexerConfig::default() }),
        ("no_expansion", LexerConfig { tokenize_expansion_forms: false, ..LexerConfig::default() }),
    ]
}

fn check_partition(source: &str, config: &LexerConfig) -> Result<(), Failed> {
    let tokens: Vec<Token> = tokenize(source, config)?.collect();
    if !is_partition(source, &tokens) {
        return Err(format!("tokens do not partition the input: {:?}", tokens).into());
    }
    Ok(())
}

fn check_restarts(source: &str, config: &LexerConfig) -> Result<(), Failed> {
    match first_restart_mismatch(source, config)? {
        None => Ok(()),
        Some(offset) => Err(format!("resuming at offset {} diverges from the full run", offset).into()),
    }
}

fn main() {
    let args = Arguments::from_args();
    let mut trials = Vec::new();

    for path in fixtures() {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("fixture").to_string();
        for (label, config) in configs() {
            let source_path = path.clone();
            let partition_config = config.clone();
            trials.push(Trial::test(format!("partition::{}::{}", label, stem), move || {
                let source = fs::read_to_string(&source_path)?;
                check_partition(&source, &partition_config)
            }));

            let source_path = path.clone();
            trials.push(Trial::test(format!("restart::{}::{}", label, stem), move || {
                let source = fs::read_to_string(&source_path)?;
                check_restarts(&source, &config)
            }));
        }
    }

    libtest_mimic::run(&args, trials).exit();
}
