//! Test runner that compares lexer output against .expected.tokens files
//!
//! Run with: cargo test --test expected_tests
//! Regenerate with: cargo run --bin accept_expected

use libtest_mimic::{Arguments, Failed, Trial};
use ng_template_lexer::{LexerConfig, Token, dump_tokens, tokenize};
use std::fs;
use std::path::{Path, PathBuf};

/// Collect all .html test files
fn collect_test_files() -> Vec<PathBuf> {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(&test_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|s| s == "html"))
    {
        files.push(entry.path().to_path_buf());
    }

    files.sort();
    files
}

fn load_config(path: &Path) -> Result<LexerConfig, Failed> {
    let config_path = path.with_extension("config.json");
    if !config_path.exists() {
        return Ok(LexerConfig::default());
    }
    let json = fs::read_to_string(&config_path)?;
    Ok(LexerConfig::from_json(&json)?)
}

fn check_expected(path: &Path) -> Result<(), Failed> {
    let expected_path = path.with_extension("expected.tokens");
    if !expected_path.exists() {
        return Err(format!("Missing expected file: {}", expected_path.display()).into());
    }

    let source = fs::read_to_string(path)?;
    let expected = fs::read_to_string(&expected_path)?;
    let config = load_config(path)?;
    let tokens: Vec<Token> = tokenize(&source, &config)?.collect();
    let actual = dump_tokens(&source, &tokens);

    if actual.trim() != expected.trim() {
        return Err(format!(
            "Output mismatch: {}\n--- expected ---\n{}\n--- actual ---\n{}",
            path.display(),
            expected.trim(),
            actual.trim()
        )
        .into());
    }
    Ok(())
}

fn main() {
    let args = Arguments::from_args();
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");

    let trials = collect_test_files()
        .into_iter()
        .map(|path| {
            let name = path
                .strip_prefix(&root)
                .unwrap_or(&path)
                .with_extension("")
                .display()
                .to_string();
            Trial::test(name, move || check_expected(&path))
        })
        .collect();

    libtest_mimic::run(&args, trials).exit();
}
