//! Binary to generate/update .expected.tokens files
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- blocks  # Update only tests matching "blocks"
//!
//! A fixture `name.html` is lexed with the configuration in `name.config.json`
//! when that file exists, and with the defaults otherwise.

use ng_template_lexer::{LexerConfig, Token, dump_tokens, tokenize};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&test_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|s| s == "html"))
    {
        let path = entry.path();
        let path_str = path.to_string_lossy();

        // Apply filter if provided
        if let Some(ref f) = filter {
            if !path_str.contains(f) {
                skipped += 1;
                continue;
            }
        }

        if process_file(path) {
            updated += 1;
        }
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

fn process_file(path: &Path) -> bool {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            return false;
        }
    };

    let config_path = path.with_extension("config.json");
    let config = if config_path.exists() {
        let loaded = fs::read_to_string(&config_path)
            .map_err(|e| e.to_string())
            .and_then(|json| LexerConfig::from_json(&json).map_err(|e| e.to_string()));
        match loaded {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: {:?}: {}", config_path, e);
                return false;
            }
        }
    } else {
        LexerConfig::default()
    };

    let tokens: Vec<Token> = match tokenize(&source, &config) {
        Ok(lexer) => lexer.collect(),
        Err(e) => {
            eprintln!("ERROR: {:?}: {}", path, e);
            return false;
        }
    };

    let expected = path.with_extension("expected.tokens");
    if let Err(e) = fs::write(&expected, dump_tokens(&source, &tokens)) {
        eprintln!("Failed to write {:?}: {}", expected, e);
        return false;
    }
    println!("  wrote {}", expected.display());
    true
}
