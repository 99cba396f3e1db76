use clap::{Args, Parser, Subcommand};
use ng_template_lexer::error::Render;
use ng_template_lexer::highlight::{self, HighlightKey};
use ng_template_lexer::lexer::positions::{byte_to_utf16, line_col};
use ng_template_lexer::{
    ConfigError, Delimiters, LexerConfig, TemplateSyntax, Token, TokenKind, dump_tokens, first_restart_mismatch,
    is_partition, tokenize,
};
use serde::Serialize;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "ng-lex")]
#[command(about = "ng-lex - tokenize Angular templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a template
    Tokens {
        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON with UTF-16 offsets
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print a template with syntax highlighting
    Highlight {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Check token coverage and restart equivalence for .html files
    Check {
        /// Path to .html file or directory
        path: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Path to template file
    #[arg(required_unless_present = "stdin")]
    file: Option<PathBuf>,

    /// Read from stdin
    #[arg(long)]
    stdin: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// JSON lexer configuration; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Template syntax version (2, 17, 18.1, 20)
    #[arg(long)]
    syntax: Option<TemplateSyntax>,

    /// Interpolation delimiters, e.g. `{%,%}`
    #[arg(long, value_name = "OPEN,CLOSE")]
    interpolation: Option<String>,

    /// Keep character entities in attribute values as separate tokens
    #[arg(long)]
    highlight_mode: bool,

    /// Treat ICU expansion forms as plain text
    #[arg(long)]
    no_expansion_forms: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("--interpolation expects OPEN,CLOSE, got `{0}`")]
    InterpolationArg(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Render for CliError {}

/// Token as printed by `tokens --json`.
#[derive(Serialize)]
struct JsonToken<'a> {
    kind: TokenKind,
    start: usize,
    end: usize,
    start_utf16: usize,
    end_utf16: usize,
    text: &'a str,
    highlight: HighlightKey,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Tokens { input, json, config } => run_tokens(&input, json, &config),
        Commands::Highlight { input, config } => run_highlight(&input, &config),
        Commands::Check { path, config } => run_check(&path, &config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            if io::stderr().is_terminal() {
                eprint!("{}", e.render_color());
            } else {
                eprint!("{}", e.render());
            }
            ExitCode::FAILURE
        }
    }
}

fn run_tokens(input: &InputArgs, json: bool, args: &ConfigArgs) -> Result<ExitCode, CliError> {
    let config = load_config(args)?;
    let source = read_input(input)?;
    let tokens: Vec<Token> = tokenize(&source, &config)?.collect();

    if json {
        let mut utf16 = 0;
        let json_tokens: Vec<JsonToken> = tokens
            .iter()
            .map(|token| {
                let text = token.text(&source);
                let start_utf16 = utf16;
                utf16 += byte_to_utf16(text, text.len());
                JsonToken {
                    kind: token.kind,
                    start: token.start,
                    end: token.end,
                    start_utf16,
                    end_utf16: utf16,
                    text,
                    highlight: highlight::highlight_key(token.kind),
                }
            })
            .collect();
        println!("{}", serde_json::to_string(&json_tokens)?);
    } else {
        print!("{}", dump_tokens(&source, &tokens));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_highlight(input: &InputArgs, args: &ConfigArgs) -> Result<ExitCode, CliError> {
    let config = load_config(args)?;
    let source = read_input(input)?;
    let tokens: Vec<Token> = tokenize(&source, &config)?.collect();
    print!("{}", highlight::render_ansi(&source, &tokens));
    Ok(ExitCode::SUCCESS)
}

fn run_check(path: &Path, args: &ConfigArgs) -> Result<ExitCode, CliError> {
    let config = load_config(args)?;
    let start = Instant::now();

    let files: Vec<PathBuf> = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
            .map(|e| e.into_path())
            .collect()
    };
    if files.is_empty() {
        eprintln!("No .html files found in {}", path.display());
        return Ok(ExitCode::FAILURE);
    }

    let mut failed = 0;
    for file in &files {
        let source = fs::read_to_string(file).map_err(|source| CliError::Read {
            path: file.display().to_string(),
            source,
        })?;
        match check_source(&source, &config)? {
            None => print_checked(&file.display().to_string()),
            Some(problem) => {
                failed += 1;
                print_failed(&file.display().to_string(), &problem);
            }
        }
    }

    print_summary(files.len(), failed, start.elapsed());
    Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Describe the first coverage or restart problem in `source`, if any.
fn check_source(source: &str, config: &LexerConfig) -> Result<Option<String>, CliError> {
    let tokens: Vec<Token> = tokenize(source, config)?.collect();
    if !is_partition(source, &tokens) {
        return Ok(Some("tokens do not cover the input".to_string()));
    }
    Ok(first_restart_mismatch(source, config)?.map(|offset| {
        let (line, col) = line_col(source, offset);
        format!("restart at {line}:{col} diverges from the full run")
    }))
}

fn load_config(args: &ConfigArgs) -> Result<LexerConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.display().to_string(),
                source,
            })?;
            LexerConfig::from_json(&json)?
        }
        None => LexerConfig::default(),
    };

    if let Some(syntax) = args.syntax {
        config.template_syntax = syntax;
    }
    if let Some(pair) = &args.interpolation {
        let (open, close) = pair
            .split_once(',')
            .ok_or_else(|| CliError::InterpolationArg(pair.clone()))?;
        config.interpolation = Some(Delimiters::new(open, close));
    }
    if args.highlight_mode {
        config.highlight_mode = true;
    }
    if args.no_expansion_forms {
        config.tokenize_expansion_forms = false;
    }

    config.validate()?;
    debug!(?config, "loaded lexer configuration");
    Ok(config)
}

fn read_input(input: &InputArgs) -> Result<String, CliError> {
    if input.stdin {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).map_err(|source| CliError::Read {
            path: "<stdin>".to_string(),
            source,
        })?;
        return Ok(source);
    }
    let path = input.file.as_deref().unwrap_or(Path::new("-"));
    info!(path = %path.display(), "reading template");
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn print_checked(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_failed(path: &str, problem: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[31m✗\x1b[0m {}: {}", path, problem);
    } else {
        eprintln!("  ✗ {}: {}", path, problem);
    }
}

fn print_summary(count: usize, failed: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if count == 1 { "file" } else { "files" };
    let failures = if failed == 0 {
        String::new()
    } else {
        format!(", {} failed", failed)
    };

    if is_tty {
        eprintln!("\n\x1b[1m✨ Checked {} {} in {}{}\x1b[0m", count, files_word, time_str, failures);
    } else {
        eprintln!("\n✨ Checked {} {} in {}{}", count, files_word, time_str, failures);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
