//! Command-line interface for glint
//! Tokenizes a source file with one of the registered modes and prints the
//! styled spans.
//!
//! Usage:
//!   glint `<path>` --mode `<mode>` [--format `<format>`]   - Tokenize a file
//!   glint --list-modes                                    - List registered modes

use std::fs;
use std::process;
use std::sync::Arc;

use clap::{Arg, ArgAction, Command};

use glint::highlight::Highlighter;
use glint::mode::{Mode, ModeConfig, ModeRegistry};
use glint::modes::register_builtins;

fn main() {
    let matches = Command::new("glint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A line-oriented tokenizer for syntax highlighting")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the file to tokenize")
                .required_unless_present("list-modes")
                .index(1),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("Tokenizer mode (e.g. 'haskell', 'routes', 'yesod')")
                .default_value("haskell"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: text or json")
                .default_value("text"),
        )
        .arg(
            Arg::new("tab-size")
                .long("tab-size")
                .help("Columns per tab stop")
                .value_parser(clap::value_parser!(usize))
                .default_value("8"),
        )
        .arg(
            Arg::new("indent-unit")
                .long("indent-unit")
                .help("Columns per indentation level")
                .value_parser(clap::value_parser!(usize))
                .default_value("2"),
        )
        .arg(
            Arg::new("list-modes")
                .long("list-modes")
                .help("List registered tokenizer modes")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config = ModeConfig {
        tab_size: *matches.get_one::<usize>("tab-size").unwrap(),
        indent_unit: *matches.get_one::<usize>("indent-unit").unwrap(),
    };

    let mut registry = ModeRegistry::new();
    register_builtins(&mut registry, config).unwrap_or_else(|e| {
        eprintln!("Mode setup error: {}", e);
        process::exit(1);
    });

    if matches.get_flag("list-modes") {
        handle_list_modes_command(&registry);
        return;
    }

    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing modes");
    let mode_name = matches.get_one::<String>("mode").unwrap();
    let format = matches.get_one::<String>("format").unwrap();
    handle_tokenize_command(&registry, path, mode_name, format, config);
}

/// Handle the tokenize command
fn handle_tokenize_command(
    registry: &ModeRegistry,
    path: &str,
    mode_name: &str,
    format: &str,
    config: ModeConfig,
) {
    let mode: Arc<dyn Mode> = registry.resolve(mode_name).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("\nAvailable modes:");
        for name in registry.available() {
            eprintln!("  {}", name);
        }
        process::exit(1);
    });

    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        process::exit(1);
    });

    let mut highlighter = Highlighter::new(mode, &text, config.tab_size);
    let lines = highlighter.all_tokens();

    match format {
        "json" => {
            let out = serde_json::to_string_pretty(&lines).unwrap_or_else(|e| {
                eprintln!("Error formatting tokens: {}", e);
                process::exit(1);
            });
            println!("{}", out);
        }
        "text" => {
            for (number, tokens) in lines.iter().enumerate() {
                for token in tokens {
                    let text = &highlighter.line(number)[token.start..token.end];
                    let style = token.style.as_ref().map_or("-", |s| s.name());
                    println!("{}:{}..{}\t{}\t{:?}", number, token.start, token.end, style, text);
                }
            }
        }
        other => {
            eprintln!("Format '{}' not supported", other);
            eprintln!("Available formats: text, json");
            process::exit(1);
        }
    }
}

/// Handle the list-modes command
fn handle_list_modes_command(registry: &ModeRegistry) {
    println!("Registered modes:\n");
    for name in registry.available() {
        println!("  {}", name);
    }
}
