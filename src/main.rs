//! CLI tool to inspect JASS expressions: dump tokens, trees, or
//! canonical formatting.

use std::fs;
use std::process::ExitCode;

use jass_syntax::{Error, LineIndex};

fn usage() -> ExitCode {
    eprintln!("Usage: jass <command> [files...]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  tokens    Print one token per line");
    eprintln!("  tree      Print each expression as an s-expression");
    eprintln!("  fmt       Print each expression in canonical form");
    eprintln!("  validate  Check that every expression parses");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  jass tokens script.j");
    eprintln!("  jass tree exprs.txt");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return usage();
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if !matches!(command, "tokens" | "tree" | "fmt" | "validate") {
        eprintln!("Unknown command: {command}");
        return usage();
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        if let Err(e) = run(command, &content) {
            let pos = LineIndex::new(&content).position(e.offset());
            eprintln!("{path}:{}:{}: {e}", pos.line, pos.column);
            had_error = true;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(command: &str, content: &str) -> Result<(), Error> {
    if command == "tokens" {
        for token in jass_syntax::tokenize(content)? {
            match &token.value {
                Some(value) => println!("{}\t{:?}\t{value}", token.loc, token.kind),
                None => println!("{}\t{:?}", token.loc, token.kind),
            }
        }
        return Ok(());
    }

    let exprs = jass_syntax::parse_str(content)?;
    match command {
        "tree" => {
            for expr in &exprs {
                println!("{}", jass_syntax::format_tree(&expr.ast));
            }
        }
        "fmt" => {
            for expr in &exprs {
                println!("{}", jass_syntax::format(&expr.ast));
            }
        }
        _ => {
            let nodes: usize = exprs.iter().map(|e| e.ast.len()).sum();
            eprintln!("valid ({} expression(s), {nodes} node(s))", exprs.len());
        }
    }
    Ok(())
}
