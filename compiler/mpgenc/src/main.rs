//! mpgenc CLI
//!
//! Computes the serialization schema closure of a metadata snapshot.

use mpgenc::commands::{collect_command, explain_error, CollectArgs};
use mpgenc::init_tracing;

fn main() {
    let mut args: Vec<String> = std::env::args().collect();

    let trace_tree = args.iter().any(|a| a == "--trace-tree");
    args.retain(|a| a != "--trace-tree");
    init_tracing(trace_tree);

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "collect" => {
            let parsed = match CollectArgs::parse(&args[2..]) {
                Ok(parsed) => parsed,
                Err(message) => {
                    eprintln!("error: {message}");
                    eprintln!("Usage: mpgenc collect <snapshot.json> --root <Type> [options]");
                    std::process::exit(2);
                }
            };
            if !collect_command(&parsed) {
                std::process::exit(1);
            }
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: mpgenc explain <ERROR_CODE>");
                eprintln!("Example: mpgenc explain M2002");
                std::process::exit(1);
            }
            if !explain_error(&args[2]) {
                std::process::exit(1);
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("mpgenc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("mpgenc (MessagePack schema closure)");
    println!();
    println!("Usage: mpgenc <command> [options]");
    println!();
    println!("Commands:");
    println!("  collect <snapshot.json>  Compute the schema model of the given roots");
    println!("  explain <code>           Explain an error code (e.g., M2002)");
    println!("  help                     Show this help message");
    println!("  version                  Show version information");
    println!();
    println!("Collect options:");
    println!("  --root, -r <Type>       Add a root type to the current root set");
    println!("  --set                   Start a new, independent root set");
    println!("  --options <file.json>   Collector options (forceMapMode, ignoredTypeNames,");
    println!("                          customFormatterCatalog)");
    println!("  --format <text|json>    Output format (default: text)");
    println!("  --color <mode>          Diagnostic colors: auto, always, never");
    println!();
    println!("Global options:");
    println!("  --trace-tree            Print engine spans as an indented tree");
    println!("                          (filter with RUST_LOG)");
    println!();
    println!("Exit status is 1 when collection fails or reports errors.");
    println!();
    println!("Examples:");
    println!("  mpgenc collect types.json --root Demo.Person");
    println!("  mpgenc collect types.json -r Demo.Order --set -r Demo.Invoice --format json");
    println!("  mpgenc explain M3001");
}
