//! c6 compiler CLI.

use c6_ir::SharedFiles;
use c6c::{
    check_files, init_tracing, lex_file, parse_file, CliError, DriverConfig, Outcome, THREADS_ENV,
};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let threads_env = std::env::var(THREADS_ENV).ok();
    let (config, positional) = match DriverConfig::from_args(&args[2..], threads_env.as_deref()) {
        Ok(parsed) => parsed,
        Err(err) => fail(&err),
    };

    init_tracing();
    let files = SharedFiles::new();

    let result = match command.as_str() {
        "lex" | "parse" => {
            let [path] = positional.as_slice() else {
                eprintln!("Usage: c6c {command} <file.c6>");
                std::process::exit(1);
            };
            if command == "lex" {
                lex_file(&files, path)
            } else {
                parse_file(&files, path)
            }
        }
        "check" => {
            if positional.is_empty() {
                eprintln!("Usage: c6c check <files...> [--threads N]");
                std::process::exit(1);
            }
            check_files(&files, &positional, &config)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("c6c {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    match result {
        Ok(outcome) => finish(&outcome),
        Err(err) => fail(&err),
    }
}

fn finish(outcome: &Outcome) {
    print!("{}", outcome.output);
    for error in &outcome.errors {
        eprint!("{error}");
    }
    if !outcome.success() {
        std::process::exit(1);
    }
}

fn fail(err: &CliError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(2);
}

fn print_usage() {
    println!("c6 compiler");
    println!();
    println!("Usage: c6c <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file.c6>        Tokenize and display tokens");
    println!("  parse <file.c6>      Parse and display the syntax tree");
    println!("  check <files...>     Parse files in parallel and report errors");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --threads N, -j N    Worker threads for check");
    println!("                       (default: ${THREADS_ENV}, else one per CPU)");
    println!();
    println!("Logging:");
    println!("  C6_LOG=<filter>      e.g. C6_LOG=c6_parse=debug (falls back to RUST_LOG)");
}
