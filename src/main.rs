// MiniWhile: lexical and syntax analyzer for the DO/WHILE mini-language

use std::fs;
use std::io::Read;
use std::path::Path;

use miniwhile::analyzer::{analyze, Analysis};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().collect();

    let source = match args.get(1).map(|s| s.as_str()) {
        Some("-h") | Some("--help") => {
            let program_name = args.first().map(|s| s.as_str()).unwrap_or("miniwhile");
            eprintln!("Usage: {} [file.mw]", program_name);
            eprintln!();
            eprintln!("Analyzes a MiniWhile program and reports its tokens,");
            eprintln!("token counts, symbol table, program structure, and the");
            eprintln!("first error found. Reads stdin when no file is given.");
            eprintln!();
            eprintln!("Example program:");
            eprintln!("  int x = 5; DO x = x + 1; ENDDO WHILE(int x == 6) ENDWHILE");
            return Ok(());
        }
        Some(path) => {
            if !Path::new(path).exists() {
                eprintln!("Error: File '{}' not found", path);
                eprintln!(
                    "Usage: {} [file.mw]",
                    args.first().map(|s| s.as_str()).unwrap_or("miniwhile")
                );
                std::process::exit(1);
            }
            fs::read_to_string(path)?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let analysis = analyze(&source);
    print_report(&analysis);

    if analysis.error.is_some() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report(analysis: &Analysis) {
    println!("Tokens:");
    println!("  {:<12} {:<12} {:>4} {:>8}", "KIND", "VALUE", "LINE", "POS");
    for token in &analysis.tokens {
        let loc = token.location();
        println!(
            "  {:<12} {:<12} {:>4} {:>8}",
            token.kind_name(),
            token.text(),
            loc.line,
            loc.offset
        );
    }

    println!();
    println!("Token counts:");
    println!("  reserved words: {}", analysis.counts.reserved);
    println!("  identifiers:    {}", analysis.counts.identifiers);
    println!("  numbers:        {}", analysis.counts.numbers);
    println!("  other symbols:  {}", analysis.counts.symbols);

    println!();
    println!("Symbol table:");
    if analysis.symbols.is_empty() {
        println!("  (empty)");
    }
    for (name, value) in analysis.symbols.iter() {
        println!("  {} = {}", name, value);
    }

    println!();
    match &analysis.ast {
        Some(program) => println!("Program structure:\n{:#?}", program),
        None => println!("Program structure: (parse failed)"),
    }

    println!();
    match &analysis.error {
        Some(message) => println!("Error: {}", message),
        None => println!("No errors."),
    }
}
