//! Standalone validator for verdict table files.
//!
//! Checks that every status code has non-empty verdict text that fits
//! into a Telegram message, and previews the resulting notifications.

use std::process::ExitCode;

use clap::Parser;
use serde_json::json;

use homework_status_bot::config::{MAX_MESSAGE_LENGTH, VerdictTable};
use homework_status_bot::practicum::parse_status;

/// Verdict table validator.
#[derive(Parser, Debug)]
#[command(name = "validate_verdicts")]
#[command(about = "Validates verdict table files for the homework bot")]
#[command(version)]
struct Args {
    /// Path to the verdict table JSON file to validate.
    #[arg(short, long, default_value = "verdicts.json")]
    file: String,

    /// Generate an example verdict table at the specified path.
    #[arg(long)]
    generate_example: Option<String>,

    /// Show the notification each status would produce.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(output_path) = args.generate_example {
        return generate_example(&output_path);
    }

    validate_table(&args.file, args.verbose)
}

fn generate_example(output_path: &str) -> ExitCode {
    let example = VerdictTable::default();

    match example.save_to_file(output_path) {
        Ok(()) => {
            println!("✓ Example verdict table written to: {output_path}");
            println!("\nThe file contains {} statuses.", example.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Failed to write example file: {e}");
            ExitCode::FAILURE
        }
    }
}

fn validate_table(path: &str, verbose: bool) -> ExitCode {
    println!("Validating: {path}\n");

    let table = match VerdictTable::load_from_file(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("✗ Failed to load verdict table: {e}");
            return ExitCode::FAILURE;
        }
    };

    let results = table.validate_all();
    let total = results.len();
    let mut errors = 0;

    for (status, result) in &results {
        match result {
            Ok(()) => {
                if verbose {
                    println!("[{status}] ✓ OK");
                    let record = json!({"homework_name": "example", "status": status});
                    if let Ok(report) = parse_status(&record, &table) {
                        println!("  → {}", report.message);
                    }
                }
            }
            Err(e) => {
                errors += 1;
                println!("[{status}] ✗ Error: {e}");
            }
        }
    }

    println!();

    if errors == 0 {
        println!("✓ All {total} verdicts are valid!");
        println!("  Telegram message limit: {MAX_MESSAGE_LENGTH} chars");
        ExitCode::SUCCESS
    } else {
        println!("✗ Validation failed: {errors} error(s) in {total} verdicts");
        ExitCode::FAILURE
    }
}
