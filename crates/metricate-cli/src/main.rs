//! metricate - rewrite imperial quantities in SI
//!
//! Usage:
//!   metricate "I am 6 feet tall"          # Single message
//!   echo "10 feet and 4 inches" | metricate  # Pipe mode, one message per line
//!   metricate -f notes.txt                 # File mode
//!   metricate -l de-DE "10,5 feet"         # Other number formats
//!   metricate --list-units                 # Supported units

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use metricate_core::{Engine, Registry, DEFAULT_LOCALE};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "metricate")]
#[command(about = "Convert imperial units in text to SI, keeping significant figures", long_about = None)]
struct Args {
    /// Message to convert
    message: Option<String>,

    /// Convert every line of a file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Number format to read literals in (repeatable)
    #[arg(short, long, value_name = "LOCALE", default_value = DEFAULT_LOCALE)]
    locale: Vec<String>,

    /// Load unit definitions from a JSON file instead of the bundled set
    #[arg(short, long, value_name = "FILE")]
    units: Option<PathBuf>,

    /// List supported units by type and exit
    #[arg(long)]
    list_units: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let registry = match &args.units {
        Some(path) => Arc::new(
            Registry::from_path(path)
                .with_context(|| format!("loading unit definitions from {}", path.display()))?,
        ),
        None => Registry::bundled(),
    };

    if args.list_units {
        print_units(&registry);
        return Ok(());
    }

    let engine = Engine::with_registry(registry);

    if let Some(message) = &args.message {
        convert_and_print(&engine, message, &args.locale)?;
    } else if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        for line in content.lines() {
            convert_and_print(&engine, line, &args.locale)?;
        }
    } else if !io::stdin().is_terminal() {
        for line in io::stdin().lock().lines() {
            convert_and_print(&engine, &line?, &args.locale)?;
        }
    } else {
        eprintln!("Usage: metricate <message>");
        eprintln!("       metricate -f <file>");
        eprintln!("       echo \"6 feet\" | metricate");
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Print the converted message, or the message itself when nothing matched
fn convert_and_print(engine: &Engine, message: &str, locales: &[String]) -> Result<()> {
    match engine.process(message, locales)? {
        Some(converted) => println!("{converted}"),
        None => println!("{message}"),
    }
    Ok(())
}

fn print_units(registry: &Registry) {
    for (unit_type, names) in registry.units_by_type() {
        println!("{unit_type}: {}", names.join(", "));
    }
}
