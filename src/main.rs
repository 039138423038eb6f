// src/main.rs
mod logger;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use huffpack::code::bit_string;
use huffpack::report::{self, LogEntry};
use huffpack::utils::{format_bytes, format_ratio};

#[derive(Parser)]
#[command(name = "huffpack", version = "0.1.0")]
#[command(about = "Huffman file compressor.", long_about = None)]
struct Cli {
    /// Log debug details of every step
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Append a JSON line per processed file to this log
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress one or more files
    Compress {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output path (single input only); defaults to the input with a .huff extension
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore a compressed file
    Decompress {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show the header and code tree of a compressed file
    Inspect {
        input: PathBuf,
        /// Also print every symbol's code
        #[arg(long)]
        codes: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    match cli.command {
        Commands::Compress { inputs, output } => {
            if output.is_some() && inputs.len() > 1 {
                bail!("--output can only be used with a single input");
            }
            let mut failed = 0;
            for input in &inputs {
                let target = output
                    .clone()
                    .unwrap_or_else(|| huffpack::derive_output_name(input));
                if !run_compress(input, &target, cli.log.as_deref()) {
                    failed += 1;
                }
            }
            if failed > 0 {
                eprintln!("{failed} of {} file(s) failed", inputs.len());
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Decompress { input, output } => {
            if !run_decompress(&input, &output, cli.log.as_deref()) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Inspect { input, codes } => show_inspection(&input, codes)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn run_compress(input: &Path, output: &Path, log: Option<&Path>) -> bool {
    let (entry, ok) = match huffpack::compress(input, output) {
        Ok(r) => {
            println!(
                "{} -> {}: {} -> {} ({})",
                input.display(),
                output.display(),
                format_bytes(r.input_bytes),
                format_bytes(r.output_bytes),
                format_ratio(r.ratio())
            );
            (LogEntry::success("compress", input, output, r.input_bytes, r.output_bytes), true)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            (LogEntry::failure("compress", input, output, &e), false)
        }
    };
    record(log, &entry);
    ok
}

fn run_decompress(input: &Path, output: &Path, log: Option<&Path>) -> bool {
    let (entry, ok) = match huffpack::decompress(input, output) {
        Ok(r) => {
            println!(
                "{} -> {}: {} restored",
                input.display(),
                output.display(),
                format_bytes(r.output_bytes)
            );
            (LogEntry::success("decompress", input, output, r.input_bytes, r.output_bytes), true)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            (LogEntry::failure("decompress", input, output, &e), false)
        }
    };
    record(log, &entry);
    ok
}

fn record(log: Option<&Path>, entry: &LogEntry) {
    if let Some(path) = log {
        if let Err(e) = report::append(path, entry) {
            tracing::warn!(path = %path.display(), error = %e, "could not write action log");
        }
    }
}

fn show_inspection(input: &Path, with_codes: bool) -> anyhow::Result<()> {
    let inspection = huffpack::inspect(input)
        .with_context(|| format!("inspecting {}", input.display()))?;

    println!("file:          {}", input.display());
    println!("padding bits:  {}", inspection.header.padding_bits);
    println!("tree bytes:    {}", inspection.header.tree_len);
    println!("payload:       {}", format_bytes(inspection.payload_bytes));

    let Some(tree) = inspection.tree else {
        println!("symbols:       0 (empty input)");
        return Ok(());
    };
    let codes = huffpack::code::CodeTable::from_tree(&tree);
    println!("symbols:       {}", tree.leaf_count());
    println!("max code len:  {}", codes.max_len());

    if with_codes {
        for (symbol, code) in codes.iter() {
            let shown = if symbol.is_ascii_graphic() {
                format!("'{}'", symbol as char)
            } else {
                format!("0x{symbol:02x}")
            };
            println!("  {shown:>6}  {}", bit_string(code));
        }
    }
    Ok(())
}
