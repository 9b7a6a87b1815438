//! dbc2dbf - Command-line interface
//!
//! Converts a DATASUS `.dbc` file into the `.dbf` file it contains.

use clap::Parser;
use dbc2dbf::{convert_stream, ConversionReport, DbcError};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

/// Inputs above this size get a progress spinner
const PROGRESS_THRESHOLD: u64 = 1024 * 1024;

#[derive(Parser)]
#[command(name = "dbc2dbf")]
#[command(about = "Convert a DATASUS .dbc file to .dbf")]
#[command(version)]
struct Cli {
    /// Input .dbc file
    input: PathBuf,

    /// Output .dbf file
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Fail when data is left over after the compressed stream
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match convert_file(&cli.input, &cli.output, cli.strict, cli.verbose, cli.quiet) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_format_error() {
                eprintln!("make sure the file was downloaded in binary mode and try again");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn convert_file(
    input: &Path,
    output: &Path,
    strict: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), DbcError> {
    let input_file = File::open(input).map_err(|source| DbcError::File {
        path: input.to_path_buf(),
        source,
    })?;
    let input_size = input_file
        .metadata()
        .map_err(|source| DbcError::File {
            path: input.to_path_buf(),
            source,
        })?
        .len();

    if verbose {
        println!("Converting '{}' to '{}'", input.display(), output.display());
        println!("Input size: {} bytes", input_size);
    }

    let output_file = File::create(output).map_err(|source| DbcError::File {
        path: output.to_path_buf(),
        source,
    })?;

    let start_time = Instant::now();

    // Show a spinner for large files
    let progress = if !quiet && input_size > PROGRESS_THRESHOLD {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {bytes} {msg}");
        if let Ok(style) = style {
            pb.set_style(style);
        }
        pb.set_message("Decompressing...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    let writer = progress.wrap_write(BufWriter::new(output_file));
    let report = convert_stream(input_file, writer).map_err(|e| e.with_paths(input, output));
    progress.finish_and_clear();
    let report = report?;

    // Leftover bytes are already logged as a warning by the library
    let report = if strict { report.strict()? } else { report };

    if !quiet {
        print_summary(&report, input_size, start_time.elapsed(), verbose);
    }

    Ok(())
}

fn print_summary(report: &ConversionReport, input_size: u64, elapsed: Duration, verbose: bool) {
    let output_size = report.output_len();
    let ratio = if output_size > 0 {
        (input_size as f64 / output_size as f64) * 100.0
    } else {
        0.0
    };

    println!("✓ Conversion successful!");
    println!("  Input:  {} bytes", input_size);
    println!("  Output: {} bytes", output_size);
    println!("  Ratio:  {:.1}%", ratio);
    println!("  Time:   {:.2?}", elapsed);

    if verbose {
        println!("  Header: {} bytes", report.header_length);
        println!("  Checksum: {:08X} (not verified)", report.checksum);
        println!(
            "  Mode: {:?}, Dictionary: {} bytes",
            report.mode,
            report.dict_size.window_size()
        );
        println!(
            "  Literals: {}, Matches: {}, Longest match: {}",
            report.stats.literal_count, report.stats.match_count, report.stats.longest_match
        );
    }
}
