//! Converts an fvecs vector file into the benchmark's `.bin` layout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fenestra_io::{read_fvecs, write_vector_set};

#[derive(Debug, Parser)]
#[command(
    name = "fvecs-to-bin",
    about = "Convert an fvecs file to the u32-header .bin vector layout."
)]
struct Args {
    /// Input file in fvecs layout.
    input: PathBuf,
    /// Output file in .bin layout.
    output: PathBuf,
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let set = read_fvecs(&args.input)
        .with_context(|| format!("failed to read `{}`", args.input.display()))?;
    println!("Read {} vectors of dimension {}", set.count, set.dim);
    write_vector_set(&args.output, set.count, set.dim, &set.values)
        .with_context(|| format!("failed to write `{}`", args.output.display()))?;
    println!("Conversion complete: {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
