use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use uvm::{assemble, Error, LogEntry, Machine};

#[derive(Parser)]
#[command(name = "uvm", about = "Assembler and interpreter for a 72-bit-word bytecode virtual machine")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Assemble a source program into a binary instruction stream plus a log document.
  Asm {
    /// Assembly source file.
    source: PathBuf,

    /// Output path for the binary instruction stream.
    #[arg(long, default_value = "program.bin")]
    binary: PathBuf,

    /// Output path for the per-instruction JSON log.
    #[arg(long, default_value = "program_log.json")]
    log: PathBuf,
  },

  /// Execute an existing binary instruction stream.
  Run {
    /// Binary instruction stream file.
    binary: PathBuf,

    /// Output path for the JSON result snapshot.
    #[arg(long, default_value = "result.json")]
    result: PathBuf,
  },

  /// Assemble and execute in one invocation.
  Exec {
    /// Assembly source file.
    source: PathBuf,

    /// Output path for the binary instruction stream.
    #[arg(long, default_value = "program.bin")]
    binary: PathBuf,

    /// Output path for the per-instruction JSON log.
    #[arg(long, default_value = "program_log.json")]
    log: PathBuf,

    /// Output path for the JSON result snapshot.
    #[arg(long, default_value = "result.json")]
    result: PathBuf,
  },
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let cli = Cli::parse();
  if let Err(error) = dispatch(cli.command) {
    eprintln!("error: {error}");
    std::process::exit(1);
  }
}

fn dispatch(command: Command) -> Result<(), Error> {
  match command {

    Command::Asm { source, binary, log } => {
      assemble_to_files(&source, &binary, &log)?;
    }

    Command::Run { binary, result } => {
      let stream = fs::read(&binary)?;
      run_to_file(&stream, &result)?;
    }

    Command::Exec { source, binary, log, result } => {
      let stream = assemble_to_files(&source, &binary, &log)?;
      run_to_file(&stream, &result)?;
    }

  }
  Ok(())
}

/// Assembles the source file and, only on full success, writes both artifacts.
fn assemble_to_files(source: &Path, binary: &Path, log: &Path) -> Result<Vec<u8>, Error> {
  let text = fs::read_to_string(source)?;
  let (stream, entries): (Vec<u8>, Vec<LogEntry>) = assemble(&text)?;

  fs::write(binary, &stream)?;
  fs::write(log, serde_json::to_string_pretty(&entries)?)?;
  info!(
    instructions = entries.len(),
    binary = %binary.display(),
    log = %log.display(),
    "assembly complete"
  );

  Ok(stream)
}

/// Runs the stream and writes the snapshot document.
fn run_to_file(stream: &[u8], result: &Path) -> Result<(), Error> {
  let mut machine = Machine::new();
  machine.run(stream)?;

  let snapshot = machine.snapshot();
  fs::write(result, serde_json::to_string_pretty(&snapshot)?)?;
  info!(result = %result.display(), "execution complete");

  Ok(())
}
