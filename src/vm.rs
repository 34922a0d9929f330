//! Structures and functions for the virtual machine that executes an encoded
//! instruction stream against a flat indexed memory.
//!
//! There is no program counter beyond sequential consumption: the stream is
//! read strictly in 9-byte blocks and execution order equals stream order.
//! Every address operand is reduced modulo the memory size before use, so no
//! access can ever be out of range. A malformed word is reported and skipped;
//! it never aborts the run.

use std::convert::TryFrom;

use serde::Serialize;
use tracing::warn;

use crate::bytecode::{
  unpack_instruction, EncodedWord, Operation, FIELD_B, FIELD_C, FIELD_D, WORD_BYTES,
};
use crate::error::ExecutionError;

#[cfg(feature = "trace_execution")]
use lazy_static::lazy_static;
#[cfg(feature = "trace_execution")]
use prettytable::{format as TableFormat, row, Table};

/// Number of memory cells the machine owns.
pub const MEMORY_CELLS: usize = 1024;
/// Number of leading cells reported in the result snapshot.
pub const SNAPSHOT_CELLS: usize = 256;

/// The result document: the first 256 memory cells after the full stream has
/// been consumed. Serializes as `{"memory": [...]}`.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
  pub memory: Vec<u64>,
}

#[cfg(feature = "trace_execution")]
lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/// The virtual machine. Owns its memory exclusively for the lifetime of a run.
pub struct Machine {
  memory: Vec<u64>,
}

impl Machine {
  pub fn new() -> Machine {
    Machine { memory: vec![0; MEMORY_CELLS] }
  }

  /**
    Consumes the instruction stream in order, one 9-byte word at a time.

    A stream whose length is not a multiple of the word size is rejected
    before anything executes. Per-instruction failures (opcode bits naming no
    operation) are reported through `tracing` and skipped, and the run
    continues with the next word.
  */
  pub fn run(&mut self, stream: &[u8]) -> Result<(), ExecutionError> {
    let blocks = stream.chunks_exact(WORD_BYTES);
    if !blocks.remainder().is_empty() {
      return Err(ExecutionError::TruncatedStream { len: stream.len() });
    }

    for (index, block) in blocks.enumerate() {
      let mut word: EncodedWord = [0; WORD_BYTES];
      word.copy_from_slice(block);

      match self.step(&word) {
        Ok(_operation) => {
          #[cfg(feature = "trace_execution")]
          self.print_memory_table(index, _operation);
        }
        Err(error) => {
          warn!(instruction = index, %error, "instruction skipped");
        }
      }
    }

    Ok(())
  }

  /// Executes a single word against memory.
  fn step(&mut self, word: &EncodedWord) -> Result<Operation, ExecutionError> {
    let (opcode, operands) = unpack_instruction(word);
    let operation =
      Operation::try_from(opcode).map_err(|_| ExecutionError::UnknownOpcode { opcode })?;

    // B, C, and D are pre-reduced modulo the memory size, making any further
    // bounds check unreachable. A is decoded but consulted by no operation.
    let b = reduce(operands.field(&FIELD_B));
    let c = reduce(operands.field(&FIELD_C));

    match operation {
      Operation::LoadConst => {
        self.memory[b] = c as u64;
      }
      Operation::LoadMem => {
        self.memory[b] = self.memory[c];
      }
      Operation::StoreMem => {
        let d = reduce(operands.field(&FIELD_D));
        self.memory[b] = self.memory[c].wrapping_add(self.memory[d]);
      }
      Operation::BitwiseOr => {
        let d = reduce(operands.field(&FIELD_D));
        self.memory[b] = self.memory[c] | self.memory[d];
      }
      Operation::Add => {
        self.memory[b] = self.memory[b].wrapping_add(self.memory[c]);
      }
      Operation::Xor => {
        self.memory[b] ^= self.memory[c];
      }
    }

    Ok(operation)
  }

  /// Produces the result snapshot: the first 256 cells, regardless of how many
  /// instructions actually wrote anything.
  pub fn snapshot(&self) -> Snapshot {
    Snapshot { memory: self.memory[..SNAPSHOT_CELLS].to_vec() }
  }

  #[cfg(feature = "trace_execution")]
  fn print_memory_table(&self, index: usize, operation: Operation) {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (address, cell) in self.memory.iter().enumerate() {
      if *cell != 0 {
        table.add_row(row![r->format!("mem[{}] =", address), format!("{}", cell)]);
      }
    }

    println!("[{}] {}", index, operation);
    table.printstd();
  }
}

impl Default for Machine {
  fn default() -> Machine {
    Machine::new()
  }
}

/// Wraparound addressing: every address is valid by construction.
fn reduce(address: u64) -> usize {
  (address as usize) % MEMORY_CELLS
}
