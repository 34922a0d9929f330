//! Error types for assembly and execution.
//!
//! The two phases have opposite policies. Assembly is all-or-nothing: any
//! syntax, arity, or range problem aborts the whole translation before any
//! output is written, since a half-written binary is misleading. Execution
//! favors liveness: a malformed instruction is skipped and reported, and the
//! run continues, so one bad word never discards the results already computed
//! for the instructions before it.

use thiserror::Error;

use crate::bytecode::{FieldName, Operation};

/// An operand value that does not fit in its declared field.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("value {value} for field {field} exceeds the {width}-bit maximum of {max}")]
pub struct RangeError {
  pub field: FieldName,
  pub value: u64,
  pub width: u32,
  pub max: u64,
}

/// Fatal assembly errors. Every variant carries the 1-based source line.
#[derive(Debug, Error)]
pub enum AssemblyError {
  /// The mnemonic resolved to no known operation.
  #[error("line {line}: {name} is not an operation")]
  UnknownMnemonic { line: usize, name: String },

  /// The operand count does not match the opcode's declared fields.
  #[error("line {line}: {operation} requires {expected} operands but was given {found}")]
  WrongArity {
    line: usize,
    operation: Operation,
    expected: usize,
    found: usize,
  },

  /// The line tokenized as neither a skippable line nor an instruction.
  #[error("line {line}: malformed instruction: {text}")]
  MalformedLine { line: usize, text: String },

  /// An operand exceeded its field's bit width.
  #[error("line {line}: {source}")]
  FieldRange {
    line: usize,
    #[source]
    source: RangeError,
  },
}

/// Execution errors. `UnknownOpcode` is recovered inside the run loop
/// (skip-and-continue); `TruncatedStream` fails the run before it starts.
#[derive(Debug, Error)]
pub enum ExecutionError {
  #[error("unknown opcode {opcode}")]
  UnknownOpcode { opcode: u8 },

  #[error("instruction stream length {len} is not a multiple of the 9-byte word size")]
  TruncatedStream { len: usize },
}

/// Top-level error for the command line pipeline.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Assembly(#[from] AssemblyError),

  #[error(transparent)]
  Execution(#[from] ExecutionError),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
