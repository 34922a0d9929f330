/*!
  The human readable textual form of bytecode is called assembly. One
  instruction per line: a mnemonic followed by whitespace-separated
  non-negative decimal operands. Blank lines and lines whose first non-space
  character is `#` are skipped, and a trailing `# comment` may follow an
  instruction. Assembly is validate-then-commit: any error aborts the whole
  translation and no partial stream or log is produced.
*/
use std::str::FromStr;

use nom::{
  bytes::complete::take_while1,
  character::complete::{char as one_char, digit1, space0, space1},
  combinator::{all_consuming, map_res, opt, rest},
  multi::many0,
  sequence::{delimited, pair, preceded},
  IResult,
};
use serde::Serialize;

use super::binary::encode_instruction;
use super::{Instruction, Operation};
use crate::error::AssemblyError;

/// Resolved operand values of one assembled instruction, for the log document.
/// `D` is omitted from serialization for three-operand opcodes.
#[derive(Clone, Debug, Serialize)]
pub struct FieldValues {
  #[serde(rename = "A")]
  pub a: u64,
  #[serde(rename = "B")]
  pub b: u64,
  #[serde(rename = "C")]
  pub c: u64,
  #[serde(rename = "D", skip_serializing_if = "Option::is_none")]
  pub d: Option<u64>,
}

impl From<&Instruction> for FieldValues {
  fn from(instruction: &Instruction) -> FieldValues {
    match *instruction {
      Instruction::ThreeOperand { a, b, c, .. } => FieldValues { a, b, c, d: None },
      Instruction::FourOperand { a, b, c, d, .. } => FieldValues { a, b, c, d: Some(d) },
    }
  }
}

/// One record per assembled instruction: the mnemonic, the resolved operand
/// values, and the hex rendering of the encoded word. Append-only audit
/// artifact; nothing inside the machine reads it back.
#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
  pub command: &'static str,
  pub fields: FieldValues,
  pub binary: String,
}

fn mnemonic(input: &str) -> IResult<&str, &str> {
  take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn operand(input: &str) -> IResult<&str, u64> {
  map_res(digit1, |digits: &str| digits.parse::<u64>())(input)
}

fn instruction_line(input: &str) -> IResult<&str, (&str, Vec<u64>)> {
  all_consuming(delimited(
    space0,
    pair(mnemonic, many0(preceded(space1, operand))),
    preceded(space0, opt(preceded(one_char('#'), rest))),
  ))(input)
}

fn hex_word(word: &[u8]) -> String {
  word.iter().map(|byte| format!("{byte:02x}")).collect()
}

/**
  Translates a source program into the binary instruction stream plus its log
  document. Instructions are packed and appended in source order. The first
  error aborts the whole assembly; callers get either both complete artifacts
  or neither.
*/
pub fn assemble(text: &str) -> Result<(Vec<u8>, Vec<LogEntry>), AssemblyError> {
  let mut stream = Vec::new();
  let mut log = Vec::new();

  for (index, raw_line) in text.lines().enumerate() {
    let line = index + 1;
    let trimmed = raw_line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
      continue;
    }

    let (name, operands) = match instruction_line(raw_line) {
      Ok((_rest, parsed)) => parsed,
      Err(_) => {
        return Err(AssemblyError::MalformedLine { line, text: trimmed.to_string() });
      }
    };

    let operation = Operation::from_str(name).map_err(|_| AssemblyError::UnknownMnemonic {
      line,
      name: name.to_string(),
    })?;

    let instruction =
      Instruction::from_operands(operation, &operands).ok_or(AssemblyError::WrongArity {
        line,
        operation,
        expected: operation.arity(),
        found: operands.len(),
      })?;

    let word = encode_instruction(&instruction)
      .map_err(|source| AssemblyError::FieldRange { line, source })?;

    stream.extend_from_slice(&word);
    log.push(LogEntry {
      command: operation.into(),
      fields: FieldValues::from(&instruction),
      binary: hex_word(&word),
    });
  }

  Ok((stream, log))
}

#[cfg(test)]
mod tests {
  use super::super::binary::WORD_BYTES;
  use super::*;

  #[test]
  fn assembles_in_source_order() {
    let (stream, log) = assemble("LOAD_CONST 0 10 42\nLOAD_CONST 0 20 99\n").unwrap();
    assert_eq!(stream.len(), 2 * WORD_BYTES);
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].command, "LOAD_CONST");
    assert_eq!(log[0].fields.b, 10);
    assert_eq!(log[0].fields.c, 42);
    assert_eq!(log[1].fields.b, 20);
  }

  #[test]
  fn skips_blank_and_comment_lines() {
    let source = "\n# a comment\n   \nLOAD_CONST 0 10 42   # trailing comment\n\n";
    let (stream, log) = assemble(source).unwrap();
    assert_eq!(stream.len(), WORD_BYTES);
    assert_eq!(log.len(), 1);
  }

  #[test]
  fn mnemonics_are_case_normalized() {
    let (_, log) = assemble("load_const 0 10 42\nXor 0 10 20\n").unwrap();
    assert_eq!(log[0].command, "LOAD_CONST");
    assert_eq!(log[1].command, "XOR");
  }

  #[test]
  fn unknown_mnemonic_is_fatal() {
    let error = assemble("LOAD_CONST 0 10 42\nFOO 1 2 3\n").unwrap_err();
    match error {
      AssemblyError::UnknownMnemonic { line, name } => {
        assert_eq!(line, 2);
        assert_eq!(name, "FOO");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn wrong_arity_is_fatal() {
    assert!(matches!(
      assemble("ADD 0 10\n"),
      Err(AssemblyError::WrongArity { line: 1, expected: 3, found: 2, .. })
    ));
    assert!(matches!(
      assemble("STORE_MEM 0 30 10 20 7\n"),
      Err(AssemblyError::WrongArity { line: 1, expected: 4, found: 5, .. })
    ));
  }

  #[test]
  fn malformed_operands_are_fatal() {
    assert!(matches!(
      assemble("LOAD_CONST 0 ten 42\n"),
      Err(AssemblyError::MalformedLine { line: 1, .. })
    ));
    assert!(matches!(
      assemble("LOAD_CONST 0 -1 42\n"),
      Err(AssemblyError::MalformedLine { line: 1, .. })
    ));
  }

  #[test]
  fn out_of_range_operand_is_fatal() {
    // C is 16 bits wide.
    assert!(matches!(
      assemble("LOAD_CONST 0 10 65536\n"),
      Err(AssemblyError::FieldRange { line: 1, .. })
    ));
  }

  #[test]
  fn log_records_the_hex_word() {
    let (_, log) = assemble("LOAD_CONST 0 10 42\n").unwrap();
    assert_eq!(log[0].binary, "0000000a002a000000");
  }

  #[test]
  fn log_entry_serialization_shape() {
    let (_, log) = assemble("LOAD_CONST 0 10 42\nSTORE_MEM 0 30 10 20\n").unwrap();

    let three = serde_json::to_value(&log[0]).unwrap();
    assert_eq!(three["command"], "LOAD_CONST");
    assert_eq!(three["fields"]["B"], 10);
    assert!(three["fields"].get("D").is_none());

    let four = serde_json::to_value(&log[1]).unwrap();
    assert_eq!(four["fields"]["D"], 20);
  }
}
