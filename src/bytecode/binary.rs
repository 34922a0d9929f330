/*!
  This module is responsible for the encoding and decoding of binary instructions.

  A word is 72 bits serialized big-endian as exactly 9 bytes. Bit 0 is the most
  significant bit of byte 0. The opcode occupies bits [0, 6); the remaining 66
  bits form the operand region, which each opcode slices according to its field
  layout. Field positions are declared once in `instruction::Field` descriptors
  and consumed here by a single generic shift/mask routine, so pack and unpack
  are mutual inverses by construction for any in-range operand values.
*/
use std::convert::TryFrom;

use super::instruction::{FIELD_A, FIELD_B, FIELD_C, FIELD_D};
use super::{Instruction, Operation};
use crate::error::RangeError;

pub const WORD_BYTES: usize = 9;
pub const WORD_BITS: u32 = 72;
pub const OPCODE_BITS: u32 = 6;
pub const OPERAND_BITS: u32 = WORD_BITS - OPCODE_BITS;

/// One complete encoded instruction word.
pub type EncodedWord = [u8; WORD_BYTES];

/// The 66-bit operand region of an unpacked word, kept right-justified in a
/// `u128` so fields can be sliced without re-reading the byte buffer.
#[derive(Clone, Copy, Debug)]
pub struct OperandBits(u128);

impl OperandBits {
  /// Slices the named field out of the operand region.
  pub fn field(&self, field: &super::Field) -> u64 {
    let shift = OPERAND_BITS - field.offset - field.width;
    ((self.0 >> shift) & ((1u128 << field.width) - 1)) as u64
  }
}

/**
  Encodes the instruction into a 9-byte word: the opcode lands in bits [0, 6),
  then each operand is written right-justified into its declared bit range.
  A value wider than its field is a `RangeError`; nothing is written for a
  failing instruction.
*/
pub fn encode_instruction(instruction: &Instruction) -> Result<EncodedWord, RangeError> {
  let operation = instruction.operation();
  let mut word: u128 = (operation.code() as u128) << OPERAND_BITS;

  for (field, value) in operation.layout().iter().zip(instruction.operands()) {
    if value > field.max_value() {
      return Err(RangeError {
        field: field.name,
        value,
        width: field.width,
        max: field.max_value(),
      });
    }
    let shift = OPERAND_BITS - field.offset - field.width;
    word |= (value as u128) << shift;
  }

  let bytes = word.to_be_bytes();
  let mut encoded = [0u8; WORD_BYTES];
  encoded.copy_from_slice(&bytes[16 - WORD_BYTES..]);
  Ok(encoded)
}

/// Splits a word into its raw opcode bits and its operand region. The opcode
/// is not validated here; interpretation of bad opcodes is the caller's policy.
pub fn unpack_instruction(word: &EncodedWord) -> (u8, OperandBits) {
  let mut buffer = [0u8; 16];
  buffer[16 - WORD_BYTES..].copy_from_slice(word);
  let bits = u128::from_be_bytes(buffer);
  let opcode = (bits >> OPERAND_BITS) as u8;
  (opcode, OperandBits(bits & ((1u128 << OPERAND_BITS) - 1)))
}

/// Decodes a word back into an `Instruction`, or `None` when the opcode bits
/// name no known operation.
pub fn try_decode_instruction(word: &EncodedWord) -> Option<Instruction> {
  let (opcode, operands) = unpack_instruction(word);
  let operation = Operation::try_from(opcode).ok()?;

  let a = operands.field(&FIELD_A);
  let b = operands.field(&FIELD_B);
  let c = operands.field(&FIELD_C);

  let instruction = match operation.arity() {
    4 => Instruction::FourOperand {
      operation,
      a,
      b,
      c,
      d: operands.field(&FIELD_D),
    },
    _ => Instruction::ThreeOperand { operation, a, b, c },
  };

  Some(instruction)
}
