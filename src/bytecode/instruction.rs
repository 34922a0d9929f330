use std::fmt::{Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};

/**
  Opcodes of the virtual machine.

  Opcode values are fixed at design time and occupy the first six bits of every
  instruction word, so at most 64 opcodes are representable. The mnemonic of
  each opcode is its variant name in SCREAMING_SNAKE_CASE, which is what the
  `strum` derives produce and parse. Mnemonic lookup is case-insensitive.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,           Hash
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[repr(u8)]
pub enum Operation {
  LoadConst,  // mem[B] := C
  LoadMem,    // mem[B] := mem[C]
  StoreMem,   // mem[B] := mem[C] + mem[D]
  BitwiseOr,  // mem[B] := mem[C] | mem[D]
  Add,        // mem[B] := mem[B] + mem[C]
  Xor,        // mem[B] := mem[B] ^ mem[C]
}

/// Names of the operand slots an instruction can carry.
#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum FieldName {
  A,
  B,
  C,
  D,
}

/**
  An operand field descriptor: where the field lives inside the 66-bit operand
  region that follows the opcode, and how wide it is. All pack and unpack
  arithmetic is driven by these descriptors rather than per-opcode offset math.
*/
#[derive(Clone, Copy, Debug)]
pub struct Field {
  pub name   :  FieldName,
  /// Bit offset within the operand region, counted from the most significant bit.
  pub offset :  u32,
  pub width  :  u32,
}

impl Field {
  /// The largest value the field can hold.
  pub const fn max_value(&self) -> u64 {
    (1u64 << self.width) - 1
  }
}

pub const FIELD_A: Field = Field { name: FieldName::A, offset: 0,  width: 6  };
pub const FIELD_B: Field = Field { name: FieldName::B, offset: 6,  width: 20 };
pub const FIELD_C: Field = Field { name: FieldName::C, offset: 26, width: 16 };
pub const FIELD_D: Field = Field { name: FieldName::D, offset: 42, width: 20 };

static THREE_OPERAND_LAYOUT: [Field; 3] = [FIELD_A, FIELD_B, FIELD_C];
static FOUR_OPERAND_LAYOUT:  [Field; 4] = [FIELD_A, FIELD_B, FIELD_C, FIELD_D];

impl Operation {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// The ordered operand fields this opcode declares.
  pub fn layout(&self) -> &'static [Field] {
    match self {
      Operation::StoreMem | Operation::BitwiseOr => &FOUR_OPERAND_LAYOUT,
      _ => &THREE_OPERAND_LAYOUT,
    }
  }

  pub fn arity(&self) -> usize {
    self.layout().len()
  }
}

/// Holds the unencoded components of an instruction. As such, it enumerates the
/// possible instruction argument combinations.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [OpCode:6][A:6][B:20][C:16]
  ThreeOperand {
    operation :  Operation,
    a         :  u64,
    b         :  u64,
    c         :  u64,
  },
  /// [OpCode:6][A:6][B:20][C:16][D:20]
  FourOperand {
    operation :  Operation,
    a         :  u64,
    b         :  u64,
    c         :  u64,
    d         :  u64,
  },
}

impl Instruction {
  /**
    Builds an instruction from positional operands, which bind to the opcode's
    declared fields in order. Returns `None` if the operand count does not
    match the opcode's arity.
  */
  pub fn from_operands(operation: Operation, operands: &[u64]) -> Option<Instruction> {
    match (operation.arity(), operands) {
      (3, &[a, b, c]) => Some(Instruction::ThreeOperand { operation, a, b, c }),
      (4, &[a, b, c, d]) => Some(Instruction::FourOperand { operation, a, b, c, d }),
      _ => None,
    }
  }

  pub fn operation(&self) -> Operation {
    match self {
      | Instruction::ThreeOperand { operation, .. }
      | Instruction::FourOperand { operation, .. } => *operation,
    }
  }

  /// The operand values in field order, matching `Operation::layout()`.
  pub fn operands(&self) -> Vec<u64> {
    match *self {
      Instruction::ThreeOperand { a, b, c, .. } => vec![a, b, c],
      Instruction::FourOperand { a, b, c, d, .. } => vec![a, b, c, d],
    }
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Instruction::ThreeOperand { operation, a, b, c } => {
        write!(f, "{} {} {} {}", operation, a, b, c)
      }

      Instruction::FourOperand { operation, a, b, c, d } => {
        write!(f, "{} {} {} {} {}", operation, a, b, c, d)
      }

    }
  }
}
