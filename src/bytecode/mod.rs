/*!

  The VM uses a 72 bit big-endian instruction word, serialized as exactly 9
  bytes. Every instruction is the same size; the binary stream is a flat
  concatenation of words with no header, count, or padding. The sizes of
  instruction components are as follows:

    Opcode:   6 bits
    A:        6 bits
    B:       20 bits
    C:       16 bits
    D:       20 bits  (STORE_MEM and BITWISE_OR only)

  Operand fields are packed right-justified into fixed bit ranges immediately
  after the opcode, in the order A, B, C, D. Three-operand opcodes leave the
  D range (and the trailing 4 bits) zero. Field positions are declared once as
  `Field` descriptors in `instruction` and consumed generically by `binary`,
  so the encoder and decoder cannot drift apart.

  One design decision that needed to be made is whether to store decoded
  instructions as enum variants with one variant per opcode. Since four of the
  six opcodes share the three-operand shape, variants are keyed on operand
  shape instead, and the opcode itself is a separate one-byte enum. The
  interpreter never materializes an `Instruction` at all: it slices fields
  straight out of the operand region.

*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::{assemble, FieldValues, LogEntry};
pub use binary::{
  encode_instruction, try_decode_instruction, unpack_instruction, EncodedWord, OperandBits,
  OPCODE_BITS, OPERAND_BITS, WORD_BITS, WORD_BYTES,
};
pub use instruction::{
  Field, FieldName, Instruction, Operation, FIELD_A, FIELD_B, FIELD_C, FIELD_D,
};
