//! End-to-end tests of the assemble → run pipeline and its artifacts.

use uvm::bytecode::WORD_BYTES;
use uvm::{assemble, AssemblyError, Machine, Snapshot, SNAPSHOT_CELLS};

fn pipeline(source: &str) -> Snapshot {
  let (stream, _log) = assemble(source).unwrap();
  let mut machine = Machine::new();
  machine.run(&stream).unwrap();
  machine.snapshot()
}

#[test]
fn two_constants_land_in_their_cells() {
  let snapshot = pipeline("LOAD_CONST 0 10 42\nLOAD_CONST 0 20 99\n");
  assert_eq!(snapshot.memory[10], 42);
  assert_eq!(snapshot.memory[20], 99);
}

#[test]
fn add_scenario() {
  let snapshot = pipeline("LOAD_CONST 0 10 42\nLOAD_CONST 0 20 58\nADD 0 10 20\n");
  assert_eq!(snapshot.memory[10], 100);
}

#[test]
fn xor_scenario() {
  let snapshot = pipeline("LOAD_CONST 0 10 6\nLOAD_CONST 0 20 3\nXOR 0 10 20\n");
  assert_eq!(snapshot.memory[10], 5);
}

#[test]
fn store_mem_scenario() {
  let snapshot = pipeline("LOAD_CONST 0 10 5\nLOAD_CONST 0 20 7\nSTORE_MEM 0 30 10 20\n");
  assert_eq!(snapshot.memory[30], 12);
}

#[test]
fn commented_program_with_every_opcode() {
  let source = "\
# seed two cells
LOAD_CONST 0 10 6
LOAD_CONST 0 20 3

LOAD_MEM   0 40 10      # copy mem[10] into mem[40]
STORE_MEM  0 30 10 20   # mem[30] = 6 + 3
BITWISE_OR 0 31 10 20   # mem[31] = 6 | 3
ADD        0 40 20      # mem[40] = 6 + 3
XOR        0 10 20      # mem[10] = 6 ^ 3
";
  let snapshot = pipeline(source);
  assert_eq!(snapshot.memory[30], 9);
  assert_eq!(snapshot.memory[31], 7);
  assert_eq!(snapshot.memory[40], 9);
  assert_eq!(snapshot.memory[10], 5);
}

#[test]
fn fatal_assembly_produces_no_artifacts() {
  let result = assemble("LOAD_CONST 0 10 42\nFOO 1 2 3\n");
  assert!(matches!(result, Err(AssemblyError::UnknownMnemonic { line: 2, .. })));
}

#[test]
fn stream_is_a_flat_concatenation_of_words() {
  let (stream, log) = assemble("LOAD_CONST 0 10 42\nADD 0 10 10\nXOR 0 10 10\n").unwrap();
  assert_eq!(stream.len(), 3 * WORD_BYTES);
  assert_eq!(log.len(), 3);
  // Each log entry's hex must match its slice of the stream.
  for (index, entry) in log.iter().enumerate() {
    let word = &stream[index * WORD_BYTES..(index + 1) * WORD_BYTES];
    let hex: String = word.iter().map(|byte| format!("{byte:02x}")).collect();
    assert_eq!(entry.binary, hex);
  }
}

#[test]
fn result_document_shape() {
  let snapshot = pipeline("LOAD_CONST 0 0 1\n");
  let document = serde_json::to_value(&snapshot).unwrap();
  let memory = document["memory"].as_array().unwrap();
  assert_eq!(memory.len(), SNAPSHOT_CELLS);
  assert_eq!(memory[0], 1);
}
