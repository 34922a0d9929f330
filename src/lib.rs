/*!
  A minimal assembler plus bytecode virtual machine.

  Source text is translated into a fixed-width binary instruction stream (one
  72-bit word per instruction, see `bytecode`), then executed against a flat
  1024-cell memory with wraparound addressing (see `vm`). A single linear
  pipeline, run once per invocation:

    source text → assemble → (binary stream, log document)
                → run      → (memory snapshot)
*/

pub mod bytecode;
pub mod error;
pub mod vm;

pub use bytecode::{assemble, Instruction, LogEntry, Operation};
pub use error::{AssemblyError, Error, ExecutionError, RangeError};
pub use vm::{Machine, Snapshot, MEMORY_CELLS, SNAPSHOT_CELLS};
