//! Bytecode-facing types: opcodes, operands, instructions, and the
//! collaborator interfaces the analysis consumes.

mod dump;
pub mod opcode;
mod operand;
mod unit;

pub use dump::*;
pub use opcode::{Opcode, OpcodeClass};
pub use operand::*;
pub use unit::*;
