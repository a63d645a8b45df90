use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::opcode::{Opcode, mnemonic};

pub const OPERAND_REGISTER: u32 = 0;
pub const OPERAND_LITERAL: u32 = 1;
pub const OPERAND_RAW: u32 = 2;
pub const OPERAND_OFFSET: u32 = 3;
/// Set on constant-pool references; the low bits carry the [`PoolKind`].
pub const OPERAND_KIND: u32 = 0x100;

/// Constant-pool item a `Kind` operand points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Method,
    String,
    Field,
    Type,
    Other(u32),
}

impl PoolKind {
    pub fn from_bits(bits: u32) -> PoolKind {
        match bits {
            0 => PoolKind::Method,
            1 => PoolKind::String,
            2 => PoolKind::Field,
            3 => PoolKind::Type,
            other => PoolKind::Other(other),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            PoolKind::Method => 0,
            PoolKind::String => 1,
            PoolKind::Field => 2,
            PoolKind::Type => 3,
            PoolKind::Other(bits) => bits,
        }
    }
}

/// A decoded instruction argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(u32),
    /// Immediate value. Raw and branch-offset immediates decode here too.
    Literal(i64),
    /// Constant-pool reference with its human-readable descriptor.
    Kind { kind: PoolKind, index: u64, descriptor: String },
}

impl Operand {
    pub fn register(&self) -> Option<u32> {
        match self {
            Operand::Register(reg) => Some(*reg),
            _ => None,
        }
    }

    pub fn is_method_ref(&self) -> bool {
        matches!(self, Operand::Kind { kind: PoolKind::Method, .. })
    }

    /// Decode the bytecode unit's `(tag, value[, descriptor])` encoding.
    pub fn from_tagged(tag: u32, value: i64, descriptor: Option<String>) -> Result<Operand> {
        if tag & OPERAND_KIND != 0 {
            let Some(descriptor) = descriptor else {
                bail!("kind operand (tag {:#x}) is missing its descriptor", tag);
            };
            if value < 0 {
                bail!("kind operand (tag {:#x}) has negative pool index {}", tag, value);
            }
            return Ok(Operand::Kind {
                kind: PoolKind::from_bits(tag & !OPERAND_KIND),
                index: value as u64,
                descriptor,
            });
        }
        match tag {
            OPERAND_REGISTER => match u32::try_from(value) {
                Ok(reg) => Ok(Operand::Register(reg)),
                Err(_) => bail!("register operand out of range: {}", value),
            },
            OPERAND_LITERAL | OPERAND_RAW | OPERAND_OFFSET => Ok(Operand::Literal(value)),
            other => bail!("unknown operand tag {:#x}", other),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(reg) => write!(f, "v{}", reg),
            Operand::Literal(value) => write!(f, "#{}", value),
            Operand::Kind { descriptor, .. } => write!(f, "{}", descriptor),
        }
    }
}

/// Serialized operand form: `[tag, value]` or `[tag, index, "descriptor"]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawOperand {
    Pool(u32, i64, String),
    Plain(u32, i64),
}

impl TryFrom<RawOperand> for Operand {
    type Error = anyhow::Error;

    fn try_from(raw: RawOperand) -> Result<Operand> {
        match raw {
            RawOperand::Pool(tag, index, descriptor) => Operand::from_tagged(tag, index, Some(descriptor)),
            RawOperand::Plain(tag, value) => Operand::from_tagged(tag, value, None),
        }
    }
}

impl From<&Operand> for RawOperand {
    fn from(operand: &Operand) -> RawOperand {
        match operand {
            Operand::Register(reg) => RawOperand::Plain(OPERAND_REGISTER, *reg as i64),
            Operand::Literal(value) => RawOperand::Plain(OPERAND_LITERAL, *value),
            Operand::Kind { kind, index, descriptor } => {
                RawOperand::Pool(OPERAND_KIND | kind.bits(), *index as i64, descriptor.clone())
            }
        }
    }
}

/// One decoded instruction as exposed by the bytecode unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Size in bytes.
    pub length: u32,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(opcode: Opcode, length: u32, operands: Vec<Operand>) -> Self {
        Self { opcode, length, operands }
    }
}

/// Writes `name op0, op1, ...`, falling back to the hex opcode for unnamed instructions.
pub fn write_instruction(f: &mut fmt::Formatter<'_>, opcode: Opcode, operands: &[Operand]) -> fmt::Result {
    match mnemonic(opcode) {
        Some(name) => write!(f, "{}", name)?,
        None => write!(f, "op@{:#04x}", opcode)?,
    }
    for (i, operand) in operands.iter().enumerate() {
        if i == 0 {
            write!(f, " {}", operand)?;
        } else {
            write!(f, ", {}", operand)?;
        }
    }
    Ok(())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_instruction(f, self.opcode, &self.operands)
    }
}
