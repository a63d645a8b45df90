use std::fmt;

use tracing::{debug, trace};

use crate::bytecode::opcode::{self, CONST_4, RETURN};
use crate::bytecode::{Instruction, Opcode, OpcodeClass, Operand, PoolKind};

use super::registers::RegisterFile;
use super::trace::{Trace, TraceEntry};
use super::value::{ObjectHandle, SymbolicValue};

/// How far into a method the interpreter consumes instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceBound {
    /// Consume every instruction.
    #[default]
    Unbounded,
    /// Stop once the running byte offset exceeds this value.
    Ceiling(i64),
}

impl TraceBound {
    /// Raw ceiling value meaning "no ceiling".
    pub const UNBOUNDED_SENTINEL: i64 = -1;

    pub fn from_raw(raw: i64) -> TraceBound {
        if raw == Self::UNBOUNDED_SENTINEL {
            TraceBound::Unbounded
        } else {
            TraceBound::Ceiling(raw)
        }
    }
}

impl From<i64> for TraceBound {
    fn from(raw: i64) -> Self {
        TraceBound::from_raw(raw)
    }
}

/// Bounded, branch-free register tracker over a method's instruction prefix.
///
/// Instructions are consumed strictly in program order. Every instruction is
/// appended to the [`Trace`]; only constant loads, result moves, field and
/// array reads, `new-instance` and `invoke-virtual` touch the
/// [`RegisterFile`].
#[derive(Debug, Default)]
pub struct Interpreter {
    registers: RegisterFile,
    trace: Trace,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interpreter and immediately load `instructions`.
    pub fn with_instructions<'a, I>(instructions: I, max_trace: TraceBound, extra_offset: i64) -> Self
    where
        I: IntoIterator<Item = &'a Instruction>,
    {
        let mut interp = Self::new();
        interp.load_instructions(instructions, max_trace, extra_offset);
        interp
    }

    /// Consume instructions until the running byte offset exceeds `max_trace`,
    /// then keep going for `extra_offset` more instructions. The instruction
    /// that crosses the ceiling is always recorded.
    pub fn load_instructions<'a, I>(&mut self, instructions: I, max_trace: TraceBound, extra_offset: i64)
    where
        I: IntoIterator<Item = &'a Instruction>,
    {
        let mut extra = extra_offset;
        let mut offset: i64 = 0;
        for ins in instructions {
            self.step(ins);
            let TraceBound::Ceiling(ceiling) = max_trace else {
                continue;
            };
            offset += i64::from(ins.length);
            if offset > ceiling {
                if extra <= 0 {
                    debug!(offset, ceiling, traced = self.trace.len(), "trace bound reached");
                    break;
                }
                extra -= 1;
            }
        }
    }

    pub fn step(&mut self, ins: &Instruction) {
        self.add(ins.opcode, ins.operands.clone());
    }

    /// Record one instruction and apply its effect on the register file.
    pub fn add(&mut self, opcode: Opcode, operands: Vec<Operand>) {
        let class = OpcodeClass::of(opcode);
        trace!(opcode, ?class, "consume");
        apply(&mut self.registers, class, &operands);
        self.trace.push(TraceEntry::new(opcode, operands));
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// True when any recorded instruction is a conditional branch or a switch,
    /// i.e. the straight-line assumption may not hold for this prefix.
    pub fn has_if_or_switch(&self) -> bool {
        self.trace.iter().any(|entry| opcode::is_branch(entry.opcode))
    }

    /// Recognises the `const/4 vX, #lit; return vX` shape of a method that
    /// returns a constant boolean. `None` for any other trace.
    pub fn boolean_return(&self) -> Option<bool> {
        let [first, last] = self.trace.entries() else {
            return None;
        };
        if first.opcode != CONST_4 || last.opcode != RETURN {
            return None;
        }
        let (Some(Operand::Register(reg)), Some(Operand::Literal(lit))) = (first.operands.first(), first.operands.get(1))
        else {
            return None;
        };
        if last.operands.first().and_then(Operand::register) != Some(*reg) {
            return None;
        }
        Some(*lit == 1)
    }

    /// Resolve every operand of the last recorded instruction. Non-register
    /// operands map to [`SymbolicValue::Unknown`]; `None` on an empty trace.
    pub fn register_mapping_for_last_instruction(&self) -> Option<Vec<SymbolicValue>> {
        let last = self.trace.top()?;
        Some(last.operands.iter().map(|operand| self.resolve(operand)).collect())
    }

    /// Same as [`Self::register_mapping_for_last_instruction`] for a single position.
    pub fn register_value_for_operand(&self, position: usize) -> Option<SymbolicValue> {
        let operand = self.trace.top()?.operands.get(position)?;
        Some(self.resolve(operand))
    }

    pub fn register_value(&self, reg: u32) -> SymbolicValue {
        self.registers.get(reg)
    }

    fn resolve(&self, operand: &Operand) -> SymbolicValue {
        match operand {
            Operand::Register(reg) => self.registers.get(*reg),
            Operand::Literal(_) | Operand::Kind { .. } => SymbolicValue::Unknown,
        }
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trace)
    }
}

fn apply(registers: &mut RegisterFile, class: OpcodeClass, operands: &[Operand]) {
    let dst = operands.first().and_then(Operand::register);
    match class {
        OpcodeClass::ConstLoad => {
            let Some(dst) = dst else { return };
            let value = match operands.get(1) {
                Some(Operand::Kind { descriptor, .. }) => SymbolicValue::string_constant(descriptor),
                Some(Operand::Literal(lit)) => SymbolicValue::Int(*lit),
                Some(Operand::Register(_)) | None => return,
            };
            registers.set(dst, value);
        }
        // The returned value or thrown exception is not modeled.
        OpcodeClass::MoveResult | OpcodeClass::FieldRead => {
            if let Some(dst) = dst {
                registers.set(dst, SymbolicValue::Unknown);
            }
        }
        OpcodeClass::NewInstance => {
            let Some(dst) = dst else { return };
            let value = match operands.get(1) {
                Some(Operand::Kind { index, descriptor, .. }) => {
                    SymbolicValue::Object(ObjectHandle::new(descriptor.as_str(), *index))
                }
                _ => SymbolicValue::Unknown,
            };
            registers.set(dst, value);
        }
        OpcodeClass::InvokeVirtual => {
            let Some(receiver) = dst else { return };
            let Some(Operand::Kind {
                kind: PoolKind::Method,
                descriptor,
                ..
            }) = operands.last()
            else {
                return;
            };
            if let Some(SymbolicValue::Object(handle)) = registers.get_ref(receiver) {
                handle.record_invocation(descriptor.as_str());
            }
        }
        OpcodeClass::Unmodeled => {}
    }
}
