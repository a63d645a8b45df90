use crate::bytecode::{Instruction, Operand, PoolKind};

pub(crate) fn reg(n: u32) -> Operand {
    Operand::Register(n)
}

pub(crate) fn lit(v: i64) -> Operand {
    Operand::Literal(v)
}

pub(crate) fn string(index: u64, descriptor: &str) -> Operand {
    Operand::Kind {
        kind: PoolKind::String,
        index,
        descriptor: descriptor.to_string(),
    }
}

pub(crate) fn type_ref(index: u64, descriptor: &str) -> Operand {
    Operand::Kind {
        kind: PoolKind::Type,
        index,
        descriptor: descriptor.to_string(),
    }
}

pub(crate) fn method(index: u64, descriptor: &str) -> Operand {
    Operand::Kind {
        kind: PoolKind::Method,
        index,
        descriptor: descriptor.to_string(),
    }
}

pub(crate) fn ins(opcode: u16, length: u32, operands: Vec<Operand>) -> Instruction {
    Instruction::new(opcode, length, operands)
}
