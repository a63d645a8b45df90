//! Dalvik opcode numbers and the categories the register tracker models.
//!
//! Ranges follow the Dalvik bytecode instruction table
//! (<https://source.android.com/docs/core/runtime/dalvik-bytecode>).

use std::ops::RangeInclusive;

pub type Opcode = u16;

/// `move-result`, `move-result-wide`, `move-result-object`, `move-exception`.
pub const MOVE_RESULT: RangeInclusive<Opcode> = 0x0a..=0x0d;
/// `return vAA`
pub const RETURN: Opcode = 0x0f;
/// `const/4` through `const-class`.
pub const CONST_LOAD: RangeInclusive<Opcode> = 0x12..=0x1c;
/// `const/4 vA, #+B`
pub const CONST_4: Opcode = 0x12;
/// `new-instance vAA, type@BBBB`
pub const NEW_INSTANCE: Opcode = 0x22;
/// `packed-switch`, `sparse-switch`.
pub const SWITCH: RangeInclusive<Opcode> = 0x2b..=0x2c;
/// `if-eq` through `if-lez`.
pub const IF_TEST: RangeInclusive<Opcode> = 0x32..=0x3d;
/// `aget` family.
pub const ARRAY_GET: RangeInclusive<Opcode> = 0x44..=0x4a;
/// `iget` family.
pub const INSTANCE_GET: RangeInclusive<Opcode> = 0x52..=0x58;
/// `sget` family.
pub const STATIC_GET: RangeInclusive<Opcode> = 0x60..=0x66;
/// `invoke-virtual {vC, vD, ...}, meth@BBBB`
pub const INVOKE_VIRTUAL: Opcode = 0x6e;

/// What the register tracker does with an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeClass {
    ConstLoad,
    MoveResult,
    FieldRead,
    NewInstance,
    InvokeVirtual,
    /// Recorded in the trace, otherwise ignored.
    Unmodeled,
}

impl OpcodeClass {
    pub fn of(op: Opcode) -> OpcodeClass {
        match op {
            op if CONST_LOAD.contains(&op) => OpcodeClass::ConstLoad,
            op if MOVE_RESULT.contains(&op) => OpcodeClass::MoveResult,
            op if ARRAY_GET.contains(&op) || INSTANCE_GET.contains(&op) || STATIC_GET.contains(&op) => {
                OpcodeClass::FieldRead
            }
            NEW_INSTANCE => OpcodeClass::NewInstance,
            INVOKE_VIRTUAL => OpcodeClass::InvokeVirtual,
            _ => OpcodeClass::Unmodeled,
        }
    }
}

/// Conditional branch or switch.
#[inline]
pub fn is_branch(op: Opcode) -> bool {
    IF_TEST.contains(&op) || SWITCH.contains(&op)
}

const GET_SUFFIXES: [&str; 7] = ["", "-wide", "-object", "-boolean", "-byte", "-char", "-short"];

/// Mnemonic for the opcodes this crate knows by name; `None` for the rest.
pub fn mnemonic(op: Opcode) -> Option<String> {
    let fixed = match op {
        0x0a => "move-result",
        0x0b => "move-result-wide",
        0x0c => "move-result-object",
        0x0d => "move-exception",
        0x0e => "return-void",
        RETURN => "return",
        0x10 => "return-wide",
        0x11 => "return-object",
        CONST_4 => "const/4",
        0x13 => "const/16",
        0x14 => "const",
        0x15 => "const/high16",
        0x16 => "const-wide/16",
        0x17 => "const-wide/32",
        0x18 => "const-wide",
        0x19 => "const-wide/high16",
        0x1a => "const-string",
        0x1b => "const-string/jumbo",
        0x1c => "const-class",
        NEW_INSTANCE => "new-instance",
        0x2b => "packed-switch",
        0x2c => "sparse-switch",
        0x32 => "if-eq",
        0x33 => "if-ne",
        0x34 => "if-lt",
        0x35 => "if-ge",
        0x36 => "if-gt",
        0x37 => "if-le",
        0x38 => "if-eqz",
        0x39 => "if-nez",
        0x3a => "if-ltz",
        0x3b => "if-gez",
        0x3c => "if-gtz",
        0x3d => "if-lez",
        INVOKE_VIRTUAL => "invoke-virtual",
        0x6f => "invoke-super",
        0x70 => "invoke-direct",
        0x71 => "invoke-static",
        0x72 => "invoke-interface",
        _ => {
            let (family, base) = if ARRAY_GET.contains(&op) {
                ("aget", *ARRAY_GET.start())
            } else if INSTANCE_GET.contains(&op) {
                ("iget", *INSTANCE_GET.start())
            } else if STATIC_GET.contains(&op) {
                ("sget", *STATIC_GET.start())
            } else {
                return None;
            };
            return Some(format!("{}{}", family, GET_SUFFIXES[(op - base) as usize]));
        }
    };
    Some(fixed.to_string())
}
