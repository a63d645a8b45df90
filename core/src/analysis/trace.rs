use std::fmt;

use crate::bytecode::{Opcode, Operand, write_instruction};

/// One consumed instruction: its opcode and decoded operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
}

impl TraceEntry {
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self { opcode, operands }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_instruction(f, self.opcode, &self.operands)
    }
}

/// Ordered log of consumed instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn top(&self) -> Option<&TraceEntry> {
        self.entries.last()
    }

    pub fn pop(&mut self) -> Option<TraceEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&TraceEntry> {
        self.entries.get(idx)
    }

    pub fn opcode_at(&self, idx: usize) -> Option<Opcode> {
        self.entries.get(idx).map(|e| e.opcode)
    }

    pub fn operands_at(&self, idx: usize) -> Option<&[Operand]> {
        self.entries.get(idx).map(|e| e.operands.as_slice())
    }

    /// Insert `seq` in order starting at `index`; an index past the end appends.
    /// Splicing the trace's own full content into itself is a no-op.
    pub fn splice(&mut self, index: usize, seq: &[TraceEntry]) {
        if seq == self.entries.as_slice() {
            return;
        }
        let at = index.min(self.entries.len());
        self.entries.splice(at..at, seq.iter().cloned());
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "\t--> nil");
        }
        for (pos, entry) in self.entries.iter().enumerate() {
            writeln!(f, "\t--> {} : {}", pos, entry)?;
        }
        Ok(())
    }
}
