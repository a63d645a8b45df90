use std::fmt;

use rustc_hash::FxHashMap;

use super::value::SymbolicValue;

/// Flat register table: last write wins, unassigned registers read as Unknown.
#[derive(Debug, Clone, Default)]
pub struct RegisterFile {
    regs: FxHashMap<u32, SymbolicValue>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, reg: u32, value: SymbolicValue) {
        self.regs.insert(reg, value);
    }

    pub fn get(&self, reg: u32) -> SymbolicValue {
        self.regs.get(&reg).cloned().unwrap_or_default()
    }

    pub fn get_ref(&self, reg: u32) -> Option<&SymbolicValue> {
        self.regs.get(&reg)
    }

    pub fn contains(&self, reg: u32) -> bool {
        self.regs.contains_key(&reg)
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Assigned registers in ascending register order.
    pub fn sorted(&self) -> Vec<(u32, &SymbolicValue)> {
        let mut entries: Vec<_> = self.regs.iter().map(|(reg, value)| (*reg, value)).collect();
        entries.sort_by_key(|(reg, _)| *reg);
        entries
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.regs.is_empty() {
            return writeln!(f, "\t(no registers)");
        }
        for (reg, value) in self.sorted() {
            writeln!(f, "\tv{} = {}", reg, value)?;
        }
        Ok(())
    }
}
