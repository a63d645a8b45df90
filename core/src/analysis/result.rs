use crate::bytecode::PartialSignature;

use super::value::{ObjectHandle, SymbolicValue};

/// Resolved ends of a candidate source→sink path plus the finder's own path object.
#[derive(Debug, Clone)]
pub struct PathDescriptor<P> {
    pub src: PartialSignature,
    pub dst: PartialSignature,
    /// Byte offset of the sink call inside the source method.
    pub call_site: Option<i64>,
    pub path: P,
}

/// Register values at the last traced instruction of one path.
#[derive(Debug, Clone)]
pub struct TraceResult<P> {
    path: PathDescriptor<P>,
    operands: Option<Vec<SymbolicValue>>,
}

impl<P> TraceResult<P> {
    pub fn new(path: PathDescriptor<P>, operands: Option<Vec<SymbolicValue>>) -> Self {
        Self { path, operands }
    }

    pub fn path(&self) -> &PathDescriptor<P> {
        &self.path
    }

    /// Operand-position → value mapping; `None` when nothing was traced.
    pub fn operands(&self) -> Option<&[SymbolicValue]> {
        self.operands.as_deref()
    }

    pub fn value(&self, position: usize) -> Option<&SymbolicValue> {
        self.operands.as_ref()?.get(position)
    }

    pub fn is_string(&self, position: usize) -> bool {
        self.value(position).is_some_and(SymbolicValue::is_string)
    }

    pub fn is_object_handle(&self, position: usize) -> bool {
        self.value(position).is_some_and(SymbolicValue::is_object_handle)
    }

    pub fn object_handle(&self, position: usize) -> Option<&ObjectHandle> {
        self.value(position)?.as_object()
    }
}
