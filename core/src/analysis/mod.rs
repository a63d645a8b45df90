//! Bounded register tracking over a method's instruction prefix.
//!
//! The [`Interpreter`] walks instructions in program order, keeping a
//! [`Trace`] of what it consumed and a [`RegisterFile`] of the constants,
//! string literals and `new-instance` objects it can see. The [`Driver`]
//! runs one interpreter per candidate source→sink path and reports the
//! register values at the sink call site.

mod driver;
mod interpreter;
mod registers;
mod result;
mod trace;
mod value;

pub use driver::*;
pub use interpreter::*;
pub use registers::RegisterFile;
pub use result::*;
pub use trace::*;
pub use value::*;

#[cfg(test)]
mod driver_test;
#[cfg(test)]
mod value_test;
