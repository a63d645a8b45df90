//! Interfaces of the external collaborators: the bytecode unit that owns the
//! parsed application and the path finder that proposes source→sink paths.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::operand::Instruction;

/// Fully qualified method signature, e.g. `Lcom/example/Main;` / `onCreate` / `(Landroid/os/Bundle;)V`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub class: String,
    pub method: String,
    pub descriptor: String,
}

impl MethodSignature {
    pub fn new(class: impl Into<String>, method: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            descriptor: descriptor.into(),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}{}", self.class, self.method, self.descriptor)
    }
}

/// Signature parts as resolved by a path finder; any of them may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSignature {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub descriptor: Option<String>,
}

impl PartialSignature {
    pub fn complete(&self) -> Option<MethodSignature> {
        match (&self.class, &self.method, &self.descriptor) {
            (Some(class), Some(method), Some(descriptor)) => {
                Some(MethodSignature::new(class.as_str(), method.as_str(), descriptor.as_str()))
            }
            _ => None,
        }
    }
}

impl From<MethodSignature> for PartialSignature {
    fn from(sig: MethodSignature) -> Self {
        Self {
            class: Some(sig.class),
            method: Some(sig.method),
            descriptor: Some(sig.descriptor),
        }
    }
}

impl fmt::Display for PartialSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |p: &Option<String>| p.clone().unwrap_or_else(|| "?".to_string());
        write!(
            f,
            "{}->{}{}",
            part(&self.class),
            part(&self.method),
            part(&self.descriptor)
        )
    }
}

/// What a path finder knows about one candidate path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathEnds {
    pub src: PartialSignature,
    pub dst: PartialSignature,
    /// Byte offset of the sink invocation inside the source method.
    pub call_site: Option<i64>,
}

/// A method body that can be enumerated instruction by instruction.
pub trait MethodBody {
    fn instructions(&self) -> &[Instruction];
}

/// Parsed application that can look methods up by signature.
pub trait BytecodeUnit {
    type Method: MethodBody;

    /// All methods matching `sig`, in lookup order. `None` entries are matches
    /// without a body (external or abstract methods).
    fn find_methods(&self, sig: &MethodSignature) -> Vec<Option<&Self::Method>>;
}

/// Source of candidate source→sink paths.
pub trait PathFinder {
    type Path: Clone;

    fn describe(&self, path: &Self::Path) -> PathEnds;
}
