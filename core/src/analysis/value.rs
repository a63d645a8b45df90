use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
struct ObjectState {
    class_name: String,
    class_idx: u64,
    // Only `invoke-virtual` calls land here.
    invoked: RefCell<Vec<String>>,
}

/// Symbolic stand-in for an object created by `new-instance`.
///
/// Clones share the same allocation, so an invocation recorded through one
/// register is visible through every alias. Equality is identity.
#[derive(Clone)]
pub struct ObjectHandle(Rc<ObjectState>);

impl ObjectHandle {
    pub fn new(class_name: impl Into<String>, class_idx: u64) -> Self {
        Self(Rc::new(ObjectState {
            class_name: class_name.into(),
            class_idx,
            invoked: RefCell::new(Vec::new()),
        }))
    }

    pub fn class_name(&self) -> &str {
        &self.0.class_name
    }

    pub fn class_idx(&self) -> u64 {
        self.0.class_idx
    }

    pub fn record_invocation(&self, descriptor: impl Into<String>) {
        self.0.invoked.borrow_mut().push(descriptor.into());
    }

    pub fn invoked_methods(&self) -> Vec<String> {
        self.0.invoked.borrow().clone()
    }

    pub fn was_invoked(&self, descriptor: &str) -> bool {
        self.0.invoked.borrow().iter().any(|d| d == descriptor)
    }

    pub fn ptr_eq(&self, other: &ObjectHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectHandle {}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("class_name", &self.0.class_name)
            .field("class_idx", &self.0.class_idx)
            .field("invoked", &*self.0.invoked.borrow())
            .finish()
    }
}

/// Value tracked for a register.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SymbolicValue {
    Int(i64),
    /// String constant with its surrounding quotes removed.
    Str(String),
    Object(ObjectHandle),
    /// Not statically determinable.
    #[default]
    Unknown,
}

impl SymbolicValue {
    /// Drop one leading and one trailing quote character, if present.
    pub fn string_constant(raw: &str) -> SymbolicValue {
        let s = raw.strip_prefix(['\'', '"']).unwrap_or(raw);
        let s = s.strip_suffix(['\'', '"']).unwrap_or(s);
        SymbolicValue::Str(s.to_string())
    }

    pub fn is_string(&self) -> bool {
        matches!(self, SymbolicValue::Str(_))
    }

    pub fn is_object_handle(&self) -> bool {
        matches!(self, SymbolicValue::Object(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SymbolicValue::Unknown)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SymbolicValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SymbolicValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            SymbolicValue::Object(handle) => Some(handle),
            _ => None,
        }
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicValue::Int(v) => write!(f, "{}", v),
            SymbolicValue::Str(s) => write!(f, "{:?}", s),
            SymbolicValue::Object(handle) => write!(f, "new {}@{}", handle.class_name(), handle.class_idx()),
            SymbolicValue::Unknown => write!(f, "?"),
        }
    }
}
