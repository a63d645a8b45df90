//! Serialized application dump.
//!
//! A dump is a JSON or YAML document listing classes, their methods with
//! decoded instructions, and the candidate paths a path finder produced for
//! them. It backs both collaborator traits so the analysis can run without a
//! live bytecode parser.

use std::path::Path;

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::operand::{Instruction, Operand, RawOperand};
use super::unit::{BytecodeUnit, MethodBody, MethodSignature, PartialSignature, PathEnds, PathFinder};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpFile {
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
    #[serde(default)]
    pub paths: Vec<PathEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodEntry {
    pub name: String,
    pub descriptor: String,
    /// Absent for external methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Vec<InstructionEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionEntry {
    pub op: u16,
    pub length: u32,
    #[serde(default)]
    pub operands: Vec<RawOperand>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathEntry {
    #[serde(default)]
    pub src: PartialSignature,
    #[serde(default)]
    pub dst: PartialSignature,
    #[serde(default)]
    pub idx: Option<i64>,
}

/// Decoded method code.
#[derive(Debug, Clone, Default)]
pub struct MethodCode {
    instructions: Vec<Instruction>,
}

impl MethodCode {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

impl MethodBody for MethodCode {
    fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

#[derive(Debug, Clone)]
pub struct DumpMethod {
    pub signature: MethodSignature,
    pub code: Option<MethodCode>,
}

/// Opaque handle to one of the dump's candidate paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathId(pub usize);

/// In-memory bytecode unit and path finder built from a [`DumpFile`].
#[derive(Debug, Clone, Default)]
pub struct AppDump {
    methods: Vec<DumpMethod>,
    by_signature: FxHashMap<MethodSignature, Vec<usize>>,
    paths: Vec<PathEntry>,
}

impl AppDump {
    pub fn from_file(file: DumpFile) -> Result<Self> {
        let mut dump = AppDump {
            paths: file.paths,
            ..AppDump::default()
        };
        for class in file.classes {
            for method in class.methods {
                let signature = MethodSignature::new(class.name.as_str(), method.name, method.descriptor);
                let code = match method.code {
                    Some(entries) => Some(
                        decode_code(entries).with_context(|| format!("Failed to decode method {}", signature))?,
                    ),
                    None => None,
                };
                dump.push_method(DumpMethod { signature, code });
            }
        }
        Ok(dump)
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        let file: DumpFile = serde_json::from_str(src).context("Failed to parse JSON dump")?;
        Self::from_file(file)
    }

    pub fn from_yaml_str(src: &str) -> Result<Self> {
        let file: DumpFile = serde_yaml::from_str(src).context("Failed to parse YAML dump")?;
        Self::from_file(file)
    }

    /// Load a dump, picking the format from the file extension (`.json`, `.yaml`, `.yml`).
    pub fn load(path: &Path) -> Result<Self> {
        let src =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read dump '{}'", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let parsed = match ext.as_str() {
            "json" => Self::from_json_str(&src),
            "yaml" | "yml" => Self::from_yaml_str(&src),
            other => bail!("Unsupported dump extension '{}' (expected json, yaml or yml)", other),
        };
        parsed.with_context(|| format!("Invalid dump '{}'", path.display()))
    }

    pub fn push_method(&mut self, method: DumpMethod) {
        let slot = self.methods.len();
        self.by_signature.entry(method.signature.clone()).or_default().push(slot);
        self.methods.push(method);
    }

    pub fn push_path(&mut self, entry: PathEntry) -> PathId {
        self.paths.push(entry);
        PathId(self.paths.len() - 1)
    }

    pub fn methods(&self) -> &[DumpMethod] {
        &self.methods
    }

    pub fn path_ids(&self) -> Vec<PathId> {
        (0..self.paths.len()).map(PathId).collect()
    }
}

fn decode_code(entries: Vec<InstructionEntry>) -> Result<MethodCode> {
    let mut instructions = Vec::with_capacity(entries.len());
    for (pos, entry) in entries.into_iter().enumerate() {
        let operands = entry
            .operands
            .into_iter()
            .map(Operand::try_from)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("instruction #{} (op {:#04x})", pos, entry.op))?;
        instructions.push(Instruction::new(entry.op, entry.length, operands));
    }
    Ok(MethodCode::new(instructions))
}

impl BytecodeUnit for AppDump {
    type Method = MethodCode;

    fn find_methods(&self, sig: &MethodSignature) -> Vec<Option<&MethodCode>> {
        self.by_signature
            .get(sig)
            .map(|slots| slots.iter().map(|&slot| self.methods[slot].code.as_ref()).collect())
            .unwrap_or_default()
    }
}

impl PathFinder for AppDump {
    type Path = PathId;

    fn describe(&self, path: &PathId) -> PathEnds {
        match self.paths.get(path.0) {
            Some(entry) => PathEnds {
                src: entry.src.clone(),
                dst: entry.dst.clone(),
                call_site: entry.idx,
            },
            None => PathEnds::default(),
        }
    }
}
