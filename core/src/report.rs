//! Serializable view of trace results for the rule layer and the CLI.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::{PathDescriptor, SymbolicValue, TraceResult};
use crate::bytecode::PartialSignature;
use crate::config::ReportFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueReport {
    Unknown,
    Int {
        value: i64,
    },
    String {
        value: String,
    },
    Object {
        class: String,
        class_idx: u64,
        invoked: Vec<String>,
    },
}

impl From<&SymbolicValue> for ValueReport {
    fn from(value: &SymbolicValue) -> Self {
        match value {
            SymbolicValue::Int(v) => ValueReport::Int { value: *v },
            SymbolicValue::Str(s) => ValueReport::String { value: s.clone() },
            SymbolicValue::Object(handle) => ValueReport::Object {
                class: handle.class_name().to_string(),
                class_idx: handle.class_idx(),
                invoked: handle.invoked_methods(),
            },
            SymbolicValue::Unknown => ValueReport::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub src: PartialSignature,
    pub dst: PartialSignature,
    pub call_site: Option<i64>,
    /// `None` when the source method had no instructions to trace.
    pub operands: Option<Vec<ValueReport>>,
}

impl PathReport {
    pub fn from_descriptor<P>(desc: &PathDescriptor<P>, operands: Option<Vec<ValueReport>>) -> Self {
        Self {
            src: desc.src.clone(),
            dst: desc.dst.clone(),
            call_site: desc.call_site,
            operands,
        }
    }
}

impl<P> From<&TraceResult<P>> for PathReport {
    fn from(result: &TraceResult<P>) -> Self {
        let operands = result
            .operands()
            .map(|values| values.iter().map(ValueReport::from).collect());
        PathReport::from_descriptor(result.path(), operands)
    }
}

pub fn render(reports: &[PathReport], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(reports)),
        ReportFormat::Json => serde_json::to_string_pretty(reports).context("Failed to encode JSON report"),
        ReportFormat::Yaml => serde_yaml::to_string(reports).context("Failed to encode YAML report"),
    }
}

fn render_text(reports: &[PathReport]) -> String {
    let mut out = String::new();
    for (i, report) in reports.iter().enumerate() {
        let call_site = report
            .call_site
            .map(|idx| format!("{:#x}", idx))
            .unwrap_or_else(|| "?".to_string());
        let _ = writeln!(out, "[{}] {} @ {}", i, report.src, call_site);
        let _ = writeln!(out, "    -> {}", report.dst);
        match &report.operands {
            None => {
                let _ = writeln!(out, "    (no instructions traced)");
            }
            Some(values) => {
                for (pos, value) in values.iter().enumerate() {
                    let _ = writeln!(out, "    p{}: {}", pos, describe_value(value));
                }
            }
        }
    }
    out
}

fn describe_value(value: &ValueReport) -> String {
    match value {
        ValueReport::Unknown => "?".to_string(),
        ValueReport::Int { value } => value.to_string(),
        ValueReport::String { value } => format!("{:?}", value),
        ValueReport::Object {
            class,
            class_idx,
            invoked,
        } => {
            if invoked.is_empty() {
                format!("new {}@{}", class, class_idx)
            } else {
                format!("new {}@{} invoked [{}]", class, class_idx, invoked.join(", "))
            }
        }
    }
}
