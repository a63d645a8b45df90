use std::fmt::Write as _;

use dextrace_core::{
    analysis::{Interpreter, TraceBound},
    bytecode::{AppDump, BytecodeUnit, MethodBody, MethodSignature},
};

/// Run a single interpreter over one method and render its state.
pub(crate) fn trace_method(
    dump: &AppDump,
    class: &str,
    method: &str,
    descriptor: &str,
    max_trace: i64,
    extra_offset: i64,
) -> anyhow::Result<String> {
    let sig = MethodSignature::new(class, method, descriptor);
    let matches = dump.find_methods(&sig);
    let body = match matches.first() {
        None => anyhow::bail!("Method not found in dump"),
        Some(None) => anyhow::bail!("Method has no code (external or abstract)"),
        Some(Some(body)) => *body,
    };

    let interp = Interpreter::with_instructions(body.instructions(), TraceBound::from_raw(max_trace), extra_offset);

    let mut out = String::new();
    let _ = writeln!(out, "method: {}", sig);
    if matches.len() > 1 {
        let _ = writeln!(out, "note: {} overloads share this signature, using the first", matches.len());
    }
    let _ = writeln!(out, "trace ({} instructions):", interp.trace().len());
    let _ = write!(out, "{}", interp.trace());
    let _ = writeln!(out, "registers:");
    let _ = write!(out, "{}", interp.registers());
    let _ = writeln!(
        out,
        "branches: {}",
        if interp.has_if_or_switch() { "yes" } else { "no" }
    );
    let boolean = match interp.boolean_return() {
        Some(value) => value.to_string(),
        None => "n/a".to_string(),
    };
    let _ = writeln!(out, "boolean return: {}", boolean);
    if let Some(values) = interp.register_mapping_for_last_instruction() {
        let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "last operands: [{}]", rendered.join(", "));
    }
    Ok(out)
}
