use tracing::debug;

use crate::bytecode::{BytecodeUnit, MethodBody, PathFinder};
use crate::config::TraceConfig;

use super::interpreter::{Interpreter, TraceBound};
use super::result::{PathDescriptor, TraceResult};

/// Runs one bounded [`Interpreter`] per candidate path.
pub struct Driver<'a, U, F> {
    unit: &'a U,
    finder: &'a F,
    config: TraceConfig,
}

impl<'a, U, F> Driver<'a, U, F>
where
    U: BytecodeUnit,
    F: PathFinder,
{
    pub fn new(unit: &'a U, finder: &'a F) -> Self {
        Self {
            unit,
            finder,
            config: TraceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TraceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn describe(&self, path: &F::Path) -> PathDescriptor<F::Path> {
        describe_path(self.finder, path)
    }

    /// Trace every path, dropping the ones whose source method cannot be
    /// resolved. Output order follows input order.
    pub fn run<'p, I>(&self, paths: I) -> Vec<TraceResult<F::Path>>
    where
        I: IntoIterator<Item = &'p F::Path>,
        F::Path: 'p,
    {
        paths.into_iter().filter_map(|path| self.trace_path(path)).collect()
    }

    pub fn trace_path(&self, path: &F::Path) -> Option<TraceResult<F::Path>> {
        let desc = self.describe(path);
        let (Some(sig), Some(call_site)) = (desc.src.complete(), desc.call_site) else {
            debug!(src = %desc.src, call_site = ?desc.call_site, "skipping path with unresolved source");
            return None;
        };

        let matches = self.unit.find_methods(&sig);
        if matches.len() > 1 {
            debug!(method = %sig, overloads = matches.len(), "ambiguous method lookup, using first match");
        }
        let Some(Some(method)) = matches.first() else {
            debug!(method = %sig, "skipping path: source method has no code");
            return None;
        };

        let max_trace = match self.config.max_trace {
            Some(raw) => TraceBound::from_raw(raw),
            None => TraceBound::from_raw(call_site),
        };
        let interp = Interpreter::with_instructions(method.instructions(), max_trace, self.config.extra_offset);
        let operands = interp.register_mapping_for_last_instruction();
        Some(TraceResult::new(desc, operands))
    }
}

pub fn describe_path<F: PathFinder>(finder: &F, path: &F::Path) -> PathDescriptor<F::Path> {
    let ends = finder.describe(path);
    PathDescriptor {
        src: ends.src,
        dst: ends.dst,
        call_site: ends.call_site,
        path: path.clone(),
    }
}

/// Resolve descriptors for every path, including ones with missing parts.
pub fn describe_paths<F: PathFinder>(finder: &F, paths: &[F::Path]) -> Vec<PathDescriptor<F::Path>> {
    paths.iter().map(|path| describe_path(finder, path)).collect()
}

/// Trace `paths` with the default configuration.
pub fn trace_source_paths<U, F>(unit: &U, finder: &F, paths: &[F::Path]) -> Vec<TraceResult<F::Path>>
where
    U: BytecodeUnit,
    F: PathFinder,
{
    Driver::new(unit, finder).run(paths)
}
