use std::path::{Component, Path, PathBuf};
use std::sync::Once;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "dextrace_core=debug,dextrace_cli=info";

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dextrace_core::{
    analysis::{Driver, describe_paths},
    bytecode::AppDump,
    config::{AnalyzerConfig, ReportFormat},
    report::{self, PathReport},
};

mod inspect;

#[derive(Debug, Parser)]
#[command(
    name = "dextrace",
    author,
    version,
    about = "Recover constants and object provenance at Dalvik call sites",
    long_about = None
)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatCli {
    Text,
    Json,
    Yaml,
}

impl From<FormatCli> for ReportFormat {
    fn from(value: FormatCli) -> Self {
        match value {
            FormatCli::Text => ReportFormat::Text,
            FormatCli::Json => ReportFormat::Json,
            FormatCli::Yaml => ReportFormat::Yaml,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Trace every candidate path of a dump and report the sink's operand values.
    Analyze {
        /// Application dump (.json, .yaml or .yml)
        #[arg(value_name = "DUMP", value_parser = parse_sanitized_path)]
        dump: PathBuf,
        /// TOML analyzer config
        #[arg(long, value_parser = parse_sanitized_path)]
        config: Option<PathBuf>,
        /// Output format (overrides the config file)
        #[arg(long, value_enum)]
        format: Option<FormatCli>,
        /// Extra instructions traced past each call site
        #[arg(long, allow_hyphen_values = true)]
        extra_offset: Option<i64>,
        /// Byte-offset ceiling replacing the call-site index (-1 = whole method)
        #[arg(long, allow_hyphen_values = true)]
        max_trace: Option<i64>,
    },
    /// Trace one method and print the instruction trace and register table.
    Trace {
        #[arg(value_name = "DUMP", value_parser = parse_sanitized_path)]
        dump: PathBuf,
        /// Class descriptor, e.g. `Lcom/example/Main;`
        #[arg(long = "class")]
        class: String,
        #[arg(long)]
        method: String,
        /// Method descriptor, e.g. `()V`
        #[arg(long)]
        descriptor: String,
        /// Byte-offset ceiling (-1 = whole method)
        #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
        max_trace: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        extra_offset: i64,
    },
    /// List the dump's candidate paths and whether they resolve.
    Paths {
        #[arg(value_name = "DUMP", value_parser = parse_sanitized_path)]
        dump: PathBuf,
    },
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);

    for comp in p.components() {
        if matches!(comp, Component::ParentDir) {
            return Err(anyhow::anyhow!(
                "Parent directory components ('..') are not allowed in file paths."
            ));
        }
    }

    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn maybe_init_tracing() {
    let raw = match std::env::var("DEXTRACE_TRACE") {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

/// Config file values, then command-line overrides.
pub(crate) fn resolve_config(
    config: Option<&Path>,
    format: Option<FormatCli>,
    extra_offset: Option<i64>,
    max_trace: Option<i64>,
) -> anyhow::Result<AnalyzerConfig> {
    let mut cfg = match config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(format) = format {
        cfg.report.format = format.into();
    }
    if let Some(extra) = extra_offset {
        cfg.trace.extra_offset = extra;
    }
    if max_trace.is_some() {
        cfg.trace.max_trace = max_trace;
    }
    Ok(cfg)
}

fn run_analyze(dump_path: &Path, cfg: &AnalyzerConfig) -> anyhow::Result<String> {
    let dump = AppDump::load(dump_path)?;
    let paths = dump.path_ids();
    let results = Driver::new(&dump, &dump).with_config(cfg.trace).run(&paths);
    tracing::info!(
        candidates = paths.len(),
        traced = results.len(),
        "analysis finished"
    );
    let reports: Vec<PathReport> = results.iter().map(PathReport::from).collect();
    report::render(&reports, cfg.report.format)
}

fn run_paths(dump_path: &Path) -> anyhow::Result<String> {
    let dump = AppDump::load(dump_path)?;
    let mut out = String::new();
    for (i, desc) in describe_paths(&dump, &dump.path_ids()).iter().enumerate() {
        let resolved = desc.src.complete().is_some() && desc.call_site.is_some();
        let call_site = desc
            .call_site
            .map(|idx| format!("{:#x}", idx))
            .unwrap_or_else(|| "?".to_string());
        out.push_str(&format!(
            "[{}] {} -> {} @ {}{}\n",
            i,
            desc.src,
            desc.dst,
            call_site,
            if resolved { "" } else { " (unresolved)" }
        ));
    }
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let CliArgs { command } = CliArgs::parse();

    let output = match command {
        Commands::Analyze {
            dump,
            config,
            format,
            extra_offset,
            max_trace,
        } => {
            let cfg = resolve_config(config.as_deref(), format, extra_offset, max_trace)?;
            run_analyze(&dump, &cfg)?
        }
        Commands::Trace {
            dump,
            class,
            method,
            descriptor,
            max_trace,
            extra_offset,
        } => {
            let app = AppDump::load(&dump)?;
            inspect::trace_method(&app, &class, &method, &descriptor, max_trace, extra_offset)
                .with_context(|| format!("Failed to trace {}->{}{}", class, method, descriptor))?
        }
        Commands::Paths { dump } => run_paths(&dump)?,
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
