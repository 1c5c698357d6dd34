//! Minimal CLI: compile a schema → (plan | read documents through it)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, info};

use sjs_plan::path_de::{MAX_LOADABLE_DEPTH, from_file_with_path};
use sjs_plan::plan::{DEFAULT_MAX_DEPTH, PathDescriptor, Plan, PlanBuilder};
use sjs_plan::schema::{Node, OriginalNode};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile a serializer schema into its traversal plan, and read JSON documents through it
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// more log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile and print the plan
    Plan(PlanOut),
    /// compile, then read every input document through the plan
    Read(ReadOut),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// user-authored schema (arrays written as [method, ...items])
    #[arg(long)]
    original: PathBuf,

    /// prepared schema with `*__sjs` markers; derived from --original if omitted
    #[arg(long)]
    prepared: Option<PathBuf>,

    /// refuse schemas nested deeper than this (JSON schemas cannot load past MAX_LOADABLE_DEPTH)
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=MAX_LOADABLE_DEPTH as u64)
    )]
    max_depth: usize,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct PlanOut {
    #[command(flatten)]
    schema: SchemaSettings,

    /// print the plan as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ReadOut {
    #[command(flatten)]
    schema: SchemaSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// output .ndjson file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn compile(&self) -> Result<Plan> {
        let original: OriginalNode = from_file_with_path(&self.original)
            .with_context(|| format!("loading original schema {}", self.original.display()))?;
        let prepared: Node = match &self.prepared {
            Some(path) => from_file_with_path(path)
                .with_context(|| format!("loading prepared schema {}", path.display()))?,
            None => original.normalize(),
        };
        let plan = PlanBuilder::new()
            .with_max_depth(self.max_depth)
            .compile(&prepared, Some(&original))?;
        info!(leaves = plan.len(), "schema compiled");
        Ok(plan)
    }
}

impl InputSettings {
    /// Every document named by the inputs, after pointer / jq selection.
    fn load_documents(&self) -> Result<Vec<Value>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {}", source_path.display()))?;
            for json_value in self.parse_source(&source, &source_path)? {
                out.extend(self.select(json_value, &source_path)?);
            }
        }
        debug!(documents = out.len(), "inputs loaded");
        Ok(out)
    }

    fn parse_source(&self, source: &str, source_path: &Path) -> Result<Vec<Value>> {
        let parse = |text: &str| {
            serde_json::from_str::<Value>(text).with_context(|| {
                format!("failed to parse JSON source file ({})", source_path.display())
            })
        };
        if self.ndjson {
            source.lines().filter(|l| !l.trim().is_empty()).map(parse).collect()
        } else {
            Ok(vec![parse(source)?])
        }
    }

    fn select(&self, json_value: Value, source_path: &Path) -> Result<Vec<Value>> {
        let json_value = match self.json_pointer.as_deref() {
            None => json_value,
            Some(pointer) => match json_value.pointer(pointer) {
                Some(x) => x.clone(),
                None => bail!("JSON pointer {pointer} matched nothing in {}", source_path.display()),
            },
        };
        match self.jq_expr.as_ref() {
            None => Ok(vec![json_value]),
            Some(jq_expr) => sjs_plan::jq_exec::run_filter(jq_expr, &json_value).with_context(|| {
                format!("failed to apply jq expression to source file ({})", source_path.display())
            }),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Plan(target) => {
                let plan = target.schema.compile()?;
                let text = if target.json {
                    serde_json::to_string_pretty(&plan)?
                } else {
                    render_table(&plan, target.out.is_none())
                };
                emit(target.out.as_deref(), &text)
            }
            Command::Read(target) => {
                let plan = target.schema.compile()?;
                let documents = target.input_settings.load_documents()?;
                // the plan is immutable; every worker reads through the same one
                let lines = documents
                    .par_iter()
                    .map(|doc| read_document(&plan, doc))
                    .collect::<Result<Vec<_>>>()?;
                emit(target.out.as_deref(), &lines.join("\n"))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Row and table label of a descriptor: its JSON Pointer, or `<root>`.
fn path_label(d: &PathDescriptor) -> String {
    if d.find().is_root() {
        "<root>".to_string()
    } else {
        d.find().pointer()
    }
}

fn read_document(plan: &Plan, doc: &Value) -> Result<String> {
    let row = plan
        .iter()
        .zip(plan.render(doc))
        .map(|(d, value)| (path_label(d), value.unwrap_or(Value::Null)))
        .collect::<Map<_, _>>();
    Ok(serde_json::to_string(&Value::Object(row))?)
}

fn render_table(plan: &Plan, color: bool) -> String {
    let mut out = String::new();
    for (i, d) in plan.iter().enumerate() {
        let path = path_label(d);
        let kind = match (d.method(), d.marker()) {
            (Some(method), _) => format!("array[{}]", method.name()),
            (None, Some(marker)) => marker.to_string(),
            (None, None) => "?".to_string(),
        };
        if color {
            let kind = if d.is_array() { kind.yellow() } else { kind.cyan() };
            out.push_str(&format!("{:>3}  {}  {}\n", i, path.bold(), kind));
        } else {
            out.push_str(&format!("{i:>3}  {path}  {kind}\n"));
        }
    }
    out
}

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, text).with_context(|| format!("writing {}", out.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
