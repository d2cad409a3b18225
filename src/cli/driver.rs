//! Load a query document, rewrite it, and optionally run both versions.

use crate::NullsafeContext;
use crate::cli::args::{CliArgs, OutputFormat};
use crate::cli::document::QueryDocument;
use anyhow::{Context, Result};
use colored::Colorize;
use nullsafe_eval::{EvalError, Value};
use nullsafe_rewriter::{RewriteOptions, RewriteStats};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub original: String,
    pub rewritten: String,
    #[serde(rename = "type")]
    pub result_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub nodes_visited: usize,
    pub coalesce_guards: usize,
    pub conditional_guards: usize,
    pub cached_fallbacks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub original: Outcome,
    pub rewritten: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Value { value: String },
    Fault { error: String },
}

impl Outcome {
    fn from_result(result: Result<Value, EvalError>) -> Self {
        match result {
            Ok(value) => Outcome::Value {
                value: value.to_string(),
            },
            Err(err) => Outcome::Fault {
                error: err.to_string(),
            },
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Outcome::Fault { .. })
    }
}

/// Rewrite options selected on the command line.
pub fn rewrite_options(args: &CliArgs) -> RewriteOptions {
    let mut options = RewriteOptions::default().with_empty_collection_results(args.empty_collections);
    if let Some(max_depth) = args.max_depth {
        options = options.with_max_depth(max_depth);
    }
    options
}

pub fn read_document(args: &CliArgs) -> Result<QueryDocument> {
    let text = if args.reads_stdin() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read query document from stdin")?;
        text
    } else {
        load_file(&args.input)?
    };
    QueryDocument::from_json(&text)
}

fn load_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read query document {}", path.display()))
}

pub fn run(args: &CliArgs) -> Result<Report> {
    let document = read_document(args)?;
    process(&document, args)
}

/// Rewrite `document` under the options in `args`.
pub fn process(document: &QueryDocument, args: &CliArgs) -> Result<Report> {
    let ctx = NullsafeContext::new().with_options(rewrite_options(args));
    document.declare_types(ctx.types())?;
    let expr = document.build_expr(ctx.types())?;

    let (rewritten, stats) = ctx
        .rewriter()
        .rewrite_with_stats(&expr)
        .context("failed to rewrite expression")?;
    info!(guards = stats.guards(), "rewrote query document");

    let evaluation = if args.eval {
        let env = document.environment(ctx.types())?;
        let mut evaluator = ctx.evaluator();
        let original = Outcome::from_result(evaluator.evaluate(&expr, &env));
        let rewritten = Outcome::from_result(evaluator.evaluate(&rewritten, &env));
        Some(EvaluationReport {
            original,
            rewritten,
        })
    } else {
        None
    };

    Ok(Report {
        original: ctx.print(&expr),
        rewritten: ctx.print(&rewritten),
        result_type: ctx.format_type(rewritten.ty),
        stats: args.stats.then(|| stats_report(stats, ctx.fallbacks().len())),
        evaluation,
    })
}

fn stats_report(stats: RewriteStats, cached_fallbacks: usize) -> StatsReport {
    StatsReport {
        nodes_visited: stats.nodes_visited,
        coalesce_guards: stats.coalesce_guards,
        conditional_guards: stats.conditional_guards,
        cached_fallbacks,
    }
}

pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize report")
        }
        OutputFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &Report) -> String {
    let mut out = String::new();
    push_line(&mut out, "original", &report.original);
    push_line(&mut out, "rewritten", &report.rewritten);
    push_line(&mut out, "type", &report.result_type);

    if let Some(stats) = &report.stats {
        let summary = format!(
            "{} nodes, {} coalesce, {} conditional, {} cached fallbacks",
            stats.nodes_visited,
            stats.coalesce_guards,
            stats.conditional_guards,
            stats.cached_fallbacks
        );
        push_line(&mut out, "stats", &summary);
    }

    if let Some(evaluation) = &report.evaluation {
        push_outcome(&mut out, "original =", &evaluation.original);
        push_outcome(&mut out, "rewritten =", &evaluation.rewritten);
    }
    out
}

fn push_line(out: &mut String, label: &str, text: &str) {
    let label = format!("{:<12}", format!("{label}:"));
    out.push_str(&format!("{}{text}\n", label.bold()));
}

fn push_outcome(out: &mut String, label: &str, outcome: &Outcome) {
    let text = match outcome {
        Outcome::Value { value } => value.as_str().green().to_string(),
        Outcome::Fault { error } => format!("{} {error}", "fault:".red()),
    };
    let label = format!("{label:<12}");
    out.push_str(&format!("{}{text}\n", label.bold()));
}
