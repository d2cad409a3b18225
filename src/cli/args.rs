use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Rewrite a query expression so it tolerates null.
#[derive(Parser, Debug)]
#[command(name = "nullsafe", version, about)]
pub struct CliArgs {
    /// Query document (JSON). Use `-` to read from stdin.
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Evaluate the original and the rewritten expression against `data`.
    #[arg(long)]
    pub eval: bool,

    /// Maximum expression nesting accepted by the rewriter.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<u32>,

    /// Report guard and cache counters.
    #[arg(long)]
    pub stats: bool,

    /// Short-circuit collection-typed results to an empty collection
    /// instead of null.
    #[arg(long)]
    pub empty_collections: bool,
}

impl CliArgs {
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}
