use anyhow::Result;
use clap::Parser;
use std::io::{IsTerminal, Write};

use nullsafe::cli::args::CliArgs;
use nullsafe::cli::driver;

fn main() -> Result<()> {
    // NULLSAFE_LOG / RUST_LOG enable tracing; NULLSAFE_LOG_FORMAT picks text|tree|json.
    nullsafe::tracing_config::init_tracing();

    let args = CliArgs::parse();
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let report = driver::run(&args)?;
    let rendered = driver::render(&report, args.format)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}
