//! menugen: generate C source for a text menu system from an INI-like
//! description.
//!
//! The description has three levels:
//!
//! - **system settings**: `key=value` lines before the first section
//! - **menus**: a `[name]` header followed by the menu's own attributes
//! - **entries**: blank-line separated blocks of item attributes
//!
//! The generated code is assembled from named fragments of a template file
//! (`--name BEGINS--` ... `--name ENDS--`), so the same description can target
//! different runtimes.

mod coerce;
mod error;
mod model;
mod parser;
mod render;
mod schema;
mod template;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Path meaning "standard input/output".
const STDIO: &str = "-";

#[derive(Parser)]
#[command(
    name = "menugen",
    about = "Generate menu-system C source from a .menu description and a code template"
)]
struct Cli {
    /// Menu description file (- for stdin)
    #[arg(short = 'i', long, default_value = STDIO)]
    input: String,

    /// Generated source file (- for stdout)
    #[arg(short = 'o', long, default_value = STDIO)]
    output: String,

    /// Code template file (- for stdin)
    #[arg(short = 't', long, default_value = "adv_menu.tpl")]
    template: String,

    /// Output format: c (default) or json
    #[arg(short = 'f', long, default_value = "c")]
    format: String,

    /// Log parser and emitter progress to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.input == STDIO && cli.template == STDIO {
        bail!("the menu description and the template cannot both be read from stdin");
    }

    let source = read_source(&cli.input)?;
    let output = generate(&source, &cli.format, || {
        let text = read_source(&cli.template)?;
        let store = template::TemplateStore::load(&text);
        debug!("template fragments: {}", store.names().join(", "));
        Ok(store)
    })
    .with_context(|| format!("failed to generate code from {}", display_name(&cli.input)))?;

    write_output(&cli.output, &output)
}

/// Core pipeline: parse the whole description, then render it. Nothing is
/// returned unless both steps succeed.
fn generate<F>(source: &str, format: &str, load_templates: F) -> Result<String>
where
    F: FnOnce() -> Result<template::TemplateStore>,
{
    let doc = parser::parse(source)?;
    debug!(
        "parsed {} menus with {} entries",
        doc.menus.len(),
        doc.entry_count()
    );
    let renderer = render::create_renderer(format, load_templates)?;
    renderer.render(&doc)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn display_name(path: &str) -> &str {
    if path == STDIO {
        "<stdin>"
    } else {
        path
    }
}

fn read_source(path: &str) -> Result<String> {
    if path == STDIO {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
}

fn write_output(path: &str, text: &str) -> Result<()> {
    if path == STDIO {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .context("failed to write stdout")?;
        return Ok(());
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path))
}
