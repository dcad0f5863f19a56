mod render;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mt_narrative_core::{NarrativeError, NarrativeResolver, resolve_free_format, to_pretty_json};
use mt_narrative_diagnostics::{self as diag, Diagnostic, Severity, codes};
use mt_narrative_formats::{FormatTable, NarrativeFormat, ValueSource};

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "mt-narrative",
    version,
    about = "Decode SWIFT MT narrative fields into structured codeword items"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Format table (JSON or JSONC) layered over, or replacing, the
    /// built-in field table.
    #[arg(long, global = true)]
    formats: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Resolve a field value read from FILE (or stdin when FILE is `-`).
    ///
    /// For fields whose narrative lives in a sub-field (e.g. 61), pass that
    /// sub-field's text.
    Resolve {
        /// Field identifier, e.g. 77A.
        #[arg(long, short)]
        field: String,
        #[arg(default_value = "-")]
        file: String,
    },

    /// Resolve a value with the free-format engine.
    FreeFormat {
        #[arg(default_value = "-")]
        file: String,
    },

    /// List the field table: identifier, format and value source.
    Formats,

    /// Explain a diagnostic ID (e.g. NARR1101).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(err) = run(cli, format) {
        match format {
            Format::Json => {
                let out = serde_json::json!({
                    "success": false,
                    "error": "command_failed",
                    "message": format!("{err:#}"),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).expect("error JSON serialization cannot fail")
                );
            }
            Format::Pretty => eprintln!("error: {err:#}"),
        }
        process::exit(2);
    }
}

fn run(cli: Cli, format: Format) -> Result<()> {
    match cli.cmd {
        Cmd::Resolve { field, file } => {
            let table = load_table(cli.formats.as_deref())?;
            cmd_resolve(&table, &field, &file, format)
        }
        Cmd::FreeFormat { file } => cmd_free_format(&file, format),
        Cmd::Formats => {
            let table = load_table(cli.formats.as_deref())?;
            cmd_formats(&table, format)
        }
        Cmd::Explain { id } => cmd_explain(&id, format),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_resolve(table: &FormatTable, field: &str, file: &str, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let resolver = NarrativeResolver::new(table);
    let selected = resolver.select(field).map(|entry| entry.format);

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let narrative = match resolver.resolve(field, Some(input.as_str()), &mut diagnostics) {
        Ok(narrative) => Some(narrative),
        Err(err) => {
            diagnostics.push(amount_diagnostic(field, &err));
            None
        }
    };

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "field": field,
                "format": selected,
                "narrative": narrative,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Narrative to stdout, diagnostics to stderr.
            if let Some(narrative) = &narrative {
                println!("{}", to_pretty_json(narrative)?);
            }
            render_diagnostics(&input, display_name(file), &diagnostics);
            print_summary(&diagnostics);
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_free_format(file: &str, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let narrative = resolve_free_format(Some(input.as_str()));

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "format": NarrativeFormat::Format8,
                "narrative": narrative,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => println!("{}", to_pretty_json(&narrative)?),
    }
    Ok(())
}

fn cmd_formats(table: &FormatTable, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let fields: Vec<serde_json::Value> = table
                .iter()
                .map(|(field, entry)| {
                    serde_json::json!({
                        "field": field,
                        "format": entry.format,
                        "source": entry.source,
                    })
                })
                .collect();
            let out = serde_json::json!({ "fields": fields });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            use ariadne::Fmt;

            for nf in NarrativeFormat::ALL {
                let fields = table.fields_for(nf);
                if fields.is_empty() {
                    continue;
                }
                println!("{}: {}", nf.fg(ariadne::Color::Cyan), fields.join(" "));
            }
            let from_details: Vec<&str> = table
                .iter()
                .filter(|(_, entry)| entry.source == ValueSource::SupplementaryDetails)
                .map(|(field, _)| field)
                .collect();
            if !from_details.is_empty() {
                println!("read from supplementary details: {}", from_details.join(" "));
            }
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}

/// The built-in table, or the table at `path` when given.
fn load_table(path: Option<&str>) -> Result<Cow<'static, FormatTable>> {
    match path {
        Some(path) => {
            let table = FormatTable::load(path)
                .with_context(|| format!("failed to load format table '{path}'"))?;
            Ok(Cow::Owned(table))
        }
        None => Ok(Cow::Borrowed(FormatTable::builtin())),
    }
}

/// Read FILE, or stdin for `-`.
fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        return Ok(input);
    }
    fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))
}

fn display_name(file: &str) -> &str {
    if file == "-" { "<stdin>" } else { file }
}

/// Report a failed amount parse as an error diagnostic for the field.
fn amount_diagnostic(field: &str, err: &NarrativeError) -> Diagnostic {
    let mut context = BTreeMap::new();
    context.insert("field".to_string(), field.to_string());
    if let NarrativeError::InvalidAmount { amount, .. } = err {
        context.insert("amount".to_string(), amount.clone());
    }
    Diagnostic::from_code(codes::INVALID_AMOUNT, err.to_string(), None).with_context(context)
}
