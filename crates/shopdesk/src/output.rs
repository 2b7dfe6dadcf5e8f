//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables use `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::{Table, Tabled, settings::Style};

use shopdesk_core::{FieldSpec, Page, Resource, Schema};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render one page of records. The table view gets a pagination line
/// only when there is more than one page.
pub fn render_page<R>(
    format: OutputFormat,
    page: &Page<R>,
    schema: &Schema,
    color: bool,
) -> Result<String, CliError>
where
    R: Resource + Serialize,
{
    match format {
        OutputFormat::Table => {
            let mut out = record_table(page.items(), schema);
            if page.shows_pagination() {
                out.push('\n');
                out.push_str(&pagination_line(page, color));
            }
            Ok(out)
        }
        OutputFormat::Json => render_json(page, false),
        OutputFormat::JsonCompact => render_json(page, true),
        OutputFormat::Yaml => render_yaml(page),
        OutputFormat::Plain => Ok(page
            .items()
            .iter()
            .map(|r| r.id().to_string())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render a single record.
pub fn render_record<R>(format: OutputFormat, record: &R, schema: &Schema) -> Result<String, CliError>
where
    R: Resource + Serialize,
{
    match format {
        OutputFormat::Table => Ok(record_detail(record, schema)),
        OutputFormat::Json => render_json(record, false),
        OutputFormat::JsonCompact => render_json(record, true),
        OutputFormat::Yaml => render_yaml(record),
        OutputFormat::Plain => Ok(record.id().to_string()),
    }
}

/// Render a serializable value, using `to_rows` for the table view.
pub fn render_single<T, R>(
    format: OutputFormat,
    data: &T,
    to_rows: impl Fn(&T) -> Vec<R>,
    plain: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => Ok(Table::new(to_rows(data)).with(Style::rounded()).to_string()),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a success notice.
pub fn print_notice(message: &str, quiet: bool, color: bool) {
    if quiet {
        return;
    }
    if color {
        println!("{} {message}", "✓".green());
    } else {
        println!("{message}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn record_table<R: Resource>(records: &[R], schema: &Schema) -> String {
    let mut builder = Builder::default();
    builder.push_record(std::iter::once("ID").chain(schema.fields().iter().map(FieldSpec::label)));
    for record in records {
        let id = record.id().to_string();
        builder.push_record(
            std::iter::once(id).chain(
                schema
                    .fields()
                    .iter()
                    .map(|f| record.field(f.name()).unwrap_or_default()),
            ),
        );
    }
    builder.build().with(Style::rounded()).to_string()
}

fn record_detail<R: Resource>(record: &R, schema: &Schema) -> String {
    let mut lines = vec![format!("ID:         {}", record.id())];
    for field in schema.fields() {
        let value = record.field(field.name()).unwrap_or_else(|| "-".into());
        lines.push(format!("{:<12}{value}", format!("{}:", field.label())));
    }
    if let Some(created) = record.created_at().or_else(|| record.id().embedded_timestamp()) {
        lines.push(format!("Created:    {}", created.to_rfc3339()));
    }
    if let Some(updated) = record.updated_at() {
        lines.push(format!("Updated:    {}", updated.to_rfc3339()));
    }
    lines.join("\n")
}

/// `Page 2 of 3 (25 records): 1 [2] 3`
fn pagination_line<R>(page: &Page<R>, color: bool) -> String {
    let current = page.page_number();
    let numbers = page
        .page_numbers()
        .map(|n| {
            if n == current {
                let marked = format!("[{n}]");
                if color { marked.bold().to_string() } else { marked }
            } else {
                n.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "Page {current} of {} ({} records): {numbers}",
        page.total_pages(),
        page.total_count()
    )
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Internal(format!("JSON serialization failed: {e}")))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data)
        .map_err(|e| CliError::Internal(format!("YAML serialization failed: {e}")))
}
