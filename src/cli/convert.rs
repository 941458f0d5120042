use std::path::{Path, PathBuf};

use anyhow::Context;
use reqif::{Config, Document, ImportReport, SchemaCatalog, encode, map_rows, read_sheets, write_document};
use tracing::{info, instrument};

use super::terminal::Style;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The workbook to convert (.xlsx)
    workbook: PathBuf,

    /// Where to write the document [default: <workbook stem>.reqif next to the
    /// workbook]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document title, overriding the configured one
    #[arg(long)]
    title: Option<String>,

    /// Summary format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    format: SummaryFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum SummaryFormat {
    #[default]
    Table,
    Json,
}

impl Command {
    #[instrument(skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let sheets = read_sheets(&self.workbook, config)?;

        let title = self.title.as_deref().unwrap_or(&config.title);
        let mut document = Document::new(title);
        let report = map_rows(&mut document, &sheets, &config.prefixes);

        let bytes = encode(&document, &SchemaCatalog::standard());
        let output = self
            .output
            .unwrap_or_else(|| default_output(&self.workbook));
        write_document(&output, &bytes)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        info!(
            path = %output.display(),
            requirements = report.requirements_added,
            relations = report.relations_added,
            warnings = report.warnings.len(),
            "conversion complete"
        );
        match self.format {
            SummaryFormat::Table => print!(
                "{}",
                summary(&output, &report, config.max_warnings, Style::detect())
            ),
            SummaryFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary_json(&output, &report))?);
            }
        }
        Ok(())
    }
}

fn default_output(workbook: &Path) -> PathBuf {
    workbook.with_extension("reqif")
}

fn summary(output: &Path, report: &ImportReport, max_warnings: usize, style: Style) -> String {
    let mut lines = vec![
        style.success(&format!("Generated: {}", output.display())),
        format!("Requirements added: {}", report.requirements_added),
        format!("Relations added: {}", report.relations_added),
    ];
    if !report.warnings.is_empty() {
        lines.push(style.warning(&format!(
            "Warnings: {} (showing up to {max_warnings})",
            report.warnings.len()
        )));
        lines.extend(
            report
                .warnings
                .iter()
                .take(max_warnings)
                .map(|warning| style.dim(&format!(" - {warning}"))),
        );
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Machine-readable summary. Every warning is listed; `max_warnings` only
/// applies to the table.
fn summary_json(output: &Path, report: &ImportReport) -> serde_json::Value {
    use serde_json::json;

    let warnings: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();

    json!({
        "output": output.display().to_string(),
        "requirements_added": report.requirements_added,
        "relations_added": report.relations_added,
        "warnings": warnings,
    })
}
