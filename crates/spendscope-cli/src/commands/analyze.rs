//! Sheet analysis command

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use spendscope_core::{
    load_dataset, report::format_usd, Finding, InsightEngine, ProcurementReport,
    RecommendedAction, SchemaContract,
};

use crate::cli::OutputFormat;

pub fn cmd_analyze(file: &Path, format: OutputFormat, core_only: bool) -> Result<()> {
    let reader = File::open(file)
        .with_context(|| format!("Failed to open sheet: {}", file.display()))?;

    tracing::info!(file = %file.display(), core_only, "Analyzing sheet");

    let output = render_analysis(BufReader::new(reader), format, core_only)
        .with_context(|| format!("Failed to analyze {}", file.display()))?;
    print!("{}", output);
    Ok(())
}

/// Run the analysis and render it in the requested format
pub fn render_analysis<R: Read>(reader: R, format: OutputFormat, core_only: bool) -> Result<String> {
    let engine = InsightEngine::new();

    if core_only {
        let dataset = load_dataset(reader, &SchemaContract::core())?;
        let findings = engine.analyze_all(&dataset)?;
        return match format {
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&findings)?)),
            OutputFormat::Text => Ok(render_findings(&findings)),
        };
    }

    let dataset = load_dataset(reader, &SchemaContract::upload())?;
    let report = ProcurementReport::build(&dataset, &engine)?;
    match format {
        OutputFormat::Json => Ok(format!("{}\n", report.to_json_pretty()?)),
        OutputFormat::Text => Ok(render_report(&report)),
    }
}

fn render_findings(findings: &[Finding]) -> String {
    let mut out = String::new();

    if findings.is_empty() {
        out.push_str("✅ No findings\n");
        return out;
    }

    let _ = writeln!(out, "🔍 {} finding(s)", findings.len());
    for finding in findings {
        let _ = writeln!(
            out,
            "   [{}] {}: {} ({} impact)",
            finding.insight_type(),
            finding.subject().id(),
            finding.metric(),
            finding.impact()
        );
        let _ = writeln!(out, "      {}", finding.insight_text());
        let _ = writeln!(out, "      → {}", finding.recommended_action());
    }
    out
}

fn render_report(report: &ProcurementReport) -> String {
    let mut out = String::new();

    out.push_str("💰 Top suppliers by potential savings\n");
    for supplier in &report.top_suppliers {
        let _ = writeln!(
            out,
            "   {:<30} {:>14}",
            supplier.supplier,
            format_usd(supplier.potential_savings)
        );
    }

    out.push_str("\n📈 Largest price changes\n");
    for outlier in &report.outliers {
        let _ = writeln!(
            out,
            "   {:<30} {:<30} {:>+10.2}",
            outlier.supplier, outlier.item_name, outlier.price_change
        );
    }

    out.push_str("\n📋 Recommended actions\n");
    for action in &report.actions {
        let line = match action {
            RecommendedAction::RenegotiatePricing { supplier, savings } => {
                format!("Renegotiate Pricing: {} ({})", supplier, savings)
            }
            RecommendedAction::ConsolidateTailSpend { note } => {
                format!("Consolidate Tail Spend: {}", note)
            }
            RecommendedAction::RationalizeOverlappingMaterials { note } => {
                format!("Rationalize Overlapping Materials: {}", note)
            }
        };
        let _ = writeln!(out, "   • {}", line);
    }

    out.push('\n');
    out.push_str(&render_findings(&report.dynamic_insights));
    out
}
