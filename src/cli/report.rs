//! Terminal rendering of extraction reports.

use anyhow::{Context, Result};
use std::path::Path;

use crystalfit::analysis::{CircuitModel, ExtractionReport};
use crystalfit::units::{format_capacitance, format_inductance, format_si};

/// Print a report as pretty JSON
pub fn print_json(report: &ExtractionReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

/// Print a report, colorized when the feature is enabled
pub fn print_report(file: &Path, report: &ExtractionReport) {
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", format_colored(file, report));
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", format_plain(file, report));
    }
}

fn element_rows(model: &CircuitModel) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("fs", format_si(model.fs, "Hz")),
        ("fp", format_si(model.fp, "Hz")),
        ("R1", format!("{:.2} Ohm", model.r1)),
        ("L1", format_inductance(model.l1)),
        ("C1", format_capacitance(model.c1)),
        ("C0", format_capacitance(model.c0)),
    ];
    if let Some(esr) = model.esr {
        rows.push(("ESR", format!("{:.2} Ohm", esr)));
    }
    rows.push(("Q", format!("{:.0}", model.q)));
    rows
}

fn diagnostic_rows(report: &ExtractionReport) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Samples", report.sample_count.to_string()),
        ("Min. loss", format!("{:.3} dB", report.resonance.loss_min)),
        (
            "reff",
            format!("{:.2} Ohm", report.effective_resistance),
        ),
    ];
    if let Some(resolution) = report.frequency_resolution {
        rows.push(("Resolution", format!("{:.2} Hz", resolution)));
    }
    if let Some(bw) = &report.bandwidth {
        rows.push((
            "Bandwidth",
            format!(
                "{:.1} Hz ({:.1} .. {:.1} Hz)",
                bw.bandwidth_hz, bw.lower_hz, bw.upper_hz
            ),
        ));
    }
    if let Some(zero) = &report.zero_phase {
        rows.push(("Zero phase", format_si(zero.frequency, "Hz")));
    }
    if let Some(cstray) = report.stray_capacitance {
        rows.push(("Cstray", format_capacitance(cstray)));
    }
    rows
}

/// Plain text rendering
#[cfg_attr(feature = "colorized_output", allow(dead_code))]
pub fn format_plain(file: &Path, report: &ExtractionReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("Crystal Parameters ({})\n", report.model.method));
    output.push_str("==================\n");
    output.push_str(&format!("File: {}\n\n", file.display()));
    for (name, value) in element_rows(&report.model) {
        output.push_str(&format!("  {:<11}{}\n", name, value));
    }
    output.push_str("\nDiagnostics:\n");
    for (name, value) in diagnostic_rows(report) {
        output.push_str(&format!("  {:<11}{}\n", name, value));
    }
    output.trim_end().to_string()
}

/// Colorized rendering
#[cfg(feature = "colorized_output")]
pub fn format_colored(file: &Path, report: &ExtractionReport) -> String {
    use console::style;

    let mut output = String::new();
    output.push_str(&format!(
        "{} ({})\n",
        style("Crystal Parameters").bold().cyan(),
        style(report.model.method).cyan()
    ));
    output.push_str(&format!("{}\n", style("==================").cyan()));
    output.push_str(&format!("{}: {}\n\n", style("File").bold(), file.display()));
    for (name, value) in element_rows(&report.model) {
        output.push_str(&format!(
            "  {}{}\n",
            style(format!("{:<11}", name)).bold(),
            style(value).green()
        ));
    }
    output.push_str(&format!("\n{}\n", style("Diagnostics:").bold()));
    for (name, value) in diagnostic_rows(report) {
        output.push_str(&format!("  {:<11}{}\n", name, style(value).dim()));
    }
    output.trim_end().to_string()
}

/// One-line summary used by the batch command
pub fn summary_line(model: &CircuitModel) -> String {
    let mut line = format!(
        "fs={:.0} Hz R1={:.2} Ohm L1={} C1={} C0={} Q={:.0}",
        model.fs,
        model.r1,
        format_inductance(model.l1),
        format_capacitance(model.c1),
        format_capacitance(model.c0),
        model.q
    );
    if let Some(esr) = model.esr {
        line.push_str(&format!(" ESR={:.2} Ohm", esr));
    }
    line
}
