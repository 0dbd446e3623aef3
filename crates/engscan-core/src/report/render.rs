use std::fmt::Write;

use crate::TOOL_NAME;
use crate::report::model::Report;
use crate::util::deterministic::rank_candidates;

/// Number of runner-up candidates listed in text output.
const CANDIDATE_LIMIT: usize = 5;

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", TOOL_NAME, report.tool.version);
    if let Some(path) = &report.artifact.path {
        let _ = writeln!(out, "Snapshot: {path}");
    }
    let _ = writeln!(out, "Snapshot size: {} bytes", report.artifact.size_bytes);

    if report.analysis.status != "ok" {
        let _ = writeln!(out, "Analysis: {}", report.analysis.status);
        for w in &report.analysis.warnings {
            let _ = writeln!(out, "  ! {w}");
        }
    }

    match &report.detection {
        Some(d) => {
            let _ = writeln!(
                out,
                "Engine: {} (confidence {:.2})",
                d.name,
                d.confidence.as_f64()
            );
            if !d.features.is_empty() {
                let _ = writeln!(out, "Features: {}", d.features.join(", "));
            }
            if !d.warnings.is_empty() {
                out.push_str("Warnings:\n");
                for w in &d.warnings {
                    let _ = writeln!(out, "  ! {w}");
                }
            }
            out.push_str("Recommendations:\n");
            for r in &d.recommendations {
                let _ = writeln!(out, "  - {r}");
            }
        }
        None => out.push_str("Engine: none detected\n"),
    }

    let ranked = rank_candidates(&report.candidates);
    if !ranked.is_empty() {
        out.push_str("Candidates:\n");
        for c in ranked.into_iter().take(CANDIDATE_LIMIT) {
            let _ = writeln!(
                out,
                "  - {} [{}/{}] {}",
                c.name, c.matched, c.total, c.label
            );
        }
    }

    out
}
