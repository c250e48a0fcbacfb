//! # Audit Report Module
//!
//! Sorting, CSV export and the console summary for a finished audit run.

use crate::audit_config::AuditConfig;
use crate::audit_errors::AuditError;
use crate::recipe_model::{AuditedFinding, IssueCode, Severity};
use chrono::SecondsFormat;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

/// CSV column order
pub const REPORT_HEADER: [&str; 9] = [
    "severity",
    "recipe_id",
    "title",
    "category",
    "issue_code",
    "where",
    "evidence",
    "suggested_fix",
    "updated_at",
];

/// Sort by severity, then recipe title; ties keep audit order
pub fn sort_findings(findings: &mut [AuditedFinding]) {
    findings.sort_by(|a, b| {
        a.severity()
            .cmp(&b.severity())
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// One CSV row; field order matches [`REPORT_HEADER`]
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    severity: Severity,
    recipe_id: &'a str,
    title: &'a str,
    category: &'a str,
    issue_code: IssueCode,
    #[serde(rename = "where")]
    location: &'a str,
    evidence: &'a str,
    suggested_fix: &'a str,
    updated_at: String,
}

impl<'a> From<&'a AuditedFinding> for ReportRow<'a> {
    fn from(finding: &'a AuditedFinding) -> Self {
        Self {
            severity: finding.severity(),
            recipe_id: &finding.recipe_id,
            title: &finding.title,
            category: &finding.category,
            issue_code: finding.code(),
            location: &finding.finding.location,
            evidence: &finding.finding.evidence,
            suggested_fix: &finding.finding.fix,
            updated_at: finding
                .updated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Write findings as CSV to any writer, header first even when there are no rows
pub fn write_report<W: io::Write>(writer: W, findings: &[AuditedFinding]) -> Result<(), AuditError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(REPORT_HEADER)?;
    for finding in findings {
        csv_writer.serialize(ReportRow::from(finding))?;
    }
    csv_writer
        .flush()
        .map_err(|e| AuditError::Report(format!("Failed to flush report: {e}")))?;
    Ok(())
}

/// Write the CSV report to `path`, creating parent directories as needed
pub fn write_csv(path: &Path, findings: &[AuditedFinding]) -> Result<(), AuditError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AuditError::Report(format!(
                "Failed to create report directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let file = fs::File::create(path).map_err(|e| {
        AuditError::Report(format!(
            "Failed to create report file '{}': {e}",
            path.display()
        ))
    })?;
    write_report(file, findings)?;

    info!(
        "Wrote {} findings to {}",
        findings.len(),
        path.display()
    );
    Ok(())
}

/// Counts shown at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub recipes_audited: usize,
    pub p0: usize,
    pub p1: usize,
    pub p2: usize,
    pub forbidden: usize,
    pub ghosts: usize,
}

impl Summary {
    pub fn from_findings(recipes_audited: usize, findings: &[AuditedFinding]) -> Self {
        let mut summary = Self {
            recipes_audited,
            ..Self::default()
        };
        for finding in findings {
            match finding.severity() {
                Severity::P0 => summary.p0 += 1,
                Severity::P1 => summary.p1 += 1,
                Severity::P2 => summary.p2 += 1,
            }
            match finding.code() {
                IssueCode::ForbiddenIngredient => summary.forbidden += 1,
                IssueCode::StepGhostIng => summary.ghosts += 1,
                _ => {}
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.p0 + self.p1 + self.p2
    }
}

/// Render the console summary
///
/// Forbidden-ingredient findings are listed up to `summary_max_listed` with a
/// trailing "... and N more" line; ghost findings are listed only when there
/// are at most `summary_max_ghosts` of them.
pub fn render_summary(
    summary: &Summary,
    findings: &[AuditedFinding],
    report_path: &Path,
    config: &AuditConfig,
) -> String {
    let mut out = String::new();
    let rule = "=".repeat(70);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "RECIPE CONSISTENCY AUDIT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Recipes audited: {}", summary.recipes_audited);
    let _ = writeln!(out, "Total findings: {}", summary.total());
    let _ = writeln!(out, "  P0 (Critical): {}", summary.p0);
    let _ = writeln!(out, "  P1 (High):     {}", summary.p1);
    let _ = writeln!(out, "  P2 (Medium):   {}", summary.p2);
    let _ = writeln!(out);
    let _ = writeln!(out, "Forbidden ingredients: {}", summary.forbidden);
    let _ = writeln!(out, "Ghost ingredients: {}", summary.ghosts);

    if summary.forbidden > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "Forbidden ingredient findings:");
        for finding in findings
            .iter()
            .filter(|f| f.code() == IssueCode::ForbiddenIngredient)
            .take(config.summary_max_listed)
        {
            let _ = writeln!(out, "  - {}: {}", finding.title, finding.finding.evidence);
        }
        if summary.forbidden > config.summary_max_listed {
            let _ = writeln!(
                out,
                "  ... and {} more",
                summary.forbidden - config.summary_max_listed
            );
        }
    }

    if summary.ghosts > 0 && summary.ghosts <= config.summary_max_ghosts {
        let _ = writeln!(out);
        let _ = writeln!(out, "Ghost ingredient findings:");
        for finding in findings
            .iter()
            .filter(|f| f.code() == IssueCode::StepGhostIng)
        {
            let _ = writeln!(out, "  - {}: {}", finding.title, finding.finding.evidence);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Report: {}", report_path.display());
    let _ = writeln!(out, "{rule}");
    out
}

/// Process exit status: 0 when no P0 finding exists, 1 otherwise
pub fn exit_status(findings: &[AuditedFinding]) -> u8 {
    if findings.iter().any(|f| f.severity() == Severity::P0) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::{Finding, Recipe};
    use chrono::{TimeZone, Utc};

    fn audited(title: &str, code: IssueCode) -> AuditedFinding {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        AuditedFinding::new(
            &Recipe::new("1", title),
            Finding::new(code, "image", "evidence", "fix"),
            at,
        )
    }

    #[test]
    fn test_report_row_uses_wire_names_and_rfc3339() -> Result<(), AuditError> {
        let mut buffer = Vec::new();
        write_report(&mut buffer, &[audited("Soup", IssueCode::ImgMissing)])?;
        let text = String::from_utf8(buffer).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "P1,1,Soup,,IMG_MISSING,image,evidence,fix,2026-10-19T08:30:00Z"
        );
        Ok(())
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&[]), 0);
        assert_eq!(exit_status(&[audited("A", IssueCode::ImgGenericName)]), 0);
        assert_eq!(
            exit_status(&[
                audited("A", IssueCode::ImgMissing),
                audited("B", IssueCode::StepGhostIng)
            ]),
            1
        );
    }

    #[test]
    fn test_ghosts_hidden_above_limit() {
        let config = AuditConfig {
            summary_max_ghosts: 1,
            ..AuditConfig::default()
        };
        let findings = vec![
            audited("A", IssueCode::StepGhostIng),
            audited("B", IssueCode::StepGhostIng),
        ];
        let summary = Summary::from_findings(2, &findings);
        let text = render_summary(&summary, &findings, Path::new("r.csv"), &config);
        assert!(text.contains("Ghost ingredients: 2"));
        assert!(!text.contains("Ghost ingredient findings:"));
    }
}
