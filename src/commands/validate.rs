//! Validate post front-matter

use anyhow::Result;
use std::path::Path;

use crate::content::validate::{validate_dir, FileReport};

/// Validate every post under `dir`, returning the reports and whether all
/// of them passed
pub fn run(dir: &Path) -> Result<(Vec<FileReport>, bool)> {
    if !dir.is_dir() {
        anyhow::bail!("Directory not found: {:?}", dir);
    }

    tracing::info!("Validating posts in {:?}", dir);
    let reports = validate_dir(dir);
    let ok = reports.iter().all(FileReport::is_valid);
    Ok((reports, ok))
}

/// Render reports the way the CLI prints them
pub fn format_reports(reports: &[FileReport]) -> String {
    let mut out = String::new();
    let mut failed = 0;

    for report in reports {
        if report.is_valid() {
            out.push_str(&format!("ok    {}\n", report.path.display()));
            continue;
        }
        failed += 1;
        out.push_str(&format!("FAIL  {}\n", report.path.display()));
        for issue in &report.issues {
            out.push_str(&format!("      - [{}] {}\n", issue.field, issue.message));
        }
    }

    out.push_str(&format!(
        "\n{} post(s) checked, {} with issues\n",
        reports.len(),
        failed
    ));
    out
}
