//! Download run: progress lines, final count, optional failure on zero downloads.

use anyhow::Result;
use gdl_core::config::GdlConfig;
use gdl_core::fetch::{self, FetchReport, FetchRequest};
use std::io::Write;

pub fn run_fetch(req: &FetchRequest, cfg: &GdlConfig) -> Result<()> {
    let report = fetch::run(req, cfg, |path| {
        println!("Downloading file '{}'...", path.display());
    })?;
    finish(&report, req.fail_if_nothing_was_downloaded, &mut std::io::stdout())
}

/// Prints the final count, then applies the fail-if-nothing rule.
/// The count line is written even when the run then fails.
fn finish<W: Write>(
    report: &FetchReport,
    fail_if_nothing_was_downloaded: bool,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Downloaded {} file(s).", report.count())?;
    out.flush()?;
    tracing::info!(
        count = report.count(),
        destination = %report.destination.display(),
        "run finished"
    );

    report.enforce(fail_if_nothing_was_downloaded)?;
    Ok(())
}
