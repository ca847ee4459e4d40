use ov_api::PackageReport;
use ov_core::{OdeError, PageNode};

use crate::map_cli_output;

/// Prints the report in the `KEY:value` line protocol. Free-form values that
/// may carry separators or newlines are JSON-encoded.
pub(crate) fn emit_report(package: &PackageReport) -> Result<(), OdeError> {
    let report = &package.report;
    println!("RESULT:OK");
    println!("MANIFEST:{}", package.manifest_path);
    println!("DIALECT:{}", report.dialect.as_str());

    for check in &report.checks {
        println!("CHECK:{}:{}", check.status.as_str(), check.message);
    }

    for (key, value) in &report.metadata.properties {
        let encoded = serde_json::to_string(value).map_err(map_cli_output)?;
        println!("META:{}={}", key, encoded);
    }

    for (level, page) in flatten_pages(&report.pages) {
        println!("PAGE:{}:{}:{}", level, page.id, single_line(&page.title));
    }

    for path in &report.resource_paths {
        println!("RESOURCE:{}", path);
    }

    for path in &package.missing_resources {
        println!("MISSING:{}", path);
    }

    Ok(())
}

pub(crate) fn emit_json(package: &PackageReport) -> Result<(), OdeError> {
    let payload = serde_json::to_string_pretty(package).map_err(map_cli_output)?;
    println!("{}", payload);
    Ok(())
}

/// Pre-order walk of the forest with each node's depth.
pub(crate) fn flatten_pages(pages: &[PageNode]) -> Vec<(usize, &PageNode)> {
    let mut flat = Vec::new();
    let mut pending = pages.iter().rev().collect::<Vec<_>>();
    while let Some(page) = pending.pop() {
        flat.push((page.level, page));
        pending.extend(page.children.iter().rev());
    }
    flat
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
