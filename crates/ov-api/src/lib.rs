use ov_core::{ManifestReport, OdeError, PackageContainer, ParseOptions, ValidationResult};
use ov_manifest::{analyze_manifest, find_missing_resources};
use serde::{Deserialize, Serialize};

mod containers;

pub use containers::{open_container, DirContainer, ZipContainer};

/// Manifest names tried in order when a package is inspected without an
/// explicit manifest path.
pub const MANIFEST_CANDIDATES: &[&str] = &["content.xml", "contentv3.xml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageReport {
    pub manifest_path: String,
    #[serde(flatten)]
    pub report: ManifestReport,
    pub missing_resources: Vec<String>,
}

pub fn find_manifest(container: &dyn PackageContainer) -> Result<String, OdeError> {
    MANIFEST_CANDIDATES
        .iter()
        .find(|candidate| container.has_file(candidate))
        .map(|candidate| candidate.to_string())
        .ok_or_else(|| {
            OdeError::new(
                "PACKAGE_MANIFEST_MISSING",
                format!(
                    "No manifest found in package (looked for {}).",
                    MANIFEST_CANDIDATES.join(", ")
                ),
            )
        })
}

pub fn inspect_package(
    container: &dyn PackageContainer,
    options: &ParseOptions,
) -> Result<PackageReport, OdeError> {
    let manifest_path = find_manifest(container)?;
    inspect_manifest_at(container, &manifest_path, options)
}

/// Analyzes the manifest at `manifest_path` and checks every referenced
/// resource against the same container.
pub fn inspect_manifest_at(
    container: &dyn PackageContainer,
    manifest_path: &str,
    options: &ParseOptions,
) -> Result<PackageReport, OdeError> {
    let source = container.read_text(manifest_path)?;
    let mut report = analyze_manifest(&source, options)?;

    let missing_resources = find_missing_resources(&report.resource_paths, container);
    if !missing_resources.is_empty() {
        report.checks.push(ValidationResult::warning(format!(
            "{} referenced resource(s) missing: {}",
            missing_resources.len(),
            missing_resources.join(", ")
        )));
    }

    Ok(PackageReport {
        manifest_path: manifest_path.to_string(),
        report,
        missing_resources,
    })
}
