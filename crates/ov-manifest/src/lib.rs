mod hierarchy;
mod legacy;
mod metadata;
mod pages;
mod resources;
pub mod schema;
mod validate;

use ov_core::{ManifestDialect, ManifestReport, OdeError, ParseOptions, ValidationResult};
use ov_parser::{parse_xml_document_with, XmlDocument};

pub use hierarchy::build_page_tree;
pub use legacy::{
    extract_legacy_metadata, normalize_legacy_metadata, LEGACY_CLASS_KEY, LEGACY_VERSION_KEY,
};
pub use metadata::extract_modern_metadata;
pub use pages::{extract_legacy_pages, extract_modern_pages, UNTITLED_PAGE};
pub use resources::{
    extract_resource_paths, extract_resource_paths_from_html, find_missing_resources,
    normalize_resource_path,
};
pub use validate::{
    check_navigation_container, check_page_presence, check_root_element, page_presence_result,
    validate_document, validate_structural_integrity,
};

pub fn detect_dialect(document: &XmlDocument) -> ManifestDialect {
    if document.root.name.eq_ignore_ascii_case(schema::ROOT_ELEMENT) {
        ManifestDialect::Modern
    } else {
        ManifestDialect::Legacy
    }
}

pub fn analyze_manifest(source: &str, options: &ParseOptions) -> Result<ManifestReport, OdeError> {
    let document = parse_xml_document_with(source, options)?;
    analyze_document(&document, options)
}

pub fn analyze_document(
    document: &XmlDocument,
    options: &ParseOptions,
) -> Result<ManifestReport, OdeError> {
    match detect_dialect(document) {
        ManifestDialect::Modern => Ok(analyze_modern(document)),
        ManifestDialect::Legacy => analyze_legacy(document, options),
    }
}

fn analyze_modern(document: &XmlDocument) -> ManifestReport {
    let checks = validate_document(document);
    let metadata = extract_modern_metadata(document);

    // Root and navigation checks come first; both must pass before pages and
    // resources are worth reading.
    let structure_ok = checks.len() >= 2 && checks[..2].iter().all(|check| !check.is_error());
    let (pages, resource_paths) = if structure_ok {
        (
            build_page_tree(extract_modern_pages(document)),
            extract_resource_paths(document),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    ManifestReport {
        dialect: ManifestDialect::Modern,
        checks,
        metadata,
        pages,
        resource_paths,
    }
}

fn analyze_legacy(
    document: &XmlDocument,
    options: &ParseOptions,
) -> Result<ManifestReport, OdeError> {
    let raw_metadata = extract_legacy_metadata(document, options)?;
    let records = extract_legacy_pages(&raw_metadata, options)?;
    let metadata = normalize_legacy_metadata(Some(&raw_metadata)).unwrap_or(raw_metadata);

    let mut resource_paths = records
        .iter()
        .flat_map(|record| extract_resource_paths_from_html(&record.html_content))
        .collect::<Vec<_>>();
    resource_paths.sort();
    resource_paths.dedup();

    let detected = match metadata.property_str(LEGACY_VERSION_KEY) {
        Some(version) => format!("Legacy manifest detected (version {}).", version),
        None => "Legacy manifest detected.".to_string(),
    };
    let checks = vec![
        ValidationResult::success(detected),
        page_presence_result(records.len()),
    ];

    Ok(ManifestReport {
        dialect: ManifestDialect::Legacy,
        checks,
        metadata,
        pages: build_page_tree(records),
        resource_paths,
    })
}
