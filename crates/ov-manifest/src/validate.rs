use ov_core::ValidationResult;
use ov_parser::{XmlDocument, XmlElementNode};

use crate::schema::{
    BLOCK_RECORD, BLOCK_REQUIRED, COMPONENT_RECORD, COMPONENT_REQUIRED, NAV_CONTAINER,
    PAGE_RECORD, PAGE_REQUIRED, ROOT_ELEMENT,
};

pub fn check_root_element(document: &XmlDocument) -> ValidationResult {
    let found = document.root.name.as_str();
    if found.eq_ignore_ascii_case(ROOT_ELEMENT) {
        return ValidationResult::success(format!("Root element <{}> found.", found));
    }

    let found = if found.is_empty() { "(none)" } else { found };
    ValidationResult::error(format!(
        "Expected root element <{}> but found <{}>.",
        ROOT_ELEMENT, found
    ))
}

pub fn check_navigation_container(document: &XmlDocument) -> ValidationResult {
    if document.descendants_named(NAV_CONTAINER).is_empty() {
        return ValidationResult::error(format!(
            "Required element <{}> is missing.",
            NAV_CONTAINER
        ));
    }
    ValidationResult::success(format!("Navigation container <{}> found.", NAV_CONTAINER))
}

pub fn check_page_presence(document: &XmlDocument) -> ValidationResult {
    page_presence_result(document.descendants_named(PAGE_RECORD).len())
}

pub fn page_presence_result(count: usize) -> ValidationResult {
    match count {
        0 => ValidationResult::warning("No pages found; the project appears empty."),
        1 => ValidationResult::success("Found 1 page."),
        n => ValidationResult::success(format!("Found {} pages.", n)),
    }
}

pub fn validate_structural_integrity(document: &XmlDocument) -> ValidationResult {
    let mut violations = Vec::new();

    for (page_index, page) in document.descendants_named(PAGE_RECORD).iter().enumerate() {
        let page_no = page_index + 1;
        if let Some(missing) = missing_fields(page, PAGE_REQUIRED) {
            violations.push(format!("Page #{} is missing fields: {}", page_no, missing));
        }

        for (block_index, block) in page.descendants_named(BLOCK_RECORD).iter().enumerate() {
            let block_no = block_index + 1;
            if let Some(missing) = missing_fields(block, BLOCK_REQUIRED) {
                violations.push(format!(
                    "Block #{} in page #{} is missing fields: {}",
                    block_no, page_no, missing
                ));
            }

            for (component_index, component) in block
                .descendants_named(COMPONENT_RECORD)
                .iter()
                .enumerate()
            {
                if let Some(missing) = missing_fields(component, COMPONENT_REQUIRED) {
                    violations.push(format!(
                        "Component #{} in block #{} of page #{} is missing fields: {}",
                        component_index + 1,
                        block_no,
                        page_no,
                        missing
                    ));
                }
            }
        }
    }

    if violations.is_empty() {
        return ValidationResult::success(
            "All pages, blocks and components have their required fields.",
        );
    }

    ValidationResult::error(format!(
        "Found {} structural problem(s): {}",
        violations.len(),
        violations.join("; ")
    ))
}

pub fn validate_document(document: &XmlDocument) -> Vec<ValidationResult> {
    let mut results = Vec::new();

    let root = check_root_element(document);
    let root_ok = !root.is_error();
    results.push(root);
    if !root_ok {
        return results;
    }

    let navigation = check_navigation_container(document);
    let navigation_ok = !navigation.is_error();
    results.push(navigation);
    if !navigation_ok {
        return results;
    }

    results.push(check_page_presence(document));
    results.push(validate_structural_integrity(document));
    results
}

fn missing_fields(node: &XmlElementNode, required: &[&[&str]]) -> Option<String> {
    let missing = required
        .iter()
        .filter(|alternatives| !alternatives.iter().any(|name| node.has_child_named(name)))
        .map(|alternatives| alternatives.join("|"))
        .collect::<Vec<_>>();

    if missing.is_empty() {
        None
    } else {
        Some(missing.join(", "))
    }
}
