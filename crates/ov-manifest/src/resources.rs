use std::collections::BTreeSet;
use std::sync::OnceLock;

use ov_core::PackageContainer;
use ov_parser::XmlDocument;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::schema::{HTML_VIEW, JSON_PROPERTIES};

const RESOURCE_FOLDERS: &[&str] = &["content/", "resources/", "files/", "custom/"];

const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub fn extract_resource_paths(document: &XmlDocument) -> Vec<String> {
    let mut paths = BTreeSet::new();

    for view in document.descendants_named(HTML_VIEW) {
        collect_from_html(&view.text_content(), &mut paths);
    }

    for blob in document.descendants_named(JSON_PROPERTIES) {
        let raw = blob.text_content();
        match serde_json::from_str::<JsonValue>(&raw) {
            Ok(value) => collect_from_json(&value, &mut paths),
            Err(_) => collect_from_html(&raw, &mut paths),
        }
    }

    paths.into_iter().collect()
}

pub fn extract_resource_paths_from_html(html: &str) -> Vec<String> {
    let mut paths = BTreeSet::new();
    collect_from_html(html, &mut paths);
    paths.into_iter().collect()
}

// Inputs are already decoded, so `%` here is part of the file name.
pub fn find_missing_resources(paths: &[String], container: &dyn PackageContainer) -> Vec<String> {
    let mut missing = Vec::new();
    for path in paths {
        let cleaned = path.trim().replace('\\', "/");
        let normalized = strip_leading(&cleaned);
        if normalized.is_empty() {
            continue;
        }
        let normalized = normalized.to_string();
        if container.has_file(&normalized) {
            continue;
        }
        let encoded = utf8_percent_encode(&normalized, PATH_ENCODE_SET).to_string();
        if encoded != normalized && container.has_file(&encoded) {
            continue;
        }
        if !missing.contains(&normalized) {
            missing.push(normalized);
        }
    }
    missing
}

pub fn normalize_resource_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_suffix = trimmed
        .split(|ch| ch == '?' || ch == '#')
        .next()
        .unwrap_or_default();
    let decoded = percent_decode_str(without_suffix)
        .decode_utf8_lossy()
        .replace('\\', "/");

    let path = strip_leading(&decoded);
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

fn strip_leading(mut path: &str) -> &str {
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            return path;
        }
    }
}

fn collect_from_html(html: &str, paths: &mut BTreeSet<String>) {
    for caps in attribute_regex().captures_iter(html) {
        let Some(value) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        push_candidate(value.as_str(), paths);
    }
}

fn collect_from_json(value: &JsonValue, paths: &mut BTreeSet<String>) {
    match value {
        JsonValue::String(text) if text.contains('<') => collect_from_html(text, paths),
        JsonValue::String(text) => {
            if RESOURCE_FOLDERS.iter().any(|folder| text.contains(folder)) {
                push_candidate(text, paths);
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                collect_from_json(item, paths);
            }
        }
        JsonValue::Object(entries) => {
            for item in entries.values() {
                collect_from_json(item, paths);
            }
        }
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => {}
    }
}

fn push_candidate(raw: &str, paths: &mut BTreeSet<String>) {
    if is_external_reference(raw) {
        return;
    }
    if let Some(path) = normalize_resource_path(raw) {
        paths.insert(path);
    }
}

fn is_external_reference(raw: &str) -> bool {
    let value = raw.trim();
    value.starts_with('#') || value.starts_with("//") || scheme_regex().is_match(value)
}

fn attribute_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:src|href)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("attribute regex")
    })
}

fn scheme_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme regex"))
}
