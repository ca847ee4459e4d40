use std::collections::BTreeMap;

use ov_core::{
    first_non_blank, first_present, MetaValue, Metadata, OdeError, PageRecord, ParseOptions,
};
use ov_parser::XmlDocument;

use crate::schema::{HTML_VIEW, PAGE_ID, PAGE_NAME, PAGE_ORDER, PAGE_PARENT, PAGE_RECORD};

pub const UNTITLED_PAGE: &str = "Untitled page";
const FRAGMENT_SEPARATOR: &str = "\n\n";

const LEGACY_ROOT_FIELDS: &[&str] = &["root", "_root"];
const LEGACY_ID_FIELDS: &[&str] = &["_id", "id", "nodeId"];
const LEGACY_TITLE_FIELDS: &[&str] = &["_title", "title"];
const LEGACY_ORDER_FIELDS: &[&str] = &["order", "_order"];
const LEGACY_CHILDREN_FIELDS: &[&str] = &["children", "_children"];
const LEGACY_DEVICE_FIELDS: &[&str] = &["idevices", "_idevices"];
const LEGACY_CONTENT_FIELDS: &[&str] = &["content_w_resourcePaths", "_content", "content", "html"];
const LEGACY_NESTED_FIELDS: &str = "fields";

pub fn extract_modern_pages(document: &XmlDocument) -> Vec<PageRecord> {
    document
        .descendants_named(PAGE_RECORD)
        .into_iter()
        .enumerate()
        .map(|(index, page)| {
            let id = page
                .child_text(PAGE_ID)
                .unwrap_or_else(|| format!("page-{}", index + 1));
            let title = page
                .child_text(PAGE_NAME)
                .unwrap_or_else(|| fallback_title(&id));
            let order = PAGE_ORDER
                .iter()
                .find_map(|name| page.child_text(name).and_then(|raw| parse_order(&raw)))
                .unwrap_or(index as i64);
            let parent_id = PAGE_PARENT
                .iter()
                .find_map(|name| page.child_text(name))
                .filter(|parent| *parent != id)
                .unwrap_or_default();
            let html_content = page
                .descendants_named(HTML_VIEW)
                .into_iter()
                .map(|view| view.text_content())
                .filter(|fragment| !fragment.trim().is_empty())
                .collect::<Vec<_>>()
                .join(FRAGMENT_SEPARATOR);

            PageRecord {
                id,
                title,
                html_content,
                parent_id,
                order,
                index,
            }
        })
        .collect()
}

pub fn extract_legacy_pages(
    metadata: &Metadata,
    options: &ParseOptions,
) -> Result<Vec<PageRecord>, OdeError> {
    let mut walker = LegacyPageWalker {
        records: Vec::new(),
        next_order: 0,
        max_depth: options.max_depth,
    };

    if let Some(root) = first_present(&metadata.properties, LEGACY_ROOT_FIELDS) {
        walker.walk(std::slice::from_ref(root), "", 1)?;
    } else if let Some(children) =
        first_present(&metadata.properties, LEGACY_CHILDREN_FIELDS).and_then(MetaValue::as_list)
    {
        walker.walk(children, "", 1)?;
    }

    Ok(walker.records)
}

struct LegacyPageWalker {
    records: Vec<PageRecord>,
    next_order: i64,
    max_depth: usize,
}

impl LegacyPageWalker {
    fn walk(
        &mut self,
        entries: &[MetaValue],
        parent_id: &str,
        depth: usize,
    ) -> Result<(), OdeError> {
        if depth > self.max_depth {
            return Err(OdeError::too_deep(self.max_depth));
        }

        for entry in entries {
            let Some(node) = entry.as_map() else {
                continue;
            };

            let index = self.records.len();
            let id = match first_non_blank(node, LEGACY_ID_FIELDS) {
                Some(id) => id.to_string(),
                None if parent_id.is_empty() => format!("page-{}", index + 1),
                None => format!("{}-{}", parent_id, index + 1),
            };
            let title = first_non_blank(node, LEGACY_TITLE_FIELDS)
                .map(str::to_string)
                .unwrap_or_else(|| fallback_title(&id));
            let order = first_non_blank(node, LEGACY_ORDER_FIELDS)
                .and_then(parse_order)
                .unwrap_or(self.next_order);
            self.next_order += 1;

            let parent = if parent_id == id { "" } else { parent_id };
            self.records.push(PageRecord {
                id: id.clone(),
                title,
                html_content: legacy_page_html(node),
                parent_id: parent.to_string(),
                order,
                index,
            });

            if let Some(children) =
                first_present(node, LEGACY_CHILDREN_FIELDS).and_then(MetaValue::as_list)
            {
                self.walk(children, &id, depth + 1)?;
            }
        }

        Ok(())
    }
}

fn legacy_page_html(node: &BTreeMap<String, MetaValue>) -> String {
    let mut fragments = Vec::new();
    let devices = first_present(node, LEGACY_DEVICE_FIELDS).and_then(MetaValue::as_list);
    for device in devices.unwrap_or_default() {
        collect_content(device, &mut fragments);
    }
    if fragments.is_empty() {
        collect_map_content(node, &mut fragments);
    }
    fragments.join(FRAGMENT_SEPARATOR)
}

fn collect_content(value: &MetaValue, fragments: &mut Vec<String>) {
    match value {
        MetaValue::String(text) => {
            if !text.trim().is_empty() {
                fragments.push(text.clone());
            }
        }
        MetaValue::List(items) => {
            for item in items {
                collect_content(item, fragments);
            }
        }
        MetaValue::Map(map) => collect_map_content(map, fragments),
    }
}

fn collect_map_content(map: &BTreeMap<String, MetaValue>, fragments: &mut Vec<String>) {
    // Only the highest-priority field: legacy fields store the same markup
    // under several names.
    if let Some(content) = first_present(map, LEGACY_CONTENT_FIELDS) {
        collect_content(content, fragments);
    }
    if let Some(fields) = map.get(LEGACY_NESTED_FIELDS) {
        collect_content(fields, fragments);
    }
}

fn fallback_title(id: &str) -> String {
    if id.trim().is_empty() {
        UNTITLED_PAGE.to_string()
    } else {
        id.to_string()
    }
}

fn parse_order(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(order) = raw.parse::<i64>() {
        return Some(order);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value as i64)
}
