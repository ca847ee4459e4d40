use std::collections::BTreeMap;

use ov_core::{MetaValue, Metadata};
use ov_parser::{XmlDocument, XmlElementNode};

use crate::schema::{PROPERTY_RECORD, RECORD_KEY, RECORD_VALUE, RESOURCE_RECORD};

pub fn extract_modern_metadata(document: &XmlDocument) -> Metadata {
    let mut properties = BTreeMap::new();
    for (key, value) in key_value_records(document, PROPERTY_RECORD) {
        properties.insert(key, MetaValue::String(value));
    }

    let resources = key_value_records(document, RESOURCE_RECORD)
        .into_iter()
        .collect::<BTreeMap<_, _>>();

    Metadata {
        properties,
        resources,
    }
}

fn key_value_records(document: &XmlDocument, record_name: &str) -> Vec<(String, String)> {
    document
        .descendants_named(record_name)
        .into_iter()
        .filter_map(read_record)
        .collect()
}

fn read_record(record: &XmlElementNode) -> Option<(String, String)> {
    let key = record.child_text(RECORD_KEY)?;
    let value = record.child_text(RECORD_VALUE).unwrap_or_default();
    Some((key, value))
}
