use std::collections::BTreeMap;

use ov_core::{MetaValue, Metadata, OdeError, ParseOptions};
use ov_parser::{XmlDocument, XmlElementNode};

pub const LEGACY_VERSION_KEY: &str = "legacy_manifest_version";
pub const LEGACY_CLASS_KEY: &str = "legacy_manifest_class";

const KEY_ROLE: &str = "key";

const LEGACY_KEY_MAP: &[(&str, &[&str])] = &[
    ("pp_title", &["_title", "title"]),
    ("pp_author", &["_author", "author"]),
    ("pp_lang", &["_lang", "lang"]),
    ("pp_description", &["_description", "description"]),
    ("license", &["_license", "license"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegacyValueKind {
    Scalar,
    List,
    Dictionary,
    Instance,
    Unknown,
}

impl LegacyValueKind {
    fn of(node: &XmlElementNode) -> Self {
        match node.name.as_str() {
            "string" | "unicode" | "bool" | "int" | "float" | "long" | "none" => Self::Scalar,
            "list" => Self::List,
            "dictionary" => Self::Dictionary,
            "instance" => Self::Instance,
            _ => Self::Unknown,
        }
    }
}

pub fn extract_legacy_metadata(
    document: &XmlDocument,
    options: &ParseOptions,
) -> Result<Metadata, OdeError> {
    let root = &document.root;
    let mut properties = match LegacyValueKind::of(root) {
        LegacyValueKind::Dictionary => decode_dictionary(root, 1, options.max_depth)?,
        _ => decode_instance(root, 1, options.max_depth)?,
    };

    if let Some(version) = root.attr("version") {
        properties.insert(LEGACY_VERSION_KEY.to_string(), MetaValue::from(version));
    }
    if let Some(class) = root.attr("class") {
        properties.insert(LEGACY_CLASS_KEY.to_string(), MetaValue::from(class));
    }

    Ok(Metadata {
        properties,
        resources: BTreeMap::new(),
    })
}

pub fn normalize_legacy_metadata(metadata: Option<&Metadata>) -> Option<Metadata> {
    let metadata = metadata?;
    let mut properties = metadata.properties.clone();

    for (modern_key, legacy_keys) in LEGACY_KEY_MAP {
        if properties.contains_key(*modern_key) {
            continue;
        }
        let Some(value) = legacy_keys
            .iter()
            .find_map(|key| metadata.properties.get(*key))
        else {
            continue;
        };
        properties.insert((*modern_key).to_string(), value.clone());
    }

    Some(Metadata {
        properties,
        resources: metadata.resources.clone(),
    })
}

fn decode_value(
    node: &XmlElementNode,
    depth: usize,
    max_depth: usize,
) -> Result<MetaValue, OdeError> {
    if depth > max_depth {
        return Err(OdeError::too_deep(max_depth));
    }

    match LegacyValueKind::of(node) {
        LegacyValueKind::Scalar => Ok(MetaValue::String(scalar_text(node))),
        LegacyValueKind::List => {
            let mut values = Vec::new();
            for child in node.element_children() {
                values.push(decode_value(child, depth + 1, max_depth)?);
            }
            Ok(MetaValue::List(values))
        }
        LegacyValueKind::Dictionary => {
            Ok(MetaValue::Map(decode_dictionary(node, depth, max_depth)?))
        }
        LegacyValueKind::Instance => {
            Ok(MetaValue::Map(decode_instance(node, depth, max_depth)?))
        }
        LegacyValueKind::Unknown => Ok(MetaValue::String(node.text_content())),
    }
}

// Each `role="key"` marker pairs with the sibling right after it.
fn decode_dictionary(
    node: &XmlElementNode,
    depth: usize,
    max_depth: usize,
) -> Result<BTreeMap<String, MetaValue>, OdeError> {
    if depth > max_depth {
        return Err(OdeError::too_deep(max_depth));
    }

    let siblings = node.element_children().collect::<Vec<_>>();
    let mut entries = BTreeMap::new();
    let mut index = 0;
    while index < siblings.len() {
        let marker = siblings[index];
        if marker.attr("role") != Some(KEY_ROLE) || index + 1 >= siblings.len() {
            index += 1;
            continue;
        }
        let value = decode_value(siblings[index + 1], depth + 1, max_depth)?;
        entries.insert(scalar_text(marker), value);
        index += 2;
    }
    Ok(entries)
}

fn decode_instance(
    node: &XmlElementNode,
    depth: usize,
    max_depth: usize,
) -> Result<BTreeMap<String, MetaValue>, OdeError> {
    match node.child_named("dictionary") {
        Some(dictionary) => decode_dictionary(dictionary, depth + 1, max_depth),
        None => Ok(BTreeMap::new()),
    }
}

fn scalar_text(node: &XmlElementNode) -> String {
    match node.attr("value") {
        Some(value) => value.to_string(),
        None => node.text_content(),
    }
}

#[cfg(test)]
mod legacy_tests {
    use super::*;
    use ov_parser::parse_xml_document;

    fn extract(source: &str) -> Metadata {
        let document = parse_xml_document(source).expect("xml should parse");
        extract_legacy_metadata(&document, &ParseOptions::default()).expect("decode")
    }

    fn metadata_with(entries: &[(&str, &str)]) -> Metadata {
        let mut metadata = Metadata::default();
        for (key, value) in entries {
            metadata
                .properties
                .insert((*key).to_string(), MetaValue::from(*value));
        }
        metadata
    }

    #[test]
    fn lifts_root_attributes_and_decodes_scalars() {
        let metadata = extract(
            r#"
<instance class="exe.engine.package.Package" version="0.3">
  <dictionary>
    <string role="key" value="_title"/>
    <unicode value="Legacy course"/>
    <string role="key" value="_author"/>
    <unicode>Ada</unicode>
    <string role="key" value="isChanged"/>
    <bool value="0"/>
  </dictionary>
</instance>"#,
        );
        assert_eq!(metadata.property_str(LEGACY_VERSION_KEY), Some("0.3"));
        assert_eq!(
            metadata.property_str(LEGACY_CLASS_KEY),
            Some("exe.engine.package.Package")
        );
        assert_eq!(metadata.property_str("_title"), Some("Legacy course"));
        assert_eq!(metadata.property_str("_author"), Some("Ada"));
        assert_eq!(metadata.property_str("isChanged"), Some("0"));
        assert!(metadata.resources.is_empty());
    }

    #[test]
    fn decodes_nested_lists_dictionaries_and_instances() {
        let metadata = extract(
            r#"
<dictionary>
  <string role="key" value="tags"/>
  <list><unicode value="a"/><list><int value="1"/></list></list>
  <string role="key" value="root"/>
  <instance class="exe.engine.node.Node">
    <dictionary>
      <string role="key" value="_id"/>
      <unicode value="n1"/>
    </dictionary>
  </instance>
  <string role="key" value="empty"/>
  <instance class="Empty"/>
  <string role="key" value="odd"/>
  <reference key="12">ref-text</reference>
</dictionary>"#,
        );
        let tags = metadata.properties["tags"].as_list().expect("list");
        assert_eq!(tags[0].as_string(), Some("a"));
        assert_eq!(tags[1].as_list().expect("inner")[0].as_string(), Some("1"));

        let root = metadata.properties["root"].as_map().expect("instance map");
        assert_eq!(root["_id"].as_string(), Some("n1"));
        assert!(metadata.properties["empty"].as_map().expect("map").is_empty());
        assert_eq!(metadata.property_str("odd"), Some("ref-text"));
    }

    #[test]
    fn unpaired_trailing_key_and_stray_values_are_ignored() {
        let metadata = extract(
            r#"
<dictionary>
  <unicode value="stray"/>
  <string role="key" value="a"/>
  <unicode value="1"/>
  <string role="key" value="dangling"/>
</dictionary>"#,
        );
        assert_eq!(metadata.properties.len(), 1);
        assert_eq!(metadata.property_str("a"), Some("1"));
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let metadata = extract(
            r#"
<dictionary>
  <string role="key" value="a"/><unicode value="1"/>
  <string role="key" value="a"/><unicode value="2"/>
</dictionary>"#,
        );
        assert_eq!(metadata.property_str("a"), Some("2"));
    }

    #[test]
    fn deep_nesting_fails_with_clear_error() {
        let mut source = String::from(r#"<dictionary><string role="key" value="x"/>"#);
        for _ in 0..20 {
            source.push_str("<list>");
        }
        for _ in 0..20 {
            source.push_str("</list>");
        }
        source.push_str("</dictionary>");
        let document = parse_xml_document(&source).expect("xml should parse");

        let error = extract_legacy_metadata(&document, &ParseOptions { max_depth: 8 })
            .expect_err("depth limit should trigger");
        assert_eq!(error.code, "MANIFEST_TOO_DEEP");
        assert!(extract_legacy_metadata(&document, &ParseOptions { max_depth: 64 }).is_ok());
    }

    #[test]
    fn normalizer_copies_missing_modern_keys() {
        let legacy = metadata_with(&[
            ("_title", "T"),
            ("_author", "A"),
            ("_lang", "es"),
            ("_description", "D"),
            ("license", "CC-BY"),
        ]);
        let normalized = normalize_legacy_metadata(Some(&legacy)).expect("metadata");
        assert_eq!(normalized.property_str("pp_title"), Some("T"));
        assert_eq!(normalized.property_str("pp_author"), Some("A"));
        assert_eq!(normalized.property_str("pp_lang"), Some("es"));
        assert_eq!(normalized.property_str("pp_description"), Some("D"));
        assert_eq!(normalized.property_str("license"), Some("CC-BY"));
        assert_eq!(normalized.property_str("_title"), Some("T"));
    }

    #[test]
    fn normalizer_never_overwrites_existing_modern_key() {
        let legacy = metadata_with(&[("pp_title", "A"), ("_title", "B")]);
        let normalized = normalize_legacy_metadata(Some(&legacy)).expect("metadata");
        assert_eq!(normalized.property_str("pp_title"), Some("A"));
    }

    #[test]
    fn normalizer_passes_resources_and_absence_through() {
        assert!(normalize_legacy_metadata(None).is_none());

        let mut legacy = Metadata::default();
        legacy
            .resources
            .insert("logo".to_string(), "resources/logo.png".to_string());
        let normalized = normalize_legacy_metadata(Some(&legacy)).expect("metadata");
        assert_eq!(normalized.resources, legacy.resources);
        assert!(normalized.properties.is_empty());
    }
}
