pub const ROOT_ELEMENT: &str = "ode";
pub const NAV_CONTAINER: &str = "odeNavStructures";
pub const PAGE_RECORD: &str = "odeNavStructure";
pub const BLOCK_RECORD: &str = "odePagStructure";
pub const COMPONENT_RECORD: &str = "odeComponent";

pub const PROPERTY_RECORD: &str = "odeProperty";
pub const RESOURCE_RECORD: &str = "odeResource";
pub const RECORD_KEY: &str = "key";
pub const RECORD_VALUE: &str = "value";

pub const PAGE_ID: &str = "odePageId";
pub const PAGE_NAME: &str = "pageName";
pub const PAGE_ORDER: &[&str] = &["odeNavStructureOrder", "odeNavStructureSyncOrder"];
pub const PAGE_PARENT: &[&str] = &["odeParentPageId", "parentPageId", "parentId"];

pub const HTML_VIEW: &str = "htmlView";
pub const JSON_PROPERTIES: &str = "jsonProperties";

// Inner slices are alternative names for one required field.
pub const PAGE_REQUIRED: &[&[&str]] = &[&[PAGE_ID], &[PAGE_NAME], PAGE_ORDER];
pub const BLOCK_REQUIRED: &[&[&str]] = &[
    &["odeBlockId"],
    &["odePagStructureOrder", "odePagStructureSyncOrder"],
];
pub const COMPONENT_REQUIRED: &[&[&str]] = &[
    &["odeIdeviceId"],
    &["odeIdeviceTypeName"],
    &[HTML_VIEW, JSON_PROPERTIES],
];
