use std::collections::BTreeMap;

use crate::error::OdeError;

/// Read access to the files of an unpacked or archived package. Paths are
/// container-relative and use forward slashes.
pub trait PackageContainer {
    fn has_file(&self, path: &str) -> bool;
    fn read_text(&self, path: &str) -> Result<String, OdeError>;
    fn list_entries(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryContainer {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl PackageContainer for MemoryContainer {
    fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read_text(&self, path: &str) -> Result<String, OdeError> {
        let Some(bytes) = self.files.get(path) else {
            return Err(OdeError::new(
                "PACKAGE_NOT_FOUND",
                format!("File \"{}\" does not exist in package.", path),
            ));
        };
        String::from_utf8(bytes.clone()).map_err(|error| {
            OdeError::new(
                "PACKAGE_READ",
                format!("File \"{}\" is not valid UTF-8: {}", path, error),
            )
        })
    }

    fn list_entries(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }
}
