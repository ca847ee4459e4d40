use std::fmt::Display;
use std::fs;
use std::io::{Cursor, ErrorKind, Read, Seek};
use std::path::{Component, Path, PathBuf};

use ov_core::{MemoryContainer, OdeError, PackageContainer};
use walkdir::WalkDir;
use zip::ZipArchive;

const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "elp"];

fn map_error(code: &'static str, error: impl Display) -> OdeError {
    OdeError::new(code, error.to_string())
}

/// Unpacked package on disk.
#[derive(Debug, Clone)]
pub struct DirContainer {
    root: PathBuf,
}

impl DirContainer {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, OdeError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(OdeError::new(
                "PACKAGE_NOT_FOUND",
                format!("package does not exist: {}", root.display()),
            ));
        }
        if !root.is_dir() {
            return Err(OdeError::new(
                "PACKAGE_KIND_UNSUPPORTED",
                format!("package is not a directory: {}", root.display()),
            ));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `None` for paths that would escape the package root.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let inside = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        inside.then(|| self.root.join(relative))
    }
}

impl PackageContainer for DirContainer {
    fn has_file(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|full| full.is_file())
    }

    fn read_text(&self, path: &str) -> Result<String, OdeError> {
        let Some(full) = self.resolve(path) else {
            return Err(OdeError::new(
                "PACKAGE_NOT_FOUND",
                format!("File \"{}\" does not exist in package.", path),
            ));
        };
        let bytes = fs::read(&full).map_err(|error| match error.kind() {
            ErrorKind::NotFound => OdeError::new(
                "PACKAGE_NOT_FOUND",
                format!("File \"{}\" does not exist in package.", path),
            ),
            _ => map_error("PACKAGE_READ", error),
        })?;
        String::from_utf8(bytes).map_err(|error| {
            OdeError::new(
                "PACKAGE_READ",
                format!("File \"{}\" is not valid UTF-8: {}", path, error),
            )
        })
    }

    fn list_entries(&self) -> Vec<String> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            entries.push(relative.to_string_lossy().replace('\\', "/"));
        }
        entries.sort();
        entries
    }
}

/// Zipped package (`.zip` or `.elp`), fully loaded into memory on open.
#[derive(Debug, Clone)]
pub struct ZipContainer {
    files: MemoryContainer,
}

impl ZipContainer {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OdeError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => OdeError::new(
                "PACKAGE_NOT_FOUND",
                format!("package does not exist: {}", path.display()),
            ),
            _ => map_error("PACKAGE_READ", error),
        })?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, OdeError> {
        Self::from_reader(Cursor::new(bytes))
    }

    fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, OdeError> {
        let mut archive =
            ZipArchive::new(reader).map_err(|error| map_error("PACKAGE_ARCHIVE", error))?;
        let mut files = MemoryContainer::new();
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|error| map_error("PACKAGE_ARCHIVE", error))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().replace('\\', "/");
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .map_err(|error| map_error("PACKAGE_ARCHIVE", error))?;
            files.insert(name, contents);
        }
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl PackageContainer for ZipContainer {
    fn has_file(&self, path: &str) -> bool {
        self.files.has_file(path)
    }

    fn read_text(&self, path: &str) -> Result<String, OdeError> {
        self.files.read_text(path)
    }

    fn list_entries(&self) -> Vec<String> {
        self.files.list_entries()
    }
}

/// Picks the container kind from what `path` points at: a directory, or a
/// `.zip`/`.elp` archive.
pub fn open_container(path: impl AsRef<Path>) -> Result<Box<dyn PackageContainer>, OdeError> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(Box::new(DirContainer::open(path)?));
    }
    if !path.exists() {
        return Err(OdeError::new(
            "PACKAGE_NOT_FOUND",
            format!("package does not exist: {}", path.display()),
        ));
    }

    let is_archive = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            ARCHIVE_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        });
    if !is_archive {
        return Err(OdeError::new(
            "PACKAGE_KIND_UNSUPPORTED",
            format!(
                "package must be a directory or a .zip/.elp archive: {}",
                path.display()
            ),
        ));
    }
    Ok(Box::new(ZipContainer::open(path)?))
}
