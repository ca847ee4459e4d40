use std::path::{Path, PathBuf};

use ov_api::{open_container, DirContainer};
use ov_core::{OdeError, PackageContainer};

use crate::map_package_path;

pub(crate) struct LoadedPackage {
    pub(crate) container: Box<dyn PackageContainer>,
    /// Set when the manifest location is known up front.
    pub(crate) manifest: Option<String>,
}

/// Opens `package` as a container. A path to a `.xml` file opens its parent
/// directory and pins that file as the manifest; an explicit `manifest`
/// always wins.
pub(crate) fn load_package(
    package: &str,
    manifest: Option<&str>,
) -> Result<LoadedPackage, OdeError> {
    let path = resolve_package_path(package)?;

    if is_manifest_file(&path) {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        return Ok(LoadedPackage {
            container: Box::new(DirContainer::open(parent)?),
            manifest: Some(manifest.map(str::to_string).unwrap_or(file_name)),
        });
    }

    Ok(LoadedPackage {
        container: open_container(&path)?,
        manifest: manifest.map(str::to_string),
    })
}

pub(crate) fn resolve_package_path(package: &str) -> Result<PathBuf, OdeError> {
    let path = PathBuf::from(package);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir().map_err(map_package_path)?.join(path)
    };

    if !absolute.exists() {
        return Err(OdeError::new(
            "PACKAGE_NOT_FOUND",
            format!("package does not exist: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

fn is_manifest_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("xml"))
}
