use std::path::PathBuf;

use walkdir::WalkDir;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn fixtures_root() -> PathBuf {
    workspace_root().join("fixtures").join("packages")
}

pub fn fixture_dir(name: &str) -> PathBuf {
    fixtures_root().join(name)
}

/// Names of every fixture package directory, sorted.
pub fn fixture_names() -> Vec<String> {
    let mut names = WalkDir::new(fixtures_root())
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect::<Vec<_>>();
    names.sort();
    names
}
