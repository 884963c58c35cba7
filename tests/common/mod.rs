//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Create `files` (relative path, content) under `root`, making parents as needed.
pub fn build_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let p = root.join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(p, content).unwrap();
    }
}

/// Number of entries below `root` (files and directories, root excluded).
pub fn count_entries(root: &Path) -> usize {
    WalkDir::new(root).min_depth(1).into_iter().count()
}

/// Regular files below `root` as sorted relative paths with `/` separators.
pub fn files_under(root: &Path) -> Vec<String> {
    let mut out: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    out.sort();
    out
}

/// Config XML with one DEFAULT section.
pub fn write_config(path: &Path, source: &Path, target: &Path, extra: &str) {
    let xml = format!(
        r#"<config>
  <log_level>quiet</log_level>
  <log_file>{}</log_file>
  <section name="DEFAULT">
    <source_path>{}</source_path>
    <target_path>{}</target_path>
    {}
  </section>
</config>"#,
        path.with_extension("log").display(),
        source.display(),
        target.display(),
        extra
    );
    fs::write(path, xml).unwrap();
}
