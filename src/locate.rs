//! Template discovery.
//!
//! Walks a project's template root and yields every file carrying the
//! template extension, however deeply nested. Directories are always
//! descended into; nothing is filtered by name, so a template in
//! `templates/newsletter/2024/march.mjml` is found just like
//! `templates/welcome.mjml`.
//!
//! Order is depth-first with directory entries in filesystem order. Callers
//! that need a stable order must sort the result themselves.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Template directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Template path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Cannot walk template directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One template source discovered under a template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Full path to the source file.
    pub path: PathBuf,
    /// Path relative to the template root, e.g. `transactional/welcome.mjml`.
    pub relative_path: PathBuf,
}

/// Lazy template enumeration over one template root.
///
/// Finite and single-use: iterating again requires a fresh call to
/// [`templates`], which re-reads the filesystem.
pub struct Templates {
    root: PathBuf,
    extension: String,
    inner: walkdir::IntoIter,
}

impl Iterator for Templates {
    type Item = Result<TemplateFile, LocatorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(LocatorError::Walk(e))),
            };

            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }
            if !has_extension(entry.path(), &self.extension) {
                continue;
            }

            let path = entry.into_path();
            let relative_path = match path.strip_prefix(&self.root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            return Some(Ok(TemplateFile {
                path,
                relative_path,
            }));
        }
    }
}

/// Start a lazy walk of `root` for files with `extension` (no leading dot).
pub fn templates(root: &Path, extension: &str) -> Result<Templates, LocatorError> {
    if !root.exists() {
        return Err(LocatorError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(LocatorError::NotADirectory(root.to_path_buf()));
    }

    Ok(Templates {
        root: root.to_path_buf(),
        extension: extension.to_string(),
        inner: WalkDir::new(root).follow_links(false).into_iter(),
    })
}

/// Collect every template under `root`.
///
/// The first error met while walking aborts the enumeration.
pub fn find_templates(root: &Path, extension: &str) -> Result<Vec<TemplateFile>, LocatorError> {
    templates(root, extension)?.collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|e| e == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<mjml></mjml>").unwrap();
    }

    fn relative_set(files: &[TemplateFile]) -> BTreeSet<PathBuf> {
        files.iter().map(|f| f.relative_path.clone()).collect()
    }

    #[test]
    fn finds_flat_templates() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "welcome.mjml");
        touch(tmp.path(), "goodbye.mjml");

        let files = find_templates(tmp.path(), "mjml").unwrap();
        assert_eq!(
            relative_set(&files),
            BTreeSet::from([PathBuf::from("goodbye.mjml"), PathBuf::from("welcome.mjml")])
        );
    }

    #[test]
    fn finds_deeply_nested_templates() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "transactional/welcome.mjml");
        touch(tmp.path(), "newsletter/2024/03/march.mjml");
        touch(tmp.path(), "a/b/c/d/e/f/deep.mjml");

        let files = find_templates(tmp.path(), "mjml").unwrap();
        assert_eq!(
            relative_set(&files),
            BTreeSet::from([
                PathBuf::from("a/b/c/d/e/f/deep.mjml"),
                PathBuf::from("newsletter/2024/03/march.mjml"),
                PathBuf::from("transactional/welcome.mjml"),
            ])
        );
    }

    #[test]
    fn excludes_other_extensions() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "welcome.mjml");
        touch(tmp.path(), "notes.md");
        touch(tmp.path(), "old/welcome.html");
        touch(tmp.path(), "welcome.mjml.bak");
        touch(tmp.path(), "mjml");

        let files = find_templates(tmp.path(), "mjml").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, PathBuf::from("welcome.mjml"));
    }

    #[test]
    fn excludes_directories_with_template_extension() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("archive.mjml")).unwrap();
        touch(tmp.path(), "archive.mjml/inner.mjml");

        let files = find_templates(tmp.path(), "mjml").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(
            files[0].relative_path,
            PathBuf::from("archive.mjml/inner.mjml")
        );
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "welcome.mjml");
        touch(tmp.path(), "LOUD.MJML");
        touch(tmp.path(), "Backup.Mjml");

        let files = find_templates(tmp.path(), "mjml").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, PathBuf::from("welcome.mjml"));
    }

    #[test]
    fn source_path_is_under_root() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "promo/sale.mjml");

        let files = find_templates(tmp.path(), "mjml").unwrap();
        assert_eq!(files[0].path, tmp.path().join("promo/sale.mjml"));
    }

    #[test]
    fn empty_root_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(find_templates(tmp.path(), "mjml").unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = find_templates(&tmp.path().join("templates"), "mjml");
        assert!(matches!(result, Err(LocatorError::RootNotFound(_))));
    }

    #[test]
    fn root_is_file_is_error() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "templates");
        let result = find_templates(&tmp.path().join("templates"), "mjml");
        assert!(matches!(result, Err(LocatorError::NotADirectory(_))));
    }

    #[test]
    fn fresh_walk_sees_new_files() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "one.mjml");
        let first: Vec<_> = templates(tmp.path(), "mjml").unwrap().collect();
        assert_eq!(first.len(), 1);

        touch(tmp.path(), "two.mjml");
        let second: Vec<_> = templates(tmp.path(), "mjml").unwrap().collect();
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn depth_first_keeps_subtrees_together() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a/one.mjml");
        touch(tmp.path(), "a/two.mjml");
        touch(tmp.path(), "b/three.mjml");
        touch(tmp.path(), "b/four.mjml");

        let files = find_templates(tmp.path(), "mjml").unwrap();
        let parents: Vec<PathBuf> = files
            .iter()
            .map(|f| f.relative_path.parent().unwrap().to_path_buf())
            .collect();
        // Whatever the order, each directory's files are contiguous.
        let mut seen = Vec::new();
        for p in parents {
            if seen.last() != Some(&p) {
                assert!(!seen.contains(&p), "subtree {p:?} visited twice");
                seen.push(p);
            }
        }
        assert_eq!(seen.len(), 2);
    }
}
