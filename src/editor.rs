//! Editor-side collaborators: tag-file enumeration, path resolution and the
//! error channel. `Workspace` is the standalone implementation used by the
//! CLI and the RPC server.

use crate::util;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

pub trait Editor {
    /// Raw tag-file references in editor order. May be relative.
    fn tag_files(&self) -> Result<Vec<String>>;

    /// Absolute path of the buffer being edited.
    fn current_path(&self) -> Result<PathBuf>;

    /// Absolute form of a reference.
    fn absolute(&self, reference: &str) -> Result<PathBuf>;

    /// Absolute directory containing a reference.
    fn parent_dir(&self, reference: &str) -> Result<PathBuf>;

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Report a message on the user-visible error channel.
    fn print_error(&self, message: &str, source: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
enum TagRefs {
    Explicit(Vec<String>),
    Option(String),
}

#[derive(Debug, Clone)]
pub struct Workspace {
    cwd: PathBuf,
    buffer: PathBuf,
    tags: TagRefs,
}

impl Workspace {
    /// Workspace whose tag files come from a vim-style `tags` option.
    pub fn new(cwd: impl Into<PathBuf>, buffer: impl Into<PathBuf>, tags_option: &str) -> Self {
        Self {
            cwd: cwd.into(),
            buffer: buffer.into(),
            tags: TagRefs::Option(tags_option.to_string()),
        }
    }

    /// Workspace with an explicit list of tag-file references.
    pub fn with_tag_files(
        cwd: impl Into<PathBuf>,
        buffer: impl Into<PathBuf>,
        tag_files: Vec<String>,
    ) -> Self {
        Self {
            cwd: cwd.into(),
            buffer: buffer.into(),
            tags: TagRefs::Explicit(tag_files),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            util::lexical_normalize(path)
        } else {
            util::lexical_normalize(&self.cwd.join(path))
        }
    }

    fn buffer_dir(&self) -> PathBuf {
        let current = self.resolve(&self.buffer);
        current
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(current)
    }

    fn expand_tags_option(&self, option: &str) -> Vec<String> {
        let mut files = Vec::new();
        for entry in option.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.split_once(';') {
                Some((name, stop)) => {
                    let stop = stop.trim();
                    let stop = (!stop.is_empty()).then(|| self.resolve(Path::new(stop)));
                    files.extend(self.search_upward(name, stop.as_deref()));
                }
                None => files.push(self.entry_path(entry)),
            }
        }
        files
    }

    fn entry_path(&self, entry: &str) -> String {
        match entry.strip_prefix("./") {
            Some(rest) => self.buffer_dir().join(rest).to_string_lossy().to_string(),
            None => entry.to_string(),
        }
    }

    /// Nearest-first search for `name` in the start directory and its ancestors.
    fn search_upward(&self, name: &str, stop: Option<&Path>) -> Vec<String> {
        let start = self.resolve(Path::new(&self.entry_path(name)));
        let Some(file_name) = start.file_name().map(|n| n.to_os_string()) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut dir = start.parent().map(Path::to_path_buf);
        while let Some(current) = dir {
            let candidate = current.join(&file_name);
            if candidate.is_file() {
                found.push(candidate.to_string_lossy().to_string());
            }
            if stop.is_some_and(|stop| stop == current.as_path()) {
                break;
            }
            dir = current.parent().map(Path::to_path_buf);
        }
        found
    }
}

impl Editor for Workspace {
    fn tag_files(&self) -> Result<Vec<String>> {
        Ok(match &self.tags {
            TagRefs::Explicit(files) => files.clone(),
            TagRefs::Option(option) => self.expand_tags_option(option),
        })
    }

    fn current_path(&self) -> Result<PathBuf> {
        if self.buffer.as_os_str().is_empty() {
            bail!("current buffer has no name");
        }
        Ok(self.resolve(&self.buffer))
    }

    fn absolute(&self, reference: &str) -> Result<PathBuf> {
        if reference.is_empty() {
            bail!("empty path reference");
        }
        Ok(self.resolve(Path::new(reference)))
    }

    fn parent_dir(&self, reference: &str) -> Result<PathBuf> {
        let path = self.absolute(reference)?;
        Ok(path.parent().map(Path::to_path_buf).unwrap_or(path))
    }

    fn print_error(&self, message: &str, source: &str) -> Result<()> {
        tracing::error!("[{source}] {message}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_resolves_against_cwd() {
        let ws = Workspace::with_tag_files("/work/proj", "src/lib.rs", Vec::new());
        assert_eq!(
            ws.absolute("../other/tags").unwrap(),
            PathBuf::from("/work/other/tags")
        );
        assert_eq!(
            ws.parent_dir("./sub/tags").unwrap(),
            PathBuf::from("/work/proj/sub")
        );
        assert_eq!(
            ws.current_path().unwrap(),
            PathBuf::from("/work/proj/src/lib.rs")
        );
    }

    #[test]
    fn empty_buffer_is_an_error() {
        let ws = Workspace::with_tag_files("/work", "", Vec::new());
        assert!(ws.current_path().is_err());
        assert!(ws.absolute("").is_err());
    }

    #[test]
    fn tags_option_plain_entries() {
        let ws = Workspace::new("/work/proj", "src/lib.rs", "./tags, TAGS ,,");
        assert_eq!(
            ws.tag_files().unwrap(),
            vec!["/work/proj/src/tags".to_string(), "TAGS".to_string()]
        );
    }

    #[test]
    fn tags_option_upward_search() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("tags"), "").unwrap();
        std::fs::write(nested.join("tags"), "").unwrap();

        let buffer = nested.join("main.rs");
        let stop = format!("./tags;{}", root.display());
        let ws = Workspace::new(root, &buffer, &stop);
        assert_eq!(
            ws.tag_files().unwrap(),
            vec![
                nested.join("tags").to_string_lossy().to_string(),
                root.join("tags").to_string_lossy().to_string(),
            ]
        );

        let stop_early = format!("./tags;{}", root.join("a").display());
        let ws = Workspace::new(root, &buffer, &stop_early);
        assert_eq!(
            ws.tag_files().unwrap(),
            vec![nested.join("tags").to_string_lossy().to_string()]
        );
    }
}
