use crate::editor::Editor;
use anyhow::Result;
use std::collections::HashSet;
use std::path::PathBuf;

/// Admits tag files whose directory is a string prefix of the current
/// buffer path. The test is textual: `/src/foo` also admits `/src/foobar/x`.
#[derive(Debug)]
pub struct TagScope {
    current: String,
    selected: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl TagScope {
    pub fn new(editor: &dyn Editor) -> Result<Self> {
        let current = editor.current_path()?.to_string_lossy().to_string();
        Ok(Self {
            current,
            selected: Vec::new(),
            seen: HashSet::new(),
        })
    }

    /// Resolve `reference` and return its absolute path when it is in scope,
    /// exists, and was not admitted before.
    pub fn admit(&mut self, editor: &dyn Editor, reference: &str) -> Result<Option<PathBuf>> {
        if reference.trim().is_empty() {
            return Ok(None);
        }
        let base = editor.parent_dir(reference)?;
        let path = editor.absolute(reference)?;
        if !self.current.starts_with(&*base.to_string_lossy()) {
            tracing::trace!("out of scope: {}", path.display());
            return Ok(None);
        }
        if !editor.exists(&path) || self.seen.contains(&path) {
            tracing::trace!("missing or duplicate: {}", path.display());
            return Ok(None);
        }
        self.seen.insert(path.clone());
        self.selected.push(path.clone());
        Ok(Some(path))
    }

    pub fn into_selected(self) -> Vec<PathBuf> {
        self.selected
    }
}

/// Every in-scope tag file the editor reports, without running searches.
pub fn select(editor: &dyn Editor) -> Result<Vec<PathBuf>> {
    let mut scope = TagScope::new(editor)?;
    for reference in editor.tag_files()? {
        scope.admit(editor, &reference)?;
    }
    Ok(scope.into_selected())
}
