use crate::document::model::LayeredDocument;
use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn load_document(path: impl AsRef<Path>) -> CoreResult<LayeredDocument> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let mut doc: LayeredDocument = serde_json::from_slice(&bytes)?;
    if doc.groups.is_empty() && doc.layers.is_empty() {
        return Err(CoreError::InvalidInput(format!(
            "{} holds no layers or groups",
            path.display()
        )));
    }
    if doc.name.is_empty() {
        doc.name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
    }
    Ok(doc)
}

/// Document exports to check for `path`: the file itself, or every `*.json`
/// under a directory, sorted by path.
pub fn discover_documents(path: impl AsRef<Path>) -> CoreResult<Vec<PathBuf>> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(CoreError::InvalidInput(format!(
            "document path does not exist: {}",
            path.display()
        )));
    }
    let mut out = Vec::new();
    for e in WalkDir::new(path) {
        let e =
            e.map_err(|err| CoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, err)))?;
        let p = e.path();
        if p.is_file() && p.extension().map(|x| x == "json").unwrap_or(false) {
            out.push(p.to_path_buf());
        }
    }
    out.sort();
    Ok(out)
}
