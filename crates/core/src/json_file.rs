//! Reading and writing the JSON files tooli keeps on disk.

use crate::{Error, Result, paths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;

/// Load and parse a JSON file.
///
/// Returns `None` if the file doesn't exist.
/// Returns an error if the file exists but cannot be read or parsed.
pub(crate) fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(e, path, "read")),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| Error::parse(e, path))
}

/// Serialize `value` as tab-indented JSON.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T, path: &Path) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::serialize(e, path))?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Write `value` to `path`, replacing any existing file.
///
/// The content goes to a temporary file next to `path` first and is then
/// renamed over it, so readers never observe a truncated file.
pub(crate) fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let bytes = to_pretty_json(value, path)?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    paths::ensure_dir(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| Error::io(e, parent, "create"))?;
    temp.write_all(&bytes)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| Error::io(e, temp.path(), "write"))?;
    temp.persist(path)
        .map_err(|e| Error::io(e.error, path, "replace"))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote JSON file");
    Ok(())
}
