//! Binary extraction from release assets.
//!
//! Supports gzip-compressed tarballs, zip archives and raw single-binary
//! assets. Only the declared binaries are written; everything else in an
//! archive is skipped.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tar::Archive;
use tooli_core::tools::{BinarySpec, Platform, is_plain_file_name};
use tracing::{debug, trace, warn};

use crate::{Error, Result};

/// How the installed binaries were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Extracted from a `.tar.gz` or `.zip` archive.
    Archive,
    /// The asset itself was the binary.
    RawBinary,
}

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Kind of asset processed.
    pub kind: ArchiveKind,
    /// Files written, in the order they were found.
    pub installed: Vec<PathBuf>,
    /// Declared binaries that the archive did not contain.
    pub missing: Vec<String>,
}

/// Writes the declared binaries of an asset into a directory.
pub trait Extract: Send + Sync {
    /// Extract `binaries` from `data` (named `asset_name`) into `dest`,
    /// following the executable naming rules of `platform`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is unreadable, a file cannot be
    /// written, or a raw asset is paired with other than one binary.
    fn extract(
        &self,
        data: &[u8],
        asset_name: &str,
        binaries: &[BinarySpec],
        platform: Platform,
        dest: &Path,
    ) -> Result<Extraction>;
}

/// Extractor for the asset formats found on GitHub releases.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl Extract for ArchiveExtractor {
    fn extract(
        &self,
        data: &[u8],
        asset_name: &str,
        binaries: &[BinarySpec],
        platform: Platform,
        dest: &Path,
    ) -> Result<Extraction> {
        let binaries: Vec<BinarySpec> = binaries.iter().map(|b| b.for_platform(platform)).collect();

        if asset_name.ends_with(".tar.gz") {
            debug!(%asset_name, "Extracting tar.gz archive");
            extract_tar_gz(data, &binaries, dest)
        } else if asset_name.ends_with(".zip") {
            debug!(%asset_name, "Extracting zip archive");
            extract_zip(data, &binaries, dest)
        } else {
            warn!(
                %asset_name,
                "The asset does not have a recognized file ending; installing it as a raw binary. \
                 Consider asking the tool author to publish archives with a file extension"
            );
            install_raw(data, &binaries, dest)
        }
    }
}

/// Tracks which declared binaries an archive walk has produced so far.
struct Wanted<'a> {
    binaries: &'a [BinarySpec],
    found: Vec<bool>,
    dest: &'a Path,
    installed: Vec<PathBuf>,
}

impl<'a> Wanted<'a> {
    fn new(binaries: &'a [BinarySpec], dest: &'a Path) -> Self {
        Self {
            binaries,
            found: vec![false; binaries.len()],
            dest,
            installed: Vec::new(),
        }
    }

    /// Output path for an archive entry, if it is a binary still wanted.
    ///
    /// Directory markers never match; only the entry's base name is compared.
    fn claim(&mut self, entry_name: &str) -> Result<Option<PathBuf>> {
        if entry_name.ends_with('/') {
            return Ok(None);
        }
        let base = entry_name.rsplit('/').next().unwrap_or(entry_name);
        let Some(index) = self
            .binaries
            .iter()
            .enumerate()
            .position(|(i, b)| !self.found[i] && b.source_name == base)
        else {
            return Ok(None);
        };

        self.found[index] = true;
        output_path(self.dest, &self.binaries[index]).map(Some)
    }

    fn record(&mut self, path: PathBuf) {
        self.installed.push(path);
    }

    fn complete(&self) -> bool {
        self.found.iter().all(|f| *f)
    }

    fn finish(self, kind: ArchiveKind) -> Extraction {
        let missing: Vec<String> = self
            .binaries
            .iter()
            .zip(&self.found)
            .filter(|(_, found)| !**found)
            .map(|(b, _)| b.source_name.clone())
            .collect();
        if !missing.is_empty() {
            warn!(?missing, "Declared binaries not found in archive");
        }
        Extraction {
            kind,
            installed: self.installed,
            missing,
        }
    }
}

fn extract_tar_gz(data: &[u8], binaries: &[BinarySpec], dest: &Path) -> Result<Extraction> {
    let decoder = GzDecoder::new(Cursor::new(data));
    let mut archive = Archive::new(decoder);
    let mut wanted = Wanted::new(binaries, dest);

    let entries = archive
        .entries()
        .map_err(|e| Error::extraction(format!("Failed to read tar: {e}")))?;

    for entry in entries {
        let mut entry = entry
            .map_err(|e| Error::extraction(format!("Bad tar entry: {e}")))?;
        if entry.header().entry_type().is_dir() {
            continue;
        }

        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        trace!(%name, "Checking tar entry");
        let Some(out) = wanted.claim(&name)? else {
            continue;
        };

        write_executable(&mut entry, &out)?;
        debug!(entry = %name, dest = %out.display(), "Extracted binary");
        wanted.record(out);

        if wanted.complete() {
            break;
        }
    }

    Ok(wanted.finish(ArchiveKind::Archive))
}

fn extract_zip(data: &[u8], binaries: &[BinarySpec], dest: &Path) -> Result<Extraction> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| Error::extraction(format!("Failed to open zip: {e}")))?;
    let mut wanted = Wanted::new(binaries, dest);

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| Error::extraction(format!("Bad zip entry: {e}")))?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        trace!(%name, "Checking zip entry");
        let Some(out) = wanted.claim(&name)? else {
            continue;
        };

        write_executable(&mut file, &out)?;
        debug!(entry = %name, dest = %out.display(), "Extracted binary");
        wanted.record(out);

        if wanted.complete() {
            break;
        }
    }

    Ok(wanted.finish(ArchiveKind::Archive))
}

fn install_raw(data: &[u8], binaries: &[BinarySpec], dest: &Path) -> Result<Extraction> {
    let [binary] = binaries else {
        return Err(Error::InvalidBinaryCount {
            count: binaries.len(),
        });
    };

    let out = output_path(dest, binary)?;
    write_executable(&mut Cursor::new(data), &out)?;
    debug!(dest = %out.display(), size = data.len(), "Installed raw binary");

    Ok(Extraction {
        kind: ArchiveKind::RawBinary,
        installed: vec![out],
        missing: Vec::new(),
    })
}

/// Where `binary` is written below `dest`.
///
/// # Errors
///
/// Returns `Extraction` when the installed name is not a plain file name.
fn output_path(dest: &Path, binary: &BinarySpec) -> Result<PathBuf> {
    let name = binary.effective_name();
    if !is_plain_file_name(name) {
        return Err(Error::extraction(format!(
            "Refusing to write '{name}': binary names must be plain file names"
        )));
    }
    Ok(dest.join(name))
}

/// Stream `content` into `path`, replacing any existing file, and mark it
/// executable for its owner.
fn write_executable(content: &mut impl Read, path: &Path) -> Result<()> {
    let write_err = |e: std::io::Error| Error::extraction_at(e.to_string(), path);

    let mut file = File::create(path).map_err(write_err)?;
    std::io::copy(content, &mut file).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata().map_err(write_err)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).map_err(write_err)?;
    }

    Ok(())
}
