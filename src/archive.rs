//! Tar packaging for the pipeline's durable output
//!
//! The archive holds exactly one entry, stored under the source file's base
//! name so downstream consumers can rely on a stable entry name.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{LogshipError, LogshipResult};

/// Create a tar archive at `dest` containing `src` as its only entry
///
/// The entry is named by `src`'s base filename, not its full path. Missing
/// parent directories of `dest` are created; an existing archive is
/// overwritten.
pub fn create_archive(src: &Path, dest: &Path) -> LogshipResult<PathBuf> {
    let entry_name = src
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            LogshipError::PipelineError(format!(
                "Invalid archive source name: {}",
                src.display()
            ))
        })?
        .to_string();

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(dest)?;
    let mut builder = tar::Builder::new(file);
    builder.append_path_with_name(src, &entry_name)?;
    builder.finish()?;

    Ok(dest.to_path_buf())
}

/// Unpack `archive` into `dest_dir`, returning the paths of the entries written
pub fn extract_archive(archive: &Path, dest_dir: &Path) -> LogshipResult<Vec<PathBuf>> {
    fs::create_dir_all(dest_dir)?;

    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(file);

    let mut written = Vec::new();
    for entry in tar.entries()? {
        let mut entry = entry?;
        let rel_path = entry.path()?.into_owned();
        entry.unpack_in(dest_dir)?;
        written.push(dest_dir.join(rel_path));
    }

    Ok(written)
}
