// @file file.rs
// @brief output files, written through a temporary next to the destination

use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `contents` to `path` so that readers see either the old file or the complete
/// new one. With `create_missing_dir`, missing parent directories are created first.
pub fn write_atomic(path: &Path, contents: &str, create_missing_dir: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    if !dir.exists() {
        if !create_missing_dir {
            return Err(anyhow!("directory {} does not exist", dir.display()));
        }
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let mut tmp = NamedTempFile::new_in(dir).with_context(|| format!("failed to create a temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        write_atomic(&path, "<svg/>", false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg/>");
        write_atomic(&path, "<svg></svg>", false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg></svg>");
    }

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps/2015/labour.svg");
        assert!(write_atomic(&path, "<svg/>", false).is_err());
        write_atomic(&path, "<svg/>", true).unwrap();
        assert!(path.exists());
    }
}
