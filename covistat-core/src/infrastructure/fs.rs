// covistat-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A fully-written temporary file waiting to be renamed onto its target.
///
/// Staging and persisting are split so a set of artifacts can be staged
/// first and only renamed once every member of the set has been written:
/// a failure during staging leaves all the targets untouched.
pub struct StagedWrite {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedWrite {
    /// Atomic rename onto the target path.
    pub fn persist(self) -> Result<(), InfrastructureError> {
        self.temp
            .persist(&self.target)
            .map_err(|e| InfrastructureError::Io(e.error))?;
        Ok(())
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

/// Write `content` into a temporary file sitting in the target's directory
/// (same filesystem, so the later rename is atomic).
pub fn stage<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<StagedWrite, InfrastructureError> {
    let target = path.as_ref().to_path_buf();
    let parent = target.parent().unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;
    temp.write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;

    Ok(StagedWrite { temp, target })
}

/// Write content to a single file atomically (stage + rename).
/// The target is either fully written or not written at all.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    stage(path, content)?.persist()
}

/// Persist a whole batch of staged files. Callers stage everything first,
/// then commit, which narrows the window for a partially-replaced set to
/// rename failures only.
pub fn commit_all(staged: Vec<StagedWrite>) -> Result<(), InfrastructureError> {
    for write in staged {
        write.persist()?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_file() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("test.txt");
        let content = "Hello, World!";

        atomic_write(&file_path, content)?;

        assert!(file_path.exists());
        let read_content = fs::read_to_string(file_path)?;
        assert_eq!(read_content, content);
        Ok(())
    }

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("test.txt");

        atomic_write(&file_path, "Initial")?;
        atomic_write(&file_path, "Updated")?;

        let read_content = fs::read_to_string(file_path)?;
        assert_eq!(read_content, "Updated");
        Ok(())
    }

    #[test]
    fn test_staged_files_invisible_until_commit() -> Result<()> {
        let dir = tempdir()?;
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");

        let staged = vec![stage(&a, "aa")?, stage(&b, "bb")?];
        assert!(!a.exists());
        assert!(!b.exists());

        commit_all(staged)?;
        assert_eq!(fs::read_to_string(&a)?, "aa");
        assert_eq!(fs::read_to_string(&b)?, "bb");
        Ok(())
    }

    #[test]
    fn test_dropped_stage_leaves_target_untouched() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("kept.txt");
        atomic_write(&file_path, "previous")?;

        let staged = stage(&file_path, "abandoned")?;
        drop(staged);

        assert_eq!(fs::read_to_string(&file_path)?, "previous");
        Ok(())
    }
}
