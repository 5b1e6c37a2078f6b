/// Read-only view of a file's bytes at the moment it was opened.
///
/// Non-empty files are memory-mapped; empty files are never mapped since a
/// zero-length mapping is rejected on some platforms.
#[derive(Debug)]
pub struct FileSnapshot {
    _file: std::fs::File,
    mmap: Option<memmap2::Mmap>,
    path: std::path::PathBuf,
}

impl FileSnapshot {
    /// # Errors
    ///
    /// - `std::io::Error` if the file cannot be opened, inspected or mapped.
    pub fn open(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let file = std::fs::File::open(&path_buf)?;

        let mmap = if file.metadata()?.len() == 0 {
            None
        } else {
            // SAFETY:
            // - File is opened read-only
            // - We keep the file handle alive in struct
            // - Callers copy what they need out before the store rewrites the file
            Some(unsafe { memmap2::Mmap::map(&file)? })
        };

        Ok(Self {
            _file: file,
            mmap,
            path: path_buf,
        })
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// Iterates the snapshot's lines, terminators stripped.
    #[must_use]
    pub fn lines(&self) -> crate::lines::LineIter<'_> {
        crate::lines::LineIter::new(self.as_slice())
    }

    /// File length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, b"").unwrap();

        let snapshot = FileSnapshot::open(&path).unwrap();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.lines().count(), 0);
        assert_eq!(snapshot.path(), path.as_path());
    }

    #[test]
    fn test_snapshot_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"first\nsecond\n").unwrap();

        let snapshot = FileSnapshot::open(&path).unwrap();
        let lines: Vec<&[u8]> = snapshot.lines().collect();

        assert_eq!(snapshot.len(), 13);
        assert_eq!(lines, vec![&b"first"[..], &b"second"[..]]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSnapshot::open(dir.path().join("nope.txt")).unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
