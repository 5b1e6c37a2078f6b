use std::io::Write;

use crate::errors::{LineStoreError, LineStoreResult};

/// A text file treated as an ordered sequence of lines.
///
/// - Reads always go to disk; there is no cached copy between calls.
/// - Mutations read the whole file, edit the line vector, then rewrite the
///   whole file through a temporary sibling that is atomically renamed over
///   the target.
/// - The file is assumed to have a single writer: this process.
#[derive(Debug, Clone)]
pub struct LineStore {
    path: std::path::PathBuf,
}

impl LineStore {
    /// Creates a store for `path`, creating the file (and any missing parent
    /// directories) empty if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directories cannot be created.
    pub fn new(path: impl AsRef<std::path::Path>) -> LineStoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let store = Self { path };

        store.logged("create", ensure_exists(&store.path))?;

        Ok(store)
    }

    /// Points the store at another file, applying the same existence guarantee
    /// as [`LineStore::new`]. On failure the store keeps its previous path.
    ///
    /// # Errors
    ///
    /// Returns an error if the new file cannot be created.
    pub fn set_path(&mut self, path: impl AsRef<std::path::Path>) -> LineStoreResult<()> {
        let path = path.as_ref().to_path_buf();

        if let Err(err) = ensure_exists(&path) {
            log::error!("create failed for {}: {err}", path.display());
            return Err(err);
        }

        log::debug!("line store now backed by {}", path.display());
        self.path = path;

        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Reads every line of the file, terminators stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn read_all(&self) -> LineStoreResult<Vec<String>> {
        self.logged("read", self.read_lines())
    }

    /// The file's lines joined by `'\n'`, with nothing after the last one.
    ///
    /// # Errors
    ///
    /// Same as [`LineStore::read_all`].
    pub fn read_as_text(&self) -> LineStoreResult<String> {
        Ok(self.read_all()?.join("\n"))
    }

    /// A single line by 0-based index, or `None` past the end.
    ///
    /// # Errors
    ///
    /// Same as [`LineStore::read_all`].
    pub fn line(&self, index: usize) -> LineStoreResult<Option<String>> {
        Ok(self.read_all()?.into_iter().nth(index))
    }

    /// Number of lines currently on disk. Re-reads the file on every call.
    ///
    /// # Errors
    ///
    /// Same as [`LineStore::read_all`].
    pub fn count(&self) -> LineStoreResult<usize> {
        Ok(self.read_all()?.len())
    }

    /// Appends `text` as a new last line.
    ///
    /// If the file does not currently end with a terminator one is written
    /// first, so the line count always grows by exactly one.
    ///
    /// # Errors
    ///
    /// - [`LineStoreError::EmbeddedLineBreak`] if `text` contains `\n` or `\r`.
    /// - I/O errors from opening or writing the file.
    pub fn append(&self, text: &str) -> LineStoreResult<()> {
        self.logged("append", self.append_line(text))
    }

    /// Replaces the line at the 0-based `index` and rewrites the file.
    ///
    /// # Errors
    ///
    /// - [`LineStoreError::IndexOutOfBounds`] if `index >= count()`; the file is
    ///   left unchanged.
    /// - [`LineStoreError::EmbeddedLineBreak`] if `text` contains `\n` or `\r`.
    /// - I/O errors from reading or rewriting the file.
    pub fn replace(&self, index: usize, text: &str) -> LineStoreResult<()> {
        self.logged("replace", self.replace_line(index, text))
    }

    /// Removes the line at the 0-based `index`, shifting later lines up, and
    /// rewrites the file. Returns the removed line.
    ///
    /// # Errors
    ///
    /// - [`LineStoreError::IndexOutOfBounds`] if `index >= count()`; the file is
    ///   left unchanged.
    /// - I/O errors from reading or rewriting the file.
    pub fn delete(&self, index: usize) -> LineStoreResult<String> {
        self.logged("delete", self.delete_line(index))
    }

    /// Rewrites the entire file so that it holds exactly `lines`, each followed
    /// by [`crate::lines::LINE_TERMINATOR`].
    ///
    /// # Errors
    ///
    /// - [`LineStoreError::EmbeddedLineBreak`] if any element contains a line
    ///   break; nothing is written in that case.
    /// - I/O errors from the temporary file, the sync, or the final rename.
    pub fn write_all<S: AsRef<str>>(&self, lines: &[S]) -> LineStoreResult<()> {
        self.logged("rewrite", self.write_lines(lines))
    }
}

impl LineStore {
    fn read_lines(&self) -> LineStoreResult<Vec<String>> {
        let snapshot = crate::mmap::FileSnapshot::open(&self.path)?;

        snapshot
            .lines()
            .map(|line| {
                std::str::from_utf8(line)
                    .map(str::to_owned)
                    .map_err(LineStoreError::from)
            })
            .collect()
    }

    fn append_line(&self, text: &str) -> LineStoreResult<()> {
        if crate::lines::contains_line_break(text) {
            return Err(LineStoreError::EmbeddedLineBreak);
        }

        // The file may have been removed since the store was created.
        ensure_exists(&self.path)?;

        let needs_terminator = {
            let snapshot = crate::mmap::FileSnapshot::open(&self.path)?;
            !crate::lines::ends_with_terminator(snapshot.as_slice()) && !snapshot.is_empty()
        };

        let mut record = String::with_capacity(text.len() + 2 * crate::lines::LINE_TERMINATOR.len());
        if needs_terminator {
            record.push_str(crate::lines::LINE_TERMINATOR);
        }
        record.push_str(text);
        record.push_str(crate::lines::LINE_TERMINATOR);

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        file.write_all(record.as_bytes())?;
        file.sync_all()?;

        log::debug!("appended 1 line to {}", self.path.display());

        Ok(())
    }

    fn replace_line(&self, index: usize, text: &str) -> LineStoreResult<()> {
        if crate::lines::contains_line_break(text) {
            return Err(LineStoreError::EmbeddedLineBreak);
        }

        let mut lines = self.read_lines()?;
        let len = lines.len();
        let slot = lines
            .get_mut(index)
            .ok_or(LineStoreError::IndexOutOfBounds { index, len })?;

        text.clone_into(slot);

        self.write_lines(&lines)
    }

    fn delete_line(&self, index: usize) -> LineStoreResult<String> {
        let mut lines = self.read_lines()?;
        let len = lines.len();

        if index >= len {
            return Err(LineStoreError::IndexOutOfBounds { index, len });
        }

        let removed = lines.remove(index);
        self.write_lines(&lines)?;

        Ok(removed)
    }

    fn write_lines<S: AsRef<str>>(&self, lines: &[S]) -> LineStoreResult<()> {
        if lines
            .iter()
            .any(|line| crate::lines::contains_line_break(line.as_ref()))
        {
            return Err(LineStoreError::EmbeddedLineBreak);
        }

        // The temp file must live in the target's directory so the final
        // rename stays on one file system.
        let parent_dir = parent_of(&self.path);
        let mut temp_file = tempfile::Builder::new()
            .prefix(".linepad_tmp_")
            .tempfile_in(parent_dir)?;

        {
            let mut writer = std::io::BufWriter::new(temp_file.as_file_mut());
            for line in lines {
                writer.write_all(line.as_ref().as_bytes())?;
                writer.write_all(crate::lines::LINE_TERMINATOR.as_bytes())?;
            }
            writer.flush()?;
        }

        temp_file.as_file().sync_all()?;

        if let Ok(metadata) = std::fs::metadata(&self.path) {
            std::fs::set_permissions(temp_file.path(), metadata.permissions())?;
        }

        temp_file.persist(&self.path).map_err(|e| e.error)?;

        log::debug!(
            "rewrote {} with {} lines",
            self.path.display(),
            lines.len()
        );

        Ok(())
    }

    /// Logs failures at the file-system boundary before handing them back.
    fn logged<T>(&self, operation: &str, result: LineStoreResult<T>) -> LineStoreResult<T> {
        if let Err(err) = &result {
            if err.is_io() {
                log::error!("{operation} failed for {}: {err}", self.path.display());
            } else {
                log::warn!("{operation} rejected for {}: {err}", self.path.display());
            }
        }

        result
    }
}

fn parent_of(path: &std::path::Path) -> &std::path::Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => std::path::Path::new("."),
    }
}

fn ensure_exists(path: &std::path::Path) -> LineStoreResult<()> {
    if path.exists() {
        return Ok(());
    }

    std::fs::create_dir_all(parent_of(path))?;
    std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;

    log::info!("created empty file {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, LineStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LineStore::new(dir.path().join("data.txt")).unwrap();
        (dir, store)
    }

    fn setup_with(lines: &[&str]) -> (tempfile::TempDir, LineStore) {
        let (dir, store) = setup();
        store.write_all(lines).unwrap();
        (dir, store)
    }

    #[test]
    fn test_new_creates_missing_file_and_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("notes.txt");

        let store = LineStore::new(&path).unwrap();

        assert!(path.is_file(), "File should have been created");
        assert_eq!(store.path(), path.as_path());
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.read_as_text().unwrap(), "");
    }

    #[test]
    fn test_new_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("existing.txt");
        std::fs::write(&path, "kept\n").unwrap();

        let store = LineStore::new(&path).unwrap();

        assert_eq!(store.read_all().unwrap(), vec!["kept"]);
    }

    #[test]
    fn test_set_path_repoints_and_creates() {
        let (dir, mut store) = setup_with(&["old"]);
        let other = dir.path().join("sub").join("other.txt");

        store.set_path(&other).unwrap();

        assert_eq!(store.path(), other.as_path());
        assert!(other.is_file());
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_set_path_failure_keeps_old_path() {
        let (dir, mut store) = setup_with(&["old"]);
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();
        let old_path = store.path().to_path_buf();

        let result = store.set_path(blocker.join("child.txt"));

        assert!(matches!(result, Err(LineStoreError::IoError(_))));
        assert_eq!(store.path(), old_path.as_path());
    }

    #[test]
    fn test_write_all_round_trip() {
        let (_dir, store) = setup();
        let lines = ["first", "", "  indented", "ünïcödé ✓", "last"];

        store.write_all(&lines).unwrap();

        assert_eq!(store.read_all().unwrap(), lines);
        assert_eq!(
            store.read_as_text().unwrap(),
            "first\n\n  indented\nünïcödé ✓\nlast"
        );
    }

    #[test]
    fn test_write_all_empty_truncates() {
        let (_dir, store) = setup_with(&["a", "b"]);

        store.write_all::<&str>(&[]).unwrap();

        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(std::fs::read(store.path()).unwrap(), b"");
    }

    #[test]
    fn test_write_all_rejects_embedded_break_without_touching_file() {
        let (_dir, store) = setup_with(&["safe"]);

        let result = store.write_all(&["ok", "two\nlines"]);

        assert!(matches!(result, Err(LineStoreError::EmbeddedLineBreak)));
        assert_eq!(store.read_all().unwrap(), vec!["safe"]);
    }

    #[test]
    fn test_write_all_leaves_no_temp_files() {
        let (dir, store) = setup_with(&["a"]);
        store.replace(0, "b").unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();

        assert_eq!(entries, vec![std::ffi::OsString::from("data.txt")]);
    }

    #[test]
    fn test_append_adds_exactly_one_line() {
        let (_dir, store) = setup_with(&["one"]);
        let before = store.count().unwrap();

        store.append("two").unwrap();

        assert_eq!(store.count().unwrap(), before + 1);
        assert_eq!(store.read_all().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_append_to_empty_file() {
        let (_dir, store) = setup();

        store.append("only").unwrap();

        assert_eq!(store.read_all().unwrap(), vec!["only"]);
    }

    #[test]
    fn test_append_after_missing_final_terminator() {
        let (_dir, store) = setup();
        std::fs::write(store.path(), "no newline at end").unwrap();

        store.append("next").unwrap();

        assert_eq!(
            store.read_all().unwrap(),
            vec!["no newline at end", "next"],
            "Append must not glue onto an unterminated last line"
        );
    }

    #[test]
    fn test_append_recreates_deleted_file() {
        let (_dir, store) = setup_with(&["old"]);
        std::fs::remove_file(store.path()).unwrap();

        store.append("hello").unwrap();

        assert!(store.path().is_file());
        assert_eq!(store.read_all().unwrap(), vec!["hello"]);
    }

    #[test]
    fn test_append_rejects_embedded_break() {
        let (_dir, store) = setup_with(&["one"]);

        assert!(matches!(
            store.append("two\nthree"),
            Err(LineStoreError::EmbeddedLineBreak)
        ));
        assert!(matches!(
            store.append("cr\rhere"),
            Err(LineStoreError::EmbeddedLineBreak)
        ));
        assert_eq!(store.read_all().unwrap(), vec!["one"]);
    }

    #[test]
    fn test_replace_changes_only_target() {
        let (_dir, store) = setup_with(&["a", "b", "c"]);

        store.replace(2, "C").unwrap();

        assert_eq!(store.read_all().unwrap(), vec!["a", "b", "C"]);
    }

    #[test]
    fn test_replace_out_of_range_leaves_file_unchanged() {
        let (_dir, store) = setup_with(&["a", "b"]);
        let before = std::fs::read(store.path()).unwrap();

        let err = store.replace(2, "x").unwrap_err();

        assert!(matches!(
            err,
            LineStoreError::IndexOutOfBounds { index: 2, len: 2 }
        ));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_replace_rejects_embedded_break() {
        let (_dir, store) = setup_with(&["a"]);

        assert!(matches!(
            store.replace(0, "x\ny"),
            Err(LineStoreError::EmbeddedLineBreak)
        ));
        assert_eq!(store.read_all().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_delete_shifts_later_lines() {
        let (_dir, store) = setup_with(&["a", "b", "c", "d"]);

        let removed = store.delete(1).unwrap();

        assert_eq!(removed, "b");
        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.read_all().unwrap(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_delete_out_of_range_is_an_error() {
        let (_dir, store) = setup_with(&["a"]);

        assert!(matches!(
            store.delete(5),
            Err(LineStoreError::IndexOutOfBounds { index: 5, len: 1 })
        ));
        assert_eq!(store.read_all().unwrap(), vec!["a"]);

        let (_dir, empty) = setup();
        assert!(matches!(
            empty.delete(0),
            Err(LineStoreError::IndexOutOfBounds { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_line_lookup() {
        let (_dir, store) = setup_with(&["zero", "one"]);

        assert_eq!(store.line(1).unwrap().as_deref(), Some("one"));
        assert_eq!(store.line(2).unwrap(), None);
    }

    #[test]
    fn test_reads_foreign_line_endings() {
        let (_dir, store) = setup();
        std::fs::write(store.path(), "dos\r\nmac\runix\n").unwrap();

        assert_eq!(store.read_all().unwrap(), vec!["dos", "mac", "unix"]);

        store.replace(1, "classic").unwrap();

        assert_eq!(store.read_all().unwrap(), vec!["dos", "classic", "unix"]);
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let (_dir, store) = setup();
        std::fs::write(store.path(), b"ok\n\xff\xfe\n").unwrap();

        assert!(matches!(
            store.read_all(),
            Err(LineStoreError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_missing_file_read_is_io_error() {
        let (_dir, store) = setup();
        std::fs::remove_file(store.path()).unwrap();

        let err = store.read_all().unwrap_err();

        assert!(err.is_io());
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = setup_with(&["a"]);
        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o640)).unwrap();

        store.replace(0, "b").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_alpha_beta_gamma_scenario() {
        let (_dir, store) = setup_with(&["alpha", "beta", "gamma"]);

        store.replace(1, "BETA2").unwrap();
        assert_eq!(store.read_all().unwrap(), vec!["alpha", "BETA2", "gamma"]);

        store.delete(0).unwrap();
        assert_eq!(store.read_all().unwrap(), vec!["BETA2", "gamma"]);

        store.append("delta").unwrap();
        assert_eq!(store.read_all().unwrap(), vec!["BETA2", "gamma", "delta"]);
        assert_eq!(store.count().unwrap(), 3);
    }
}
