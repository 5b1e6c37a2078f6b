use crate::command::{Command, LineNumber, Notice};
use crate::errors::{DocumentError, DocumentResult};

/// The file being viewed, the text on display, and the search over that text.
///
/// The display text is re-read from disk after every mutation, so it never
/// drifts from the file. Reloads triggered by this document's own commands
/// keep the search running; opening another file resets it.
#[derive(Debug)]
pub struct Document {
    store: io::line_store::LineStore,
    search: editor_core::session::SearchSession,
    text: String,
}

impl Document {
    /// Opens (creating if needed) `path` and loads it for display.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or read.
    pub fn open(path: impl AsRef<std::path::Path>) -> DocumentResult<Self> {
        let store = io::line_store::LineStore::new(path)?;
        let text = store.read_as_text()?;

        log::info!("opened {}", store.path().display());

        Ok(Self {
            store,
            search: editor_core::session::SearchSession::new(),
            text,
        })
    }

    /// Runs one user action against the file and the search session.
    ///
    /// Returns the notice to show the user, or `None` when the command had
    /// nothing to do (stepping through an empty match list).
    ///
    /// # Errors
    ///
    /// - [`DocumentError::EmptyText`] for `Add` with blank text.
    /// - [`DocumentError::InvalidLineNumber`] for `Edit`/`Delete` past the end.
    /// - [`DocumentError::Search`] for `Search` with a blank keyword.
    /// - [`DocumentError::Store`] for any failure of the backing file.
    pub fn execute(&mut self, command: Command) -> DocumentResult<Option<Notice>> {
        log::debug!("execute {command:?}");

        let notice = match command {
            Command::Open(path) => Some(self.open_file(&path)?),
            Command::Add(text) => Some(self.add_line(&text)?),
            Command::Edit { line, text } => {
                self.check_line(line)?;
                self.store.replace(line.index(), &text)?;
                self.reload()?;
                Some(Notice::LineEdited(line))
            }
            Command::Delete { line } => {
                self.check_line(line)?;
                self.store.delete(line.index())?;
                self.reload()?;
                Some(Notice::LineDeleted(line))
            }
            Command::Search(keyword) => Some(self.run_search(&keyword)?),
            Command::Next => self.search.next().map(|_| self.selected_notice()),
            Command::Previous => self.search.previous().map(|_| self.selected_notice()),
            Command::Refresh => {
                self.reload()?;
                Some(Notice::Refreshed)
            }
        };

        if let Some(notice) = &notice {
            log::info!("{notice}");
        }

        Ok(notice)
    }

    /// Parses a 1-based line number typed by the user and checks that it names
    /// a line of the file.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::NotANumber`] if `input` is not an integer.
    /// - [`DocumentError::InvalidLineNumber`] if it is below 1 or past the end.
    /// - [`DocumentError::Store`] if the file cannot be read.
    pub fn parse_line_number(&self, input: &str) -> DocumentResult<LineNumber> {
        let trimmed = input.trim();
        let number: i64 = trimmed
            .parse()
            .map_err(|_| DocumentError::NotANumber(trimmed.to_owned()))?;
        let count = self.store.count()?;

        usize::try_from(number)
            .ok()
            .and_then(LineNumber::new)
            .filter(|line| line.get() <= count)
            .ok_or(DocumentError::InvalidLineNumber(number))
    }

    /// [`Document::parse_line_number`] plus the line's current text, for
    /// pre-filling the edit dialog or confirming a delete.
    ///
    /// # Errors
    ///
    /// Same as [`Document::parse_line_number`].
    pub fn resolve_line(&self, input: &str) -> DocumentResult<(LineNumber, String)> {
        let line = self.parse_line_number(input)?;
        let text = self
            .store
            .line(line.index())?
            .ok_or(DocumentError::InvalidLineNumber(line.get() as i64))?;

        Ok((line, text))
    }

    /// The line of the display text containing `byte_offset`, e.g. the caret.
    /// Offsets past the end land on the last line; `None` if there is no text.
    #[must_use]
    pub fn line_number_at(&self, byte_offset: usize) -> Option<LineNumber> {
        if self.text.is_empty() {
            return None;
        }

        let end = byte_offset.min(self.text.len());
        let row = count_newlines(&self.text.as_bytes()[..end]);

        Some(LineNumber::from_index(row))
    }

    /// The line at `line` in the display text.
    #[must_use]
    pub fn display_line(&self, line: LineNumber) -> Option<&str> {
        self.text.split('\n').nth(line.index())
    }

    /// The status bar text, optionally led by a transient `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read to count its lines.
    pub fn status_line(&self, message: Option<&str>) -> DocumentResult<crate::status::StatusLine> {
        Ok(crate::status::StatusLine {
            message: message.map(str::to_owned),
            line_count: self.store.count()?,
            path: self.store.path().to_path_buf(),
        })
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn search_session(&self) -> &editor_core::session::SearchSession {
        &self.search
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }

    /// Lines currently in the file, read fresh from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn line_count(&self) -> DocumentResult<usize> {
        Ok(self.store.count()?)
    }
}

impl Document {
    fn open_file(&mut self, path: &std::path::Path) -> DocumentResult<Notice> {
        self.store.set_path(path)?;

        // The old text and search belong to the previous file regardless of
        // whether the new one can be read.
        self.search.clear();
        self.text.clear();
        self.text = self.store.read_as_text()?;

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Notice::Opened(name))
    }

    fn add_line(&mut self, text: &str) -> DocumentResult<Notice> {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(DocumentError::EmptyText);
        }

        self.store.append(trimmed)?;
        self.reload()?;

        Ok(Notice::LineAdded)
    }

    fn run_search(&mut self, keyword: &str) -> DocumentResult<Notice> {
        match self.search.search(&self.text, keyword.trim())? {
            0 => Ok(Notice::NoMatches),
            count => Ok(Notice::MatchesFound(count)),
        }
    }

    /// Re-reads the display text and repeats the active search, if any.
    fn reload(&mut self) -> DocumentResult<()> {
        self.text = self.store.read_as_text()?;

        if let Some(count) = self.search.rerun(&self.text) {
            log::debug!("search refreshed: {count} matches");
        }

        Ok(())
    }

    fn check_line(&self, line: LineNumber) -> DocumentResult<()> {
        if line.get() <= self.store.count()? {
            Ok(())
        } else {
            Err(DocumentError::InvalidLineNumber(line.get() as i64))
        }
    }

    fn selected_notice(&self) -> Notice {
        Notice::MatchSelected {
            index: self.search.current_index().unwrap_or(0),
            total: self.search.matches().len(),
        }
    }
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}
