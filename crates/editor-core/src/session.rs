use crate::search::MatchSpan;

/// Observable phase of a [`SearchSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// No keyword has been searched since the text was last replaced.
    Idle,
    /// A keyword is set but the current text has no occurrence of it.
    Empty,
    /// `index` is the current match out of `total`.
    Active { index: usize, total: usize },
}

/// The last keyword searched, every span it matched in the current text, and a
/// cursor over those spans.
///
/// The session does not own the text. Whoever owns the text calls
/// [`SearchSession::rerun`] after reloading it and [`SearchSession::clear`]
/// when the text comes from a new source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSession {
    keyword: Option<String>,
    matches: Vec<MatchSpan>,
    current: Option<usize>,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches `text` for `keyword`, replacing any previous results.
    /// On success the cursor sits on the first match, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::SearchError::EmptyQuery`] for an empty keyword;
    /// the session is cleared back to [`SearchState::Idle`].
    pub fn search(&mut self, text: &str, keyword: &str) -> crate::errors::SearchResult<usize> {
        match crate::search::find_matches(text, keyword) {
            Ok(matches) => {
                self.keyword = Some(keyword.to_owned());
                self.current = (!matches.is_empty()).then_some(0);
                self.matches = matches;
                Ok(self.matches.len())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    /// Repeats the last search against freshly loaded `text`. Returns the new
    /// match count, or `None` if no keyword is set.
    pub fn rerun(&mut self, text: &str) -> Option<usize> {
        let keyword = self.keyword.take()?;

        self.search(text, &keyword).ok()
    }

    /// Forgets the keyword and its matches.
    pub fn clear(&mut self) {
        self.keyword = None;
        self.matches.clear();
        self.current = None;
    }

    /// Moves to the following match, wrapping to the first.
    pub fn next(&mut self) -> Option<MatchSpan> {
        let index = self.current?;
        self.current = Some((index + 1) % self.matches.len());
        self.current_span()
    }

    /// Moves to the preceding match, wrapping to the last.
    pub fn previous(&mut self) -> Option<MatchSpan> {
        let index = self.current?;
        let total = self.matches.len();
        self.current = Some((index + total - 1) % total);
        self.current_span()
    }

    #[must_use]
    pub fn current_span(&self) -> Option<MatchSpan> {
        self.matches.get(self.current?).copied()
    }

    #[inline]
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    #[inline]
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        match (&self.keyword, self.current) {
            (None, _) => SearchState::Idle,
            (Some(_), None) => SearchState::Empty,
            (Some(_), Some(index)) => SearchState::Active {
                index,
                total: self.matches.len(),
            },
        }
    }
}
