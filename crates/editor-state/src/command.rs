/// A line number as the user sees it: 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineNumber(std::num::NonZeroUsize);

impl LineNumber {
    /// `None` for 0.
    #[must_use]
    pub fn new(number: usize) -> Option<Self> {
        std::num::NonZeroUsize::new(number).map(Self)
    }

    /// The line at 0-based `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(std::num::NonZeroUsize::MIN.saturating_add(index))
    }

    #[inline]
    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// The 0-based index the line store works with.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0.get() - 1
    }
}

impl std::fmt::Display for LineNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch to another file, creating it if needed. Clears the search.
    Open(std::path::PathBuf),
    /// Append a line. Surrounding whitespace is trimmed.
    Add(String),
    Edit { line: LineNumber, text: String },
    Delete { line: LineNumber },
    /// Search the displayed text. Surrounding whitespace is trimmed.
    Search(String),
    Next,
    Previous,
    /// Reload from disk, keeping the current search.
    Refresh,
}

/// What a successful command has to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Opened(String),
    LineAdded,
    LineEdited(LineNumber),
    LineDeleted(LineNumber),
    MatchesFound(usize),
    NoMatches,
    /// `index` is 0-based.
    MatchSelected { index: usize, total: usize },
    Refreshed,
}

impl Notice {
    /// Search results get a dialog; everything else goes to the status bar.
    #[must_use]
    pub fn is_popup(&self) -> bool {
        matches!(self, Notice::MatchesFound(_) | Notice::NoMatches)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Opened(name) => write!(f, "Opened: {name}"),
            Notice::LineAdded => write!(f, "Line added"),
            Notice::LineEdited(line) => write!(f, "Edited line {line}"),
            Notice::LineDeleted(line) => write!(f, "Deleted line {line}"),
            Notice::MatchesFound(count) => write!(f, "{count} matches found."),
            Notice::NoMatches => write!(f, "No matches found."),
            Notice::MatchSelected { index, total } => {
                write!(f, "Match {} of {total}", index + 1)
            }
            Notice::Refreshed => write!(f, "Refreshed from disk"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_number_conversions() {
        assert_eq!(LineNumber::new(0), None);

        let third = LineNumber::new(3).unwrap();
        assert_eq!(third.get(), 3);
        assert_eq!(third.index(), 2);
        assert_eq!(LineNumber::from_index(2), third);
        assert_eq!(third.to_string(), "3");
    }

    #[test]
    fn test_notice_text() {
        let line = LineNumber::new(7).unwrap();

        assert_eq!(Notice::Opened("a.txt".into()).to_string(), "Opened: a.txt");
        assert_eq!(Notice::LineAdded.to_string(), "Line added");
        assert_eq!(Notice::LineEdited(line).to_string(), "Edited line 7");
        assert_eq!(Notice::LineDeleted(line).to_string(), "Deleted line 7");
        assert_eq!(Notice::MatchesFound(4).to_string(), "4 matches found.");
        assert_eq!(Notice::NoMatches.to_string(), "No matches found.");
        assert_eq!(
            Notice::MatchSelected { index: 0, total: 2 }.to_string(),
            "Match 1 of 2"
        );
        assert_eq!(Notice::Refreshed.to_string(), "Refreshed from disk");
    }

    #[test]
    fn test_only_search_results_pop_up() {
        assert!(Notice::MatchesFound(1).is_popup());
        assert!(Notice::NoMatches.is_popup());
        assert!(!Notice::LineAdded.is_popup());
        assert!(!Notice::MatchSelected { index: 0, total: 1 }.is_popup());
    }
}
