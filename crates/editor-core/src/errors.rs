pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The keyword was empty. Distinct from a search that found nothing.
    EmptyQuery,
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::EmptyQuery => write!(f, "empty search query"),
        }
    }
}

impl std::error::Error for SearchError {}
