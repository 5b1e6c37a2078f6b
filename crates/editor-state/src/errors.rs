pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Debug)]
pub enum DocumentError {
    Store(io::errors::LineStoreError),
    Search(editor_core::errors::SearchError),
    /// The user typed something that is not an integer.
    NotANumber(String),
    /// The user typed an integer that names no line of the file.
    InvalidLineNumber(i64),
    /// Nothing left to add once surrounding whitespace was trimmed.
    EmptyText,
}

impl DocumentError {
    /// The short message shown to the user in a dialog.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DocumentError::Store(io::errors::LineStoreError::IndexOutOfBounds { .. })
            | DocumentError::InvalidLineNumber(_) => "Invalid line number.".to_owned(),
            DocumentError::Store(io::errors::LineStoreError::EmbeddedLineBreak) => {
                "Text must fit on a single line.".to_owned()
            }
            DocumentError::Store(e) => format!("Could not access the file: {e}"),
            DocumentError::Search(editor_core::errors::SearchError::EmptyQuery) => {
                "Empty search.".to_owned()
            }
            DocumentError::NotANumber(_) => "Please enter a valid number.".to_owned(),
            DocumentError::EmptyText => "Nothing to add.".to_owned(),
        }
    }
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Store(e) => write!(f, "line store: {e}"),
            DocumentError::Search(e) => write!(f, "search: {e}"),
            DocumentError::NotANumber(input) => write!(f, "not a number: {input:?}"),
            DocumentError::InvalidLineNumber(n) => write!(f, "no line number {n}"),
            DocumentError::EmptyText => write!(f, "empty text"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Store(e) => Some(e),
            DocumentError::Search(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::errors::LineStoreError> for DocumentError {
    fn from(value: io::errors::LineStoreError) -> Self {
        DocumentError::Store(value)
    }
}

impl From<editor_core::errors::SearchError> for DocumentError {
    fn from(value: editor_core::errors::SearchError) -> Self {
        DocumentError::Search(value)
    }
}
