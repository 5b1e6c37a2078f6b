pub type LineStoreResult<T> = Result<T, LineStoreError>;

#[derive(Debug)]
pub enum LineStoreError {
    IoError(std::io::Error),
    InvalidUtf8(std::str::Utf8Error),
    /// The 0-based `index` is not below `len`; the file was left untouched.
    IndexOutOfBounds { index: usize, len: usize },
    /// A single line was given text containing `\n` or `\r`.
    EmbeddedLineBreak,
}

impl LineStoreError {
    /// True for failures that came from the file system rather than from the
    /// caller's arguments.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            LineStoreError::IoError(_) | LineStoreError::InvalidUtf8(_)
        )
    }
}

impl std::fmt::Display for LineStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineStoreError::IoError(e) => write!(f, "{e}"),
            LineStoreError::InvalidUtf8(e) => write!(f, "file is not valid UTF-8: {e}"),
            LineStoreError::IndexOutOfBounds { index, len } => {
                write!(f, "line index {index} out of bounds (len={len})")
            }
            LineStoreError::EmbeddedLineBreak => write!(f, "text contains a line break"),
        }
    }
}

impl std::error::Error for LineStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LineStoreError::IoError(e) => Some(e),
            LineStoreError::InvalidUtf8(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LineStoreError {
    fn from(value: std::io::Error) -> Self {
        LineStoreError::IoError(value)
    }
}

impl From<std::str::Utf8Error> for LineStoreError {
    fn from(value: std::str::Utf8Error) -> Self {
        LineStoreError::InvalidUtf8(value)
    }
}
