const SEPARATOR: &str = "    |    ";

/// Text of the status bar: an optional transient message, then the line count
/// and the backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: Option<String>,
    pub line_count: usize,
    pub path: std::path::PathBuf,
}

impl std::fmt::Display for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(message) = &self.message {
            write!(f, "{message}{SEPARATOR}")?;
        }

        write!(
            f,
            "Lines: {}{SEPARATOR}File: {}",
            self.line_count,
            self.path.display()
        )
    }
}
