/// One keyword occurrence, as a half-open range of character offsets
/// (Unicode scalar values) into the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in characters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The byte range of this span within `text`, or `None` if the span runs
    /// past the end of `text`.
    #[must_use]
    pub fn byte_range(&self, text: &str) -> Option<std::ops::Range<usize>> {
        byte_ranges(text, std::slice::from_ref(self)).pop()
    }
}

/// Converts character-offset spans to byte ranges in a single pass over `text`.
/// Spans that do not fit in `text` are dropped.
#[must_use]
pub fn byte_ranges(text: &str, spans: &[MatchSpan]) -> Vec<std::ops::Range<usize>> {
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .collect();

    spans
        .iter()
        .filter_map(|span| Some(*offsets.get(span.start)?..*offsets.get(span.end)?))
        .collect()
}

/// Lower-cased copy of a text, remembering which original character each
/// folded character came from. Some characters lower-case to more than one.
struct Folded {
    chars: Vec<char>,
    origin: Vec<usize>,
}

impl Folded {
    fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());

        for (idx, ch) in text.chars().enumerate() {
            for lower in ch.to_lowercase() {
                chars.push(lower);
                origin.push(idx);
            }
        }

        Self { chars, origin }
    }

    /// Folded position `at` begins an original character.
    fn starts_char(&self, at: usize) -> bool {
        at == 0 || self.origin[at] != self.origin[at - 1]
    }

    /// Folded position `at` is just past the end of an original character.
    fn ends_char(&self, at: usize) -> bool {
        at == self.chars.len() || self.origin[at] != self.origin[at - 1]
    }
}

/// Finds every case-insensitive, literal occurrence of `keyword` in `text`.
///
/// The scan runs left to right and resumes at the end of each match, so
/// occurrences never overlap: `"aa"` in `"aaa"` matches once, at `[0, 2]`.
///
/// # Errors
///
/// Returns [`crate::errors::SearchError::EmptyQuery`] if `keyword` is empty.
pub fn find_matches(text: &str, keyword: &str) -> crate::errors::SearchResult<Vec<MatchSpan>> {
    if keyword.is_empty() {
        return Err(crate::errors::SearchError::EmptyQuery);
    }

    let needle: Vec<char> = keyword.chars().flat_map(char::to_lowercase).collect();
    let hay = Folded::new(text);
    let mut matches = Vec::new();
    let mut at = 0;

    while at + needle.len() <= hay.chars.len() {
        let end = at + needle.len();

        if hay.starts_char(at) && hay.chars[at..end] == needle[..] && hay.ends_char(end) {
            matches.push(MatchSpan::new(hay.origin[at], hay.origin[end - 1] + 1));
            at = end;
        } else {
            at += 1;
        }
    }

    log::debug!("search for {keyword:?} found {} matches", matches.len());

    Ok(matches)
}
