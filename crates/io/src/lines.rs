/// Terminator written after every line.
pub const LINE_TERMINATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Splits raw file bytes into lines without their terminators.
///
/// `\n`, `\r\n` and a lone `\r` each end a line. A terminator at the very end
/// of the input does not produce a trailing empty line, so `b"a\nb\n"` and
/// `b"a\nb"` both yield `["a", "b"]`.
#[derive(Debug, Clone)]
pub struct LineIter<'bytes> {
    bytes: &'bytes [u8],
    pos: usize,
}

impl<'bytes> LineIter<'bytes> {
    #[must_use]
    pub fn new(bytes: &'bytes [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl<'bytes> Iterator for LineIter<'bytes> {
    type Item = &'bytes [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.bytes.get(self.pos..)?;

        if rest.is_empty() {
            return None;
        }

        match memchr::memchr2(b'\n', b'\r', rest) {
            Some(at) => {
                let terminator_len = if rest[at] == b'\r' && rest.get(at + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };

                self.pos += at + terminator_len;
                Some(&rest[..at])
            }
            None => {
                self.pos = self.bytes.len();
                Some(rest)
            }
        }
    }
}

/// Whether `text` would span more than one line once written.
#[inline]
#[must_use]
pub fn contains_line_break(text: &str) -> bool {
    memchr::memchr2(b'\n', b'\r', text.as_bytes()).is_some()
}

/// Whether the last byte of `bytes` closes a line.
#[inline]
#[must_use]
pub fn ends_with_terminator(bytes: &[u8]) -> bool {
    matches!(bytes.last(), Some(b'\n' | b'\r'))
}
