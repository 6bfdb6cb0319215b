//! String helpers for staying inside IRC line limits.

/// Maximum length of an IRC line, including the trailing CRLF.
pub const MAX_MESSAGE_BODY: usize = 512;

/// Truncates a string to at most `max_bytes` bytes without breaking
/// a multi-byte UTF-8 codepoint at the end.
///
/// # Examples
///
/// ```
/// use ribbirc::util::truncate_utf8_safe;
///
/// assert_eq!(truncate_utf8_safe("hello world", 5), "hello");
/// assert_eq!(truncate_utf8_safe("Hello 👋 World", 8), "Hello ");
/// assert_eq!(truncate_utf8_safe("hi", 10), "hi");
/// ```
#[inline]
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Splits text into chunks of at most `max_bytes` bytes.
///
/// Chunks break at the last space that fits, and the space itself is
/// dropped. A word longer than `max_bytes` is cut at a character boundary.
/// A single character wider than `max_bytes` still makes progress as a
/// chunk of its own.
///
/// # Examples
///
/// ```
/// use ribbirc::util::split_text;
///
/// let chunks: Vec<_> = split_text("Hello World! This is a test.", 12).collect();
/// assert_eq!(chunks, vec!["Hello World!", "This is a", "test."]);
/// ```
pub fn split_text(s: &str, max_bytes: usize) -> impl Iterator<Item = &str> {
    SplitText {
        remaining: s,
        max_bytes,
    }
}

struct SplitText<'a> {
    remaining: &'a str,
    max_bytes: usize,
}

impl<'a> Iterator for SplitText<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        if self.remaining.len() <= self.max_bytes {
            return Some(std::mem::take(&mut self.remaining));
        }

        let mut chunk = truncate_utf8_safe(self.remaining, self.max_bytes);
        if chunk.is_empty() {
            let width = self.remaining.chars().next().map_or(0, char::len_utf8);
            chunk = &self.remaining[..width];
        }

        // Break on a space only if the next chunk would otherwise start mid-word.
        let at_word_end = self.remaining[chunk.len()..].starts_with(' ');
        match chunk.rfind(' ') {
            Some(i) if i > 0 && !at_word_end => {
                let (head, tail) = self.remaining.split_at(i);
                self.remaining = &tail[1..];
                Some(head)
            }
            _ => {
                self.remaining = &self.remaining[chunk.len()..];
                if at_word_end {
                    self.remaining = &self.remaining[1..];
                }
                Some(chunk)
            }
        }
    }
}
