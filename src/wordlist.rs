//! Keyword membership sets and the bounded scratch-buffer word extraction
//! both classifiers run on.
//!
//! Lookups happen at every identifier boundary, so sets are hashed rather
//! than scanned. Buffers are fixed-size and stack-allocated; a run longer
//! than its buffer is truncated and the truncated prefix is what gets
//! classified.

use rustc_hash::FxHashSet;

use crate::document::Accessor;

/// A set of ASCII keywords. Membership is case-sensitive; callers wanting
/// case-insensitive classification lower the probe text first and supply the
/// list in lowercase.
#[derive(Debug, Default)]
pub struct WordList {
    words: FxHashSet<Box<str>>,
}

impl WordList {
    #[must_use]
    pub fn new(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| Box::from(*w)).collect(),
        }
    }

    /// Build from the host's whitespace-separated list form.
    #[must_use]
    pub fn from_space_separated(list: &str) -> Self {
        Self {
            words: list.split_ascii_whitespace().map(Box::from).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, word: &[u8]) -> bool {
        std::str::from_utf8(word).is_ok_and(|w| self.words.contains(w))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Copy `[start, end)` into `buf`, truncated to the buffer.
pub fn copy_word<'b, A: Accessor>(
    styler: &A,
    start: usize,
    end: usize,
    buf: &'b mut [u8],
) -> &'b [u8] {
    let len = end.saturating_sub(start).min(buf.len());
    for (i, slot) in buf[..len].iter_mut().enumerate() {
        *slot = styler.byte_at(start + i);
    }
    &buf[..len]
}

/// Copy `[start, end)` into `buf` ASCII-lowered, first skipping leading
/// bytes that fail `is_word` (a token segment may open on its sigil).
pub fn copy_word_lowered<'b, A: Accessor>(
    styler: &A,
    mut start: usize,
    end: usize,
    is_word: fn(u8) -> bool,
    buf: &'b mut [u8],
) -> &'b [u8] {
    while start < end && !is_word(styler.byte_at(start)) {
        start += 1;
    }
    let len = (end - start).min(buf.len());
    for (i, slot) in buf[..len].iter_mut().enumerate() {
        *slot = styler.byte_at(start + i).to_ascii_lowercase();
    }
    &buf[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn membership_is_case_sensitive() {
        let list = WordList::new(&["proc", "set"]);
        assert!(list.contains(b"proc"));
        assert!(!list.contains(b"Proc"));
        assert!(!list.contains(b"puts"));
    }

    #[test]
    fn space_separated_form() {
        let list = WordList::from_space_separated("color margin  padding");
        assert!(list.contains(b"margin"));
        assert!(list.contains(b"padding"));
    }

    #[test]
    fn lowered_copy_skips_sigil_and_truncates() {
        let doc = Document::new("!IMPORTANT");
        let mut buf = [0u8; 100];
        let word = copy_word_lowered(&doc, 0, 10, |b| b.is_ascii_alphabetic(), &mut buf);
        assert_eq!(word, b"important");

        let mut tiny = [0u8; 4];
        let word = copy_word_lowered(&doc, 0, 10, |b| b.is_ascii_alphabetic(), &mut tiny);
        assert_eq!(word, b"impo");
    }

    #[test]
    fn raw_copy_keeps_case() {
        let doc = Document::new("-Flag");
        let mut buf = [0u8; 40];
        assert_eq!(copy_word(&doc, 0, 5, &mut buf), b"-Flag");
    }
}
