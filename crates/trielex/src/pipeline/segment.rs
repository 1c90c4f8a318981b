//! Character-mode pre-processing
//!
//! Raw text is split into special characters and the longest runs of plain
//! text between them.

use hashbrown::HashSet;

/// Set of characters segmented out of raw text
pub type SpecialSet = HashSet<char, ahash::RandomState>;

/// A piece of a text chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A maximal run of non-special characters, never empty
    Text(&'a str),
    /// A single special character
    Special(char),
}

impl Segment<'_> {
    /// The source text this segment covers
    #[must_use]
    pub fn len_utf8(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Special(c) => c.len_utf8(),
        }
    }
}

/// Iterator over the segments of a chunk
#[derive(Debug, Clone)]
pub struct Segments<'a, 's> {
    text: &'a str,
    specials: &'s SpecialSet,
    pos: usize,
}

/// Split `text` around the characters in `specials`.
///
/// With no special characters the whole text is one segment. Empty text
/// yields nothing.
#[must_use]
pub fn segment<'a, 's>(text: &'a str, specials: &'s SpecialSet) -> Segments<'a, 's> {
    Segments {
        text,
        specials,
        pos: 0,
    }
}

impl<'a> Iterator for Segments<'a, '_> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.pos..).filter(|rest| !rest.is_empty())?;
        let mut chars = rest.char_indices();
        if let Some((_, c)) = chars.next()
            && self.specials.contains(&c)
        {
            self.pos += c.len_utf8();
            return Some(Segment::Special(c));
        }
        let end = rest
            .char_indices()
            .find(|(_, c)| self.specials.contains(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += end;
        Some(Segment::Text(&rest[..end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specials(chars: &str) -> SpecialSet {
        chars.chars().collect()
    }

    #[test]
    fn test_segment_interleaves_text_and_specials() {
        let set = specials("_*");
        let segments: Vec<_> = segment("hi _there_**", &set).collect();
        assert_eq!(
            segments,
            [
                Segment::Text("hi "),
                Segment::Special('_'),
                Segment::Text("there"),
                Segment::Special('_'),
                Segment::Special('*'),
                Segment::Special('*'),
            ]
        );
    }

    #[test]
    fn test_segment_without_specials() {
        let set = SpecialSet::default();
        let segments: Vec<_> = segment("plain text\n", &set).collect();
        assert_eq!(segments, [Segment::Text("plain text\n")]);
    }

    #[test]
    fn test_segment_empty_text() {
        let set = specials("_");
        assert_eq!(segment("", &set).count(), 0);
    }

    #[test]
    fn test_segment_multibyte() {
        let set = specials("é");
        let segments: Vec<_> = segment("caféx", &set).collect();
        assert_eq!(
            segments,
            [Segment::Text("caf"), Segment::Special('é'), Segment::Text("x")]
        );
        let total: usize = segments.iter().map(Segment::len_utf8).sum();
        assert_eq!(total, "caféx".len());
    }
}
