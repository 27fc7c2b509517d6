use serde::{Deserialize, Serialize};

/// Byte range into a source file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`.
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 1-based line number of `start` within `source`.
    pub fn line_in(&self, source: &str) -> usize {
        let end = self.start.min(source.len());
        source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
    }
}

pub type Spanned<T> = (T, Span);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_covers_both() {
        let merged = Span::new(4, 6).merge(Span::new(1, 3));
        assert_eq!(merged, Span::new(1, 6));
    }

    #[test]
    fn test_line_in() {
        let source = "fn a() {\n}\nfn b() {\n}";
        assert_eq!(Span::new(0, 2).line_in(source), 1);
        assert_eq!(Span::new(11, 13).line_in(source), 3);
    }

    #[test]
    fn test_point_is_empty() {
        assert!(Span::point(7).is_empty());
        assert_eq!(Span::new(2, 5).len(), 3);
    }
}
