use std::ops::Range;

/// Half-open byte range `[start, end)` into the text handed to a single
/// formatting call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Result<Self, SpanError> {
        if start <= end {
            Ok(Self { start, end })
        } else {
            Err(SpanError::Inverted { start, end })
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SpanError {
    #[error("span start {start} is past its end {end}")]
    Inverted { start: usize, end: usize },
}

#[cfg(test)]
mod tests {
    use super::{Span, SpanError};

    #[test]
    fn inverted_spans_are_rejected() {
        assert_eq!(
            Span::new(4, 2),
            Err(SpanError::Inverted { start: 4, end: 2 })
        );
        let span = Span::new(2, 4).unwrap();
        assert_eq!(span.len(), 2);
        assert!(!span.is_empty());
    }

    #[test]
    fn overlap_is_half_open() {
        let a = Span { start: 0, end: 5 };
        assert!(a.overlaps(Span { start: 4, end: 8 }));
        assert!(!a.overlaps(Span { start: 5, end: 8 }));
        assert!(a.contains(4));
        assert!(!a.contains(5));
    }
}
