/// Read-only view of one line of a document
///
/// `from` and `to` are absolute offsets into the whole document, in the
/// document's [`OffsetUnit`](super::OffsetUnit); `to` stops before the line
/// terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub from: usize,
    pub to: usize,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(from: usize, text: &'a str) -> Self {
        Self {
            from,
            to: from + text.chars().count(),
            text,
        }
    }

    /// Line whose end offset was measured by the caller
    pub fn with_bounds(from: usize, to: usize, text: &'a str) -> Self {
        Self { from, to, text }
    }

    /// Length in offset units
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Line-addressable text, as provided by an editing host
pub trait TextBuffer {
    fn line_count(&self) -> usize;

    /// Line at a 0-based index. Callers stay below `line_count()`.
    fn line(&self, index: usize) -> Line<'_>;

    fn lines(&self) -> Lines<'_, Self>
    where
        Self: Sized,
    {
        Lines {
            buffer: self,
            next: 0,
        }
    }
}

/// Iterator over the lines of a [`TextBuffer`]
pub struct Lines<'a, B: TextBuffer> {
    buffer: &'a B,
    next: usize,
}

impl<'a, B: TextBuffer> Iterator for Lines<'a, B> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.buffer.line_count() {
            return None;
        }
        let buffer = self.buffer;
        let line = buffer.line(self.next);
        self.next += 1;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_length_counts_characters() {
        let line = Line::new(10, "::: θ");
        assert_eq!(line.to, 15);
        assert_eq!(line.len(), 5);
        assert!(!line.is_empty());
        assert!(Line::new(4, "").is_empty());
    }
}
