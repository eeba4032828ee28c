use super::{Line, TextBuffer};

/// What one offset step counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OffsetUnit {
    /// Unicode scalar values
    #[default]
    Chars,
    /// UTF-16 code units, as JavaScript editors count them
    Utf16,
}

impl OffsetUnit {
    pub fn measure(&self, text: &str) -> usize {
        match self {
            OffsetUnit::Chars => text.chars().count(),
            OffsetUnit::Utf16 => text.encode_utf16().count(),
        }
    }
}

/// Byte bounds and start/end offsets of one line
#[derive(Debug, Clone, Copy)]
struct LineSpan {
    from: usize,
    to: usize,
    start: usize,
    end: usize,
}

/// An immutable text snapshot with a precomputed line index
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub filepath: Option<String>,
    unit: OffsetUnit,
    lines: Vec<LineSpan>,
}

impl Document {
    pub fn new(title: String, content: String) -> Self {
        Self::with_unit(title, content, OffsetUnit::Chars)
    }

    pub fn with_unit(title: String, content: String, unit: OffsetUnit) -> Self {
        let lines = index_lines(&content, unit);
        Self {
            title,
            content,
            filepath: None,
            unit,
            lines,
        }
    }

    /// Create a document with file metadata (used by the CLI when loading from disk)
    pub fn with_file_info(title: String, content: String, filepath: String) -> Self {
        let mut doc = Self::new(title, content);
        doc.filepath = Some(filepath);
        doc
    }

    /// Untitled snapshot of `content`
    pub fn from_text(content: &str) -> Self {
        Self::new("Untitled".to_string(), content.to_string())
    }

    /// Untitled snapshot of text handed over by a JavaScript host
    pub fn from_utf16_text(content: &str) -> Self {
        Self::with_unit("Untitled".to_string(), content.to_string(), OffsetUnit::Utf16)
    }

    pub fn unit(&self) -> OffsetUnit {
        self.unit
    }

    /// Total length in offset units
    pub fn len(&self) -> usize {
        self.unit.measure(&self.content)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Slice of the content between two character offsets
    pub fn slice(&self, from: usize, to: usize) -> String {
        self.content
            .chars()
            .skip(from)
            .take(to.saturating_sub(from))
            .collect()
    }
}

impl TextBuffer for Document {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Line<'_> {
        let span = self.lines[index];
        Line::with_bounds(span.from, span.to, &self.content[span.start..span.end])
    }
}

/// Split on `\n`; a `\r` before the newline belongs to the terminator.
/// There is always at least one line, and a trailing newline opens an empty one.
fn index_lines(content: &str, unit: OffsetUnit) -> Vec<LineSpan> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut from = 0;

    for (i, c) in content.char_indices() {
        if c == '\n' {
            let end = if content[start..i].ends_with('\r') { i - 1 } else { i };
            let to = from + unit.measure(&content[start..end]);
            lines.push(LineSpan { from, to, start, end });
            from += unit.measure(&content[start..i]) + 1;
            start = i + 1;
        }
    }
    lines.push(LineSpan {
        from,
        to: from + unit.measure(&content[start..]),
        start,
        end: content.len(),
    });

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(doc: &Document) -> Vec<(usize, usize, &str)> {
        doc.lines().map(|l| (l.from, l.to, l.text)).collect()
    }

    #[test]
    fn test_empty_document_has_one_empty_line() {
        let doc = Document::from_text("");
        assert_eq!(collect(&doc), vec![(0, 0, "")]);
    }

    #[test]
    fn test_offsets_skip_newlines() {
        let doc = Document::from_text("text\n:::thm\nbody\n:::");
        assert_eq!(
            collect(&doc),
            vec![(0, 4, "text"), (5, 11, ":::thm"), (12, 16, "body"), (17, 20, ":::")]
        );
    }

    #[test]
    fn test_trailing_newline_opens_empty_line() {
        let doc = Document::from_text("a\n");
        assert_eq!(collect(&doc), vec![(0, 1, "a"), (2, 2, "")]);
    }

    #[test]
    fn test_crlf_excluded_from_line_text() {
        let doc = Document::from_text(":::\r\nx\r\n");
        assert_eq!(collect(&doc), vec![(0, 3, ":::"), (5, 6, "x"), (8, 8, "")]);
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        let doc = Document::from_text("ä€\n::: ü");
        assert_eq!(collect(&doc), vec![(0, 2, "ä€"), (3, 8, "::: ü")]);
        assert_eq!(doc.slice(7, 8), "ü");
    }

    #[test]
    fn test_utf16_offsets_count_surrogate_pairs() {
        let doc = Document::from_utf16_text("😀\n:::thm");
        assert_eq!(doc.unit(), OffsetUnit::Utf16);
        assert_eq!(collect(&doc), vec![(0, 2, "😀"), (3, 9, ":::thm")]);
        assert_eq!(doc.len(), 9);
    }

    #[test]
    fn test_char_offsets_count_emoji_once() {
        let doc = Document::from_text("😀\n:::thm");
        assert_eq!(collect(&doc), vec![(0, 1, "😀"), (2, 8, ":::thm")]);
        assert_eq!(doc.len(), 8);
    }
}
