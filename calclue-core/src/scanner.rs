//! Line scanner that finds `:::` blocks and decorates them
//!
//! A line whose trimmed text starts with `:::` opens a block; the keyword
//! after the marker becomes the block's mode. A line whose trimmed text is
//! exactly `:::` closes it. Blocks do not nest, and a block left open runs
//! to the end of the document.

use serde::{Deserialize, Serialize};

use crate::builder::{AnnotationSet, AnnotationSetBuilder};
use crate::model::{Annotation, Line, TextBuffer};

/// Delimiter that opens and closes a block
pub const MARKER: &str = ":::";
const MARKER_LEN: usize = 3;

/// Where the start-line spans are sliced
///
/// Detection always looks at the trimmed line. `Untrimmed` slices the
/// marker from the raw line start, so leading whitespace shifts the styled
/// region off the actual `:::` glyphs. `Trimmed` slices from the first
/// non-whitespace character.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkerAlignment {
    #[default]
    Untrimmed,
    Trimmed,
}

/// State carried from one line to the next during a single pass
#[derive(Debug, Default)]
struct ScanState {
    in_block: bool,
    current_mode: String,
}

impl ScanState {
    fn open(&mut self, mode: String) {
        self.in_block = true;
        self.current_mode = mode;
    }

    fn close(&mut self) {
        self.in_block = false;
        self.current_mode.clear();
    }
}

/// Summary of the blocks seen in one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub lines: usize,
    pub blocks: usize,
    /// Mode of each block in document order; empty for a bare `:::`
    pub modes: Vec<String>,
    /// The last block was still open at end of document
    pub unterminated: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockMarkerScanner {
    alignment: MarkerAlignment,
}

impl BlockMarkerScanner {
    pub fn new(alignment: MarkerAlignment) -> Self {
        Self { alignment }
    }

    pub fn alignment(&self) -> MarkerAlignment {
        self.alignment
    }

    pub fn scan<B: TextBuffer>(&self, doc: &B) -> AnnotationSet {
        self.scan_with_report(doc).0
    }

    /// Scan the whole document from a fresh state.
    pub fn scan_with_report<B: TextBuffer>(&self, doc: &B) -> (AnnotationSet, ScanReport) {
        let mut builder = AnnotationSetBuilder::new();
        let mut state = ScanState::default();
        let mut report = ScanReport::default();

        for line in doc.lines() {
            report.lines += 1;
            let trimmed = trim_line(line.text);

            if !state.in_block && trimmed.starts_with(MARKER) {
                let mode = extract_mode(trimmed);
                report.blocks += 1;
                report.modes.push(mode.clone());
                state.open(mode);
                self.decorate_start(&mut builder, &line, &state.current_mode);
            } else if state.in_block && trimmed == MARKER {
                builder.add(Annotation::marker(line.from, line.to));
                state.close();
            } else if state.in_block {
                builder.add(Annotation::line(line.from, &state.current_mode));
            }
        }
        report.unterminated = state.in_block;

        let set = builder.finish();
        log::debug!(
            "scanned {} lines: {} blocks, {} annotations{}",
            report.lines,
            report.blocks,
            set.len(),
            if report.unterminated { ", last block unterminated" } else { "" }
        );
        (set, report)
    }

    fn decorate_start(&self, builder: &mut AnnotationSetBuilder, line: &Line<'_>, mode: &str) {
        let lead = match self.alignment {
            MarkerAlignment::Untrimmed => 0,
            // whitespace and U+FEFF are single units in every offset unit
            MarkerAlignment::Trimmed => line.text.chars().take_while(|&c| is_blank(c)).count(),
        };

        if line.len() >= MARKER_LEN {
            let marker_end = line.from + lead + MARKER_LEN;
            builder.add(Annotation::marker(line.from + lead, marker_end));
            if marker_end < line.to {
                builder.add(Annotation::content(marker_end, line.to, mode));
            }
        } else {
            builder.add(Annotation::marker(line.from, line.to));
        }
    }
}

/// Whitespace as JavaScript's `String.prototype.trim` sees it, which also
/// strips the byte order mark.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Line text with blanks removed from both ends
pub fn trim_line(text: &str) -> &str {
    text.trim_matches(is_blank)
}

/// Keyword after the start marker, trimmed and lowercased.
pub fn extract_mode(trimmed: &str) -> String {
    trim_line(trimmed.strip_prefix(MARKER).unwrap_or_default()).to_lowercase()
}

/// Scan with the default (untrimmed) marker alignment.
pub fn scan<B: TextBuffer>(doc: &B) -> AnnotationSet {
    BlockMarkerScanner::default().scan(doc)
}
