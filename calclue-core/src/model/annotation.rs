use serde::{Deserialize, Serialize};

use super::TextRange;

/// Class applied to block content and to the keyword part of a start line.
pub const CONTENT_CLASS: &str = "cm-calclue-mathmode";
/// Class applied to the `:::` marker glyphs.
pub const MARKER_CLASS: &str = "cm-calclue-mathmode-marker";
/// Namespace prefix shared by every class the decorator emits.
pub const CLASS_PREFIX: &str = "cm-";

/// How an annotation attaches to the text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Zero-width marker at a line start; styles the whole line.
    Line,
    /// Contiguous character range inside a line.
    Span,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Line => "line",
            AnnotationKind::Span => "span",
        }
    }
}

/// Ordered list of CSS class names carried by an annotation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct StyleClasses(Vec<String>);

impl StyleClasses {
    pub fn marker() -> Self {
        Self(vec![MARKER_CLASS.to_string()])
    }

    /// Base content class, followed by `cm-<mode>` when a mode is set.
    pub fn content(mode: &str) -> Self {
        let mut classes = vec![CONTENT_CLASS.to_string()];
        if !mode.is_empty() {
            classes.push(format!("{CLASS_PREFIX}{mode}"));
        }
        Self(classes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.iter().any(|c| c == class)
    }

    /// Space-separated form, as written into a `class` attribute.
    pub fn class_attr(&self) -> String {
        self.0.join(" ")
    }
}

/// A styling instruction attached to a text range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Annotation {
    #[serde(flatten)]
    pub range: TextRange,
    pub classes: StyleClasses,
    pub kind: AnnotationKind,
}

impl Annotation {
    /// Zero-width line annotation at `line_start` styling the line as block content
    pub fn line(line_start: usize, mode: &str) -> Self {
        Self {
            range: TextRange::point(line_start),
            classes: StyleClasses::content(mode),
            kind: AnnotationKind::Line,
        }
    }

    pub fn marker(from: usize, to: usize) -> Self {
        Self {
            range: TextRange::new(from, to),
            classes: StyleClasses::marker(),
            kind: AnnotationKind::Span,
        }
    }

    pub fn content(from: usize, to: usize, mode: &str) -> Self {
        Self {
            range: TextRange::new(from, to),
            classes: StyleClasses::content(mode),
            kind: AnnotationKind::Span,
        }
    }

    pub fn from(&self) -> usize {
        self.range.from
    }

    pub fn to(&self) -> usize {
        self.range.to
    }

    pub fn is_marker(&self) -> bool {
        self.classes.contains(MARKER_CLASS)
    }
}
