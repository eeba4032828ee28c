pub mod annotation;
pub mod document;
pub mod line;
pub mod text_range;

pub use annotation::{
    Annotation, AnnotationKind, StyleClasses, CLASS_PREFIX, CONTENT_CLASS, MARKER_CLASS,
};
pub use document::{Document, OffsetUnit};
pub use line::{Line, Lines, TextBuffer};
pub use text_range::TextRange;
