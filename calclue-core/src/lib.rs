//! Calclue Core - Platform-agnostic math-mode block decorator
//!
//! This crate scans a document for `:::`-delimited blocks and produces the
//! styling annotations an editor renders for them. It's designed to work
//! both in native CLI and WASM environments.

pub mod builder;
pub mod export;
pub mod model;
pub mod plugin;
pub mod scanner;
pub mod settings;

pub use builder::{AnnotationError, AnnotationSet, AnnotationSetBuilder};
pub use export::{export_annotations, to_json, ExportAnnotation, ExportDocument};
pub use model::{
    Annotation, AnnotationKind, Document, Line, OffsetUnit, StyleClasses, TextBuffer, TextRange,
};
pub use plugin::{initialize, refresh, CalcluePlugin, MathModePlugin, MathModeView, ViewUpdate};
pub use scanner::{scan, BlockMarkerScanner, MarkerAlignment, ScanReport};
pub use settings::{MemoryStore, Settings, SettingsError, SettingsStore};
