//! Construction and update hooks the editing host drives
//!
//! The host builds a view when a document opens and hands it every
//! change. Both paths end in the same whole-document scan.

use crate::builder::AnnotationSet;
use crate::model::TextBuffer;
use crate::scanner::{BlockMarkerScanner, ScanReport};
use crate::settings::{Settings, SettingsStore};

/// Decorations for a freshly opened document
pub fn initialize<B: TextBuffer>(doc: &B) -> AnnotationSet {
    BlockMarkerScanner::default().scan(doc)
}

/// Decorations after the document or viewport changed
pub fn refresh<B: TextBuffer>(doc: &B) -> AnnotationSet {
    BlockMarkerScanner::default().scan(doc)
}

/// What changed since the last update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewUpdate {
    pub doc_changed: bool,
    pub viewport_changed: bool,
}

impl ViewUpdate {
    pub fn doc_changed() -> Self {
        Self {
            doc_changed: true,
            viewport_changed: false,
        }
    }

    pub fn viewport_changed() -> Self {
        Self {
            doc_changed: false,
            viewport_changed: true,
        }
    }

    pub fn needs_rescan(&self) -> bool {
        self.doc_changed || self.viewport_changed
    }
}

/// Per-editor state: the decorations currently shown
#[derive(Debug, Clone)]
pub struct MathModeView {
    scanner: BlockMarkerScanner,
    decorations: AnnotationSet,
}

impl MathModeView {
    pub fn new<B: TextBuffer>(scanner: BlockMarkerScanner, doc: &B) -> Self {
        Self {
            scanner,
            decorations: scanner.scan(doc),
        }
    }

    /// Re-scan `doc` if the update asks for it. Returns whether the decorations were rebuilt.
    pub fn update<B: TextBuffer>(&mut self, update: &ViewUpdate, doc: &B) -> bool {
        if !update.needs_rescan() {
            return false;
        }
        self.decorations = self.scanner.scan(doc);
        true
    }

    pub fn decorations(&self) -> &AnnotationSet {
        &self.decorations
    }
}

/// Editor extension the host installs; creates one view per editor
#[derive(Debug, Clone, Copy, Default)]
pub struct MathModePlugin {
    scanner: BlockMarkerScanner,
}

impl MathModePlugin {
    pub fn new(settings: &Settings) -> Self {
        Self {
            scanner: BlockMarkerScanner::new(settings.marker_alignment),
        }
    }

    pub fn create<B: TextBuffer>(&self, doc: &B) -> MathModeView {
        MathModeView::new(self.scanner, doc)
    }

    /// Block summary for `doc`, scanned with this extension's settings
    pub fn report<B: TextBuffer>(&self, doc: &B) -> ScanReport {
        self.scanner.scan_with_report(doc).1
    }
}

/// Plugin entry point: owns the settings and the editor extension
#[derive(Debug, Clone)]
pub struct CalcluePlugin {
    pub settings: Settings,
    extension: MathModePlugin,
}

impl CalcluePlugin {
    pub fn new(settings: Settings) -> Self {
        let extension = MathModePlugin::new(&settings);
        Self {
            settings,
            extension,
        }
    }

    /// Load settings from the host and prepare the extension for registration.
    pub fn on_load<S: SettingsStore>(store: &S) -> Self {
        let plugin = Self::new(Settings::load(store));
        log::info!(
            "calclue plugin loaded (marker alignment: {:?})",
            plugin.settings.marker_alignment
        );
        plugin
    }

    pub fn extension(&self) -> MathModePlugin {
        self.extension
    }

    /// Replace the settings, rebuilding the extension from them.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.extension = MathModePlugin::new(&settings);
        self.settings = settings;
    }

    /// Hook for rendered (non-editing) views; only reports what it was given.
    pub fn post_process(&self, element: &str, source_path: &str) {
        log::debug!("post-process {source_path}: {} chars of rendered output", element.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;
    use crate::scanner::MarkerAlignment;
    use crate::settings::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initialize_and_refresh_agree() {
        let doc = Document::from_text("a\n:::thm\nb\n:::");
        assert_eq!(initialize(&doc), refresh(&doc));
        assert_eq!(initialize(&doc).len(), 4);
    }

    #[test]
    fn test_update_without_changes_keeps_decorations() {
        let before = Document::from_text(":::\nx\n:::");
        let after = Document::from_text("plain");
        let mut view = MathModePlugin::default().create(&before);

        assert!(!view.update(&ViewUpdate::default(), &after));
        assert_eq!(view.decorations().len(), 3);
    }

    #[test]
    fn test_doc_change_rescans() {
        let mut view = MathModePlugin::default().create(&Document::from_text("plain"));
        assert!(view.decorations().is_empty());

        let edited = Document::from_text("plain\n::: def\nterm");
        assert!(view.update(&ViewUpdate::doc_changed(), &edited));
        assert_eq!(view.decorations(), &refresh(&edited));
    }

    #[test]
    fn test_viewport_change_rescans() {
        let doc = Document::from_text(":::\nx");
        let mut view = MathModePlugin::default().create(&Document::from_text(""));
        assert!(view.update(&ViewUpdate::viewport_changed(), &doc));
        assert_eq!(view.decorations().len(), 2);
    }

    #[test]
    fn test_on_load_uses_stored_alignment() {
        let store = MemoryStore::with_blob(r#"{"markerAlignment":"trimmed"}"#);
        let plugin = CalcluePlugin::on_load(&store);
        assert_eq!(plugin.settings.marker_alignment, MarkerAlignment::Trimmed);

        let view = plugin.extension().create(&Document::from_text("  :::\nx"));
        assert_eq!(view.decorations().iter().next().map(|a| a.from()), Some(2));
    }

    #[test]
    fn test_apply_settings_rebuilds_extension() {
        let mut plugin = CalcluePlugin::new(Settings::default());
        plugin.apply_settings(Settings {
            marker_alignment: MarkerAlignment::Trimmed,
            ..Settings::default()
        });
        let view = plugin.extension().create(&Document::from_text(" ::: a"));
        assert_eq!(view.decorations().iter().next().map(|a| a.from()), Some(1));
    }
}
