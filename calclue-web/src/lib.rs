//! Calclue Web - WebAssembly bindings for the math-mode block decorator
//!
//! A JavaScript editor host creates a [`Decorator`] per editor and calls
//! `update` whenever its document or viewport changes. Annotations cross
//! the boundary as JSON arrays of `{from, to, kind, class}`, with offsets in
//! UTF-16 code units so they index JavaScript strings directly.

use wasm_bindgen::prelude::*;

use calclue_core::{
    export_annotations, AnnotationSet, CalcluePlugin, Document, MarkerAlignment, MathModeView,
    ViewUpdate,
};

pub mod io;

use io::{ConsoleLogger, LocalStorageStore};

/// localStorage key for the settings blob
const SETTINGS_KEY: &str = "calclue-settings";

/// Initialize the calclue web bindings
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
    ConsoleLogger::install(log::LevelFilter::Info);

    web_sys::console::log_1(&"calclue WASM initialized".into());

    Ok(())
}

fn annotations_json(set: &AnnotationSet) -> Result<String, JsValue> {
    serde_json::to_string(&export_annotations(set))
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Decorations for a freshly opened document, as JSON
#[wasm_bindgen]
pub fn initialize(text: &str) -> Result<String, JsValue> {
    annotations_json(&calclue_core::initialize(&Document::from_utf16_text(text)))
}

/// Decorations after an edit or viewport change, as JSON
#[wasm_bindgen]
pub fn refresh(text: &str) -> Result<String, JsValue> {
    annotations_json(&calclue_core::refresh(&Document::from_utf16_text(text)))
}

/// One editor's decorator, configured from stored settings
#[wasm_bindgen]
pub struct Decorator {
    plugin: CalcluePlugin,
    view: MathModeView,
}

#[wasm_bindgen]
impl Decorator {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Decorator {
        let plugin = CalcluePlugin::on_load(&LocalStorageStore::new(SETTINGS_KEY));
        Self::from_plugin(plugin, text)
    }

    /// Re-scan if either flag is set; returns whether a rescan happened.
    pub fn update(&mut self, text: &str, doc_changed: bool, viewport_changed: bool) -> bool {
        let update = ViewUpdate {
            doc_changed,
            viewport_changed,
        };
        self.view.update(&update, &Document::from_utf16_text(text))
    }

    pub fn decorations(&self) -> Result<String, JsValue> {
        annotations_json(self.view.decorations())
    }

    #[wasm_bindgen(js_name = annotationCount)]
    pub fn annotation_count(&self) -> usize {
        self.view.decorations().len()
    }

    /// Switch marker slicing, persist the choice, and rescan `text`.
    #[wasm_bindgen(js_name = setTrimmedMarkers)]
    pub fn set_trimmed_markers(&mut self, trimmed: bool, text: &str) -> Result<(), JsValue> {
        self.apply_alignment(trimmed, text);
        self.plugin
            .settings
            .save(&LocalStorageStore::new(SETTINGS_KEY))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Hook for rendered (reading) views
    #[wasm_bindgen(js_name = postProcess)]
    pub fn post_process(&self, element: &str, source_path: &str) {
        self.plugin.post_process(element, source_path);
    }
}

impl Decorator {
    fn from_plugin(plugin: CalcluePlugin, text: &str) -> Self {
        let view = plugin.extension().create(&Document::from_utf16_text(text));
        Self { plugin, view }
    }

    fn apply_alignment(&mut self, trimmed: bool, text: &str) {
        let mut settings = self.plugin.settings.clone();
        settings.marker_alignment = if trimmed {
            MarkerAlignment::Trimmed
        } else {
            MarkerAlignment::Untrimmed
        };
        self.plugin.apply_settings(settings);
        self.view = self.plugin.extension().create(&Document::from_utf16_text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calclue_core::Settings;

    #[test]
    fn test_initialize_json() {
        let json = initialize("text\n:::thm\nbody\n:::").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.as_array().map(Vec::len), Some(4));
        assert_eq!(parsed[0]["from"], 5);
        assert_eq!(parsed[0]["class"], "cm-calclue-mathmode-marker");
        assert_eq!(parsed[2]["kind"], "line");
        assert_eq!(parsed[2]["class"], "cm-calclue-mathmode cm-thm");
    }

    #[test]
    fn test_offsets_are_utf16_code_units() {
        let json = initialize("😀\n:::thm").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["from"], 3);
        assert_eq!(parsed[0]["to"], 6);
        assert_eq!(parsed[1]["from"], 6);
        assert_eq!(parsed[1]["to"], 9);
    }

    #[test]
    fn test_decorator_update_uses_utf16_offsets() {
        let mut decorator = Decorator::from_plugin(CalcluePlugin::new(Settings::default()), "");
        assert!(decorator.update("é😀x\n:::\nbody", true, false));

        let parsed: serde_json::Value =
            serde_json::from_str(&decorator.decorations().unwrap()).unwrap();
        assert_eq!(parsed[0]["from"], 5);
        assert_eq!(parsed[0]["to"], 8);
        assert_eq!(parsed[1]["from"], 9);
    }

    #[test]
    fn test_refresh_matches_initialize() {
        let text = ":::\nx\n:::\n::: def\nopen";
        assert_eq!(initialize(text).unwrap(), refresh(text).unwrap());
    }

    #[test]
    fn test_decorator_update_flags() {
        let mut decorator = Decorator::from_plugin(CalcluePlugin::new(Settings::default()), "plain");
        assert_eq!(decorator.annotation_count(), 0);

        assert!(!decorator.update(":::\nx", false, false));
        assert_eq!(decorator.annotation_count(), 0);

        assert!(decorator.update(":::\nx", true, false));
        assert_eq!(decorator.annotation_count(), 2);
    }

    #[test]
    fn test_alignment_switch_rescans() {
        let text = "  :::\nx\n:::";
        let mut decorator = Decorator::from_plugin(CalcluePlugin::new(Settings::default()), text);
        decorator.apply_alignment(true, text);

        let parsed: serde_json::Value =
            serde_json::from_str(&decorator.decorations().unwrap()).unwrap();
        assert_eq!(parsed[0]["from"], 2);
        assert_eq!(parsed[0]["to"], 5);
    }
}
