use anyhow::{Context, Result};
use serde::Serialize;

use crate::builder::AnnotationSet;
use crate::model::{Annotation, Document, TextBuffer};
use crate::scanner::ScanReport;

/// JSON shape handed to hosts that consume decorations as data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    pub line_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ScanReport>,
    pub annotations: Vec<ExportAnnotation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportAnnotation {
    pub from: usize,
    pub to: usize,
    pub kind: String,
    /// Space-separated class attribute
    pub class: String,
}

impl From<&Annotation> for ExportAnnotation {
    fn from(ann: &Annotation) -> Self {
        Self {
            from: ann.from(),
            to: ann.to(),
            kind: ann.kind.as_str().to_string(),
            class: ann.classes.class_attr(),
        }
    }
}

impl ExportDocument {
    pub fn new(doc: &Document, set: &AnnotationSet) -> Self {
        Self {
            title: doc.title.clone(),
            filepath: doc.filepath.clone(),
            line_count: doc.line_count(),
            report: None,
            annotations: export_annotations(set),
        }
    }

    pub fn with_report(mut self, report: ScanReport) -> Self {
        self.report = Some(report);
        self
    }
}

pub fn export_annotations(set: &AnnotationSet) -> Vec<ExportAnnotation> {
    set.iter().map(ExportAnnotation::from).collect()
}

/// Serialize a document's decorations as pretty JSON, with the scan summary if given
pub fn to_json(doc: &Document, set: &AnnotationSet, report: Option<ScanReport>) -> Result<String> {
    let export = ExportDocument::new(doc, set);
    let export = match report {
        Some(report) => export.with_report(report),
        None => export,
    };
    serde_json::to_string_pretty(&export)
        .with_context(|| format!("Failed to serialize annotations for {}", doc.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    #[test]
    fn test_export_annotation_format() {
        let export = ExportAnnotation::from(&Annotation::content(3, 6, "thm"));
        let json = serde_json::to_string(&export).unwrap();

        assert!(json.contains("\"from\":3"));
        assert!(json.contains("\"to\":6"));
        assert!(json.contains("\"kind\":\"span\""));
        assert!(json.contains("\"class\":\"cm-calclue-mathmode cm-thm\""));
    }

    #[test]
    fn test_export_document_format() {
        let doc = Document::with_file_info(
            "notes".to_string(),
            ":::\nx\n:::".to_string(),
            "/path/to/notes.md".to_string(),
        );
        let json = to_json(&doc, &scan(&doc), None).unwrap();

        assert!(json.contains("\"lineCount\": 3"));
        assert!(json.contains("\"filepath\": \"/path/to/notes.md\""));
        assert!(!json.contains("\"report\""));
        assert_eq!(json.matches("\"class\"").count(), 3);
    }

    #[test]
    fn test_export_document_with_report() {
        let doc = Document::from_text(":::thm\nx\n:::\n::: Proof\ny");
        let (set, report) = crate::scanner::BlockMarkerScanner::default().scan_with_report(&doc);
        let json = to_json(&doc, &set, Some(report)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report"]["blocks"], 2);
        assert_eq!(value["report"]["modes"], serde_json::json!(["thm", "proof"]));
        assert_eq!(value["report"]["unterminated"], true);
        assert_eq!(value["annotations"][0]["class"], "cm-calclue-mathmode-marker");
    }
}
