use calclue_core::{
    AnnotationKind, AnnotationSet, CalcluePlugin, Document, MarkerAlignment, MathModeView,
    ScanReport, TextBuffer, ViewUpdate,
};

/// How a run of characters should be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Plain,
    Marker,
    /// Styled with the given class attribute
    Content(String),
}

/// One document line broken into styled runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    /// Class attribute of the line annotation, if the line is block content
    pub line_class: Option<String>,
    pub runs: Vec<(String, Role)>,
}

/// Resolve the decorations touching `line_index` into styled runs
pub fn style_line(doc: &Document, set: &AnnotationSet, line_index: usize) -> StyledLine {
    let line = doc.line(line_index);
    let mut line_class = None;
    let mut spans = Vec::new();

    for ann in set.between(line.from, line.to) {
        match ann.kind {
            AnnotationKind::Line => line_class = Some(ann.classes.class_attr()),
            AnnotationKind::Span => spans.push(ann),
        }
    }

    let mut runs: Vec<(String, Role)> = Vec::new();
    for (i, ch) in line.text.chars().enumerate() {
        let offset = line.from + i;
        let role = spans
            .iter()
            .find(|a| a.range.contains(offset))
            .map(|a| {
                if a.is_marker() {
                    Role::Marker
                } else {
                    Role::Content(a.classes.class_attr())
                }
            })
            .unwrap_or(Role::Plain);

        match runs.last_mut() {
            Some((text, last)) if *last == role => text.push(ch),
            _ => runs.push((ch.to_string(), role)),
        }
    }

    StyledLine { line_class, runs }
}

/// State of the interactive preview
pub struct Preview {
    pub document: Document,
    pub report: ScanReport,
    view: MathModeView,
    plugin: CalcluePlugin,
    pub scroll: usize,
    /// Scans run by view updates since the preview opened
    rescans: usize,
    pub running: bool,
    pub status_message: Option<String>,
}

impl Preview {
    pub fn new(plugin: CalcluePlugin, document: Document) -> Self {
        let view = plugin.extension().create(&document);
        let report = plugin.extension().report(&document);
        Self {
            document,
            report,
            view,
            plugin,
            scroll: 0,
            rescans: 0,
            running: true,
            status_message: None,
        }
    }

    pub fn decorations(&self) -> &AnnotationSet {
        self.view.decorations()
    }

    /// Swap in a re-read copy of the document and rescan it.
    pub fn reload(&mut self, document: Document) {
        self.document = document;
        self.send(ViewUpdate::doc_changed());
        self.report = self.plugin.extension().report(&self.document);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Toggle the marker alignment for this session.
    pub fn toggle_alignment(&mut self) {
        let mut settings = self.plugin.settings.clone();
        settings.marker_alignment = match settings.marker_alignment {
            MarkerAlignment::Untrimmed => MarkerAlignment::Trimmed,
            MarkerAlignment::Trimmed => MarkerAlignment::Untrimmed,
        };
        self.plugin.apply_settings(settings);
        self.view = self.plugin.extension().create(&self.document);
        self.set_status(&format!(
            "Marker alignment: {:?}",
            self.plugin.settings.marker_alignment
        ));
    }

    pub fn alignment_label(&self) -> &'static str {
        match self.plugin.settings.marker_alignment {
            MarkerAlignment::Untrimmed => "untrimmed",
            MarkerAlignment::Trimmed => "trimmed",
        }
    }

    fn max_scroll(&self) -> usize {
        self.document.line_count().saturating_sub(1)
    }

    pub fn rescans(&self) -> usize {
        self.rescans
    }

    fn send(&mut self, update: ViewUpdate) {
        if self.view.update(&update, &self.document) {
            self.rescans += 1;
        }
    }

    /// Every scroll is a viewport change, even when clamping leaves the offset alone.
    fn scroll_to(&mut self, line: usize) {
        self.scroll = line.min(self.max_scroll());
        self.send(ViewUpdate::viewport_changed());
    }

    pub fn scroll_down(&mut self) {
        self.scroll_to(self.scroll + 1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_to(self.scroll.saturating_sub(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_to(0);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_to(self.max_scroll());
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
