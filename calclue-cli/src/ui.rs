//! Terminal rendering of a scanned document

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use calclue_core::{StyleClasses, TextBuffer};

use crate::preview::{style_line, Preview, Role};

// Catppuccin Mocha colors
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const OVERLAY0: Color = Color::Rgb(108, 112, 134);
const BLUE: Color = Color::Rgb(137, 180, 250);

const MODE_COLORS: [Color; 6] = [
    Color::Rgb(203, 166, 247), // mauve
    Color::Rgb(148, 226, 213), // teal
    Color::Rgb(249, 226, 175), // yellow
    Color::Rgb(166, 227, 161), // green
    Color::Rgb(243, 139, 168), // red
    Color::Rgb(250, 179, 135), // peach
];

/// Stable colour for a class attribute, so each mode keeps its colour
fn mode_color(class_attr: &str) -> Color {
    let hash = class_attr
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    MODE_COLORS[hash % MODE_COLORS.len()]
}

pub fn draw(frame: &mut Frame, preview: &Preview) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, preview, chunks[0]);
    draw_main_area(frame, preview, chunks[1]);
    draw_status_bar(frame, preview, chunks[2]);
}

fn draw_title_bar(frame: &mut Frame, preview: &Preview, area: Rect) {
    let title_text = format!(
        " calclue - {} [{} blocks, {} annotations, {} rescans]",
        preview.document.title,
        preview.report.blocks,
        preview.decorations().len(),
        preview.rescans()
    );

    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));

    frame.render_widget(title_bar, area);
}

fn draw_main_area(frame: &mut Frame, preview: &Preview, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Document
            Constraint::Length(28), // Blocks
        ])
        .split(area);

    draw_document(frame, preview, chunks[0]);
    draw_blocks(frame, preview, chunks[1]);
}

fn draw_document(frame: &mut Frame, preview: &Preview, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Document");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let doc = &preview.document;
    let set = preview.decorations();
    let visible = inner.height as usize;
    let end = (preview.scroll + visible).min(doc.line_count());

    let lines: Vec<Line> = (preview.scroll..end)
        .map(|index| {
            let styled = style_line(doc, set, index);
            let base = match &styled.line_class {
                Some(class) => Style::default()
                    .fg(mode_color(class))
                    .add_modifier(Modifier::ITALIC),
                None => Style::default().fg(TEXT),
            };

            let gutter = if styled.line_class.is_some() { "│ " } else { "  " };
            let mut spans = vec![Span::styled(gutter, Style::default().fg(OVERLAY0))];
            spans.extend(styled.runs.into_iter().map(|(text, role)| {
                let style = match role {
                    Role::Plain => base,
                    Role::Marker => Style::default().fg(OVERLAY0).add_modifier(Modifier::DIM),
                    Role::Content(class) => Style::default()
                        .fg(mode_color(&class))
                        .add_modifier(Modifier::BOLD),
                };
                Span::styled(text, style)
            }));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_blocks(frame: &mut Frame, preview: &Preview, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SUBTEXT0))
        .title(format!("Blocks ({})", preview.report.blocks));

    let last = preview.report.modes.len().saturating_sub(1);
    let items: Vec<ListItem> = preview
        .report
        .modes
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let label = if mode.is_empty() { "(no mode)" } else { mode.as_str() };
            let open = if preview.report.unterminated && i == last {
                " (open)"
            } else {
                ""
            };
            let class = StyleClasses::content(mode).class_attr();
            ListItem::new(Line::from(Span::styled(
                format!(" {label}{open}"),
                Style::default().fg(mode_color(&class)),
            )))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_status_bar(frame: &mut Frame, preview: &Preview, area: Rect) {
    let status = preview.status_message.as_deref().unwrap_or("");
    let help_hint = "j/k scroll | g/G top/bottom | r reload | t alignment | q quit";

    let text = format!(
        " {} | line {}/{} | {} ",
        preview.alignment_label(),
        preview.scroll + 1,
        preview.document.line_count(),
        if status.is_empty() { help_hint } else { status }
    );

    let status_bar = Paragraph::new(text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));

    frame.render_widget(status_bar, area);
}
