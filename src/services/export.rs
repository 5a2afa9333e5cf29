//! PDF export of selected agenda items
//!
//! `render_agenda_pdf` is a stateless transform from (items, meeting-date
//! label) to document bytes, testable without any rendering surface. The
//! `Exporter` wraps it in the caller-facing state machine:
//! idle → generating → ready | failed. A failed layout never exposes a
//! partial document, and a second request while one is generating is
//! rejected rather than interleaved.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};

use crate::models::AgendaItem;

/// Heading printed at the top of every export
pub const DOCUMENT_TITLE: &str = "Commissioners Court Items of Interest";

/// Suggested file name for the downloadable artifact
pub const DOWNLOAD_FILE_NAME: &str = "commissioners-court-items.pdf";

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 18.0;
const CONTENT_WIDTH_MM: f64 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const PT_TO_MM: f64 = 0.3528;
// Average glyph advance for Helvetica, as a fraction of the font size
const AVG_GLYPH_WIDTH: f64 = 0.5;
const LAYER_NAME: &str = "content";

/// Error type for document generation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    /// No selected item is currently visible; the export affordance must
    /// not be offered in this state.
    #[error("nothing to export: no selected items are currently visible")]
    EmptySelection,

    /// A document is already generating; the request is rejected, not queued
    #[error("an export is already in progress")]
    InFlight,

    /// Document layout failed; no partial output is available
    #[error("document layout failed: {0}")]
    Layout(String),
}

/// Exporter lifecycle as observed by the caller
#[derive(Debug, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Generating,
    /// Finished document, ready for download
    Ready(Vec<u8>),
    Failed(String),
}

/// Document generation state machine
#[derive(Debug, Default)]
pub struct Exporter {
    state: ExportState,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ExportState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, ExportState::Generating)
    }

    /// The finished document, if the last generation succeeded
    pub fn document(&self) -> Option<&[u8]> {
        match &self.state {
            ExportState::Ready(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Drop any finished or failed outcome and return to idle
    pub fn reset(&mut self) {
        self.state = ExportState::Idle;
    }

    /// Generate a document for `items` (already selection ∩ visible, in
    /// dataset order). Layout runs on the blocking thread pool so the
    /// caller's runtime stays responsive.
    ///
    /// Rejects empty input and re-entrant requests without touching the
    /// current state.
    pub async fn generate(
        &mut self,
        items: Vec<AgendaItem>,
        meeting_date: String,
    ) -> Result<(), ExportError> {
        if self.is_generating() {
            return Err(ExportError::InFlight);
        }
        if items.is_empty() {
            return Err(ExportError::EmptySelection);
        }

        self.state = ExportState::Generating;
        let outcome =
            tokio::task::spawn_blocking(move || render_agenda_pdf(&items, &meeting_date)).await;

        match outcome {
            Ok(Ok(bytes)) => {
                self.state = ExportState::Ready(bytes);
                Ok(())
            }
            Ok(Err(err)) => {
                self.state = ExportState::Failed(err.to_string());
                Err(err)
            }
            Err(join_err) => {
                let err = ExportError::Layout(join_err.to_string());
                self.state = ExportState::Failed(err.to_string());
                Err(err)
            }
        }
    }
}

/// Lay out the export document: title and meeting-date header, then one
/// block per item with its number, title, attachments, color-coded votes
/// and outcome. Content flows across A4 pages.
pub fn render_agenda_pdf(items: &[AgendaItem], meeting_date: &str) -> Result<Vec<u8>, ExportError> {
    let mut writer = PdfWriter::new(DOCUMENT_TITLE)?;

    writer.centered_line(DOCUMENT_TITLE, 24.0, true, TITLE_BLUE);
    writer.space(2.0);
    writer.centered_line(meeting_date, 14.0, false, DATE_GRAY);
    writer.space(8.0);

    for item in items {
        writer.item_block(item);
    }

    writer.finish()
}

// Palette matching the on-screen treatment
const TITLE_BLUE: (u8, u8, u8) = (37, 99, 235);
const DATE_GRAY: (u8, u8, u8) = (107, 114, 128);
const SECTION_DARK: (u8, u8, u8) = (31, 41, 55);
const BODY_BLACK: (u8, u8, u8) = (17, 24, 39);
const LINK_BLUE: (u8, u8, u8) = (37, 99, 235);
const AYE_GREEN: (u8, u8, u8) = (22, 163, 74);
const NAY_RED: (u8, u8, u8) = (220, 38, 38);

fn fill_color((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// Cursor-based page writer over printpdf, tracking the vertical position
/// and starting a fresh page when a line would cross the bottom margin.
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance from the page bottom to the next baseline
    y: f64,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), LAYER_NAME);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Layout(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Layout(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    fn line_height(font_size: f64) -> f64 {
        font_size * PT_TO_MM * 1.45
    }

    fn max_chars(font_size: f64) -> usize {
        let glyph_mm = AVG_GLYPH_WIDTH * font_size * PT_TO_MM;
        ((CONTENT_WIDTH_MM / glyph_mm) as usize).max(8)
    }

    fn ensure_room(&mut self, needed: f64) {
        if self.y - needed < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), LAYER_NAME);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn space(&mut self, mm: f64) {
        self.y -= mm;
    }

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    /// Write one wrapped run of text starting at the left margin
    fn text(&mut self, text: &str, font_size: f64, bold: bool, color: (u8, u8, u8)) {
        let height = Self::line_height(font_size);
        self.layer.set_fill_color(fill_color(color));
        for line in wrap_text(text, Self::max_chars(font_size)) {
            self.ensure_room(height);
            self.y -= height;
            self.layer
                .use_text(line, font_size as f32, Mm(MARGIN_MM as f32), Mm(self.y as f32), self.font(bold));
        }
    }

    /// Write a single approximately centered line (header use only)
    fn centered_line(&mut self, text: &str, font_size: f64, bold: bool, color: (u8, u8, u8)) {
        let height = Self::line_height(font_size);
        self.ensure_room(height);
        self.y -= height;

        let glyph_mm = AVG_GLYPH_WIDTH * font_size * PT_TO_MM;
        let width = glyph_mm * text.chars().count() as f64;
        let x = ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM);

        self.layer.set_fill_color(fill_color(color));
        self.layer
            .use_text(text, font_size as f32, Mm(x as f32), Mm(self.y as f32), self.font(bold));
    }

    fn item_block(&mut self, item: &AgendaItem) {
        // Keep at least the number and first title line together
        self.ensure_room(Self::line_height(16.0) + Self::line_height(12.0) + 4.0);

        let number = match &item.agenda_number {
            Some(number) => format!("Item #{number}"),
            None => "No Item Number".to_string(),
        };
        self.text(&number, 16.0, true, BODY_BLACK);
        self.space(1.0);
        self.text(&item.title, 12.0, false, BODY_BLACK);

        if !item.attachments.is_empty() {
            self.space(3.0);
            self.text("Attachments:", 14.0, true, SECTION_DARK);
            for attachment in &item.attachments {
                let line = format!("{} - {}", attachment.name, attachment.hyperlink);
                self.text(&line, 10.0, false, LINK_BLUE);
            }
        }

        if !item.votes.is_empty() {
            self.space(3.0);
            self.text("Votes:", 14.0, true, SECTION_DARK);
            for vote in &item.votes {
                let color = if vote.is_affirmative() {
                    AYE_GREEN
                } else {
                    NAY_RED
                };
                let line = format!("{}: {}", vote.person_name, vote.vote_value);
                self.text(&line, 10.0, false, color);
            }
        }

        if let Some(outcome) = item.outcome() {
            self.space(3.0);
            self.text("Outcome:", 14.0, true, SECTION_DARK);
            self.text(outcome, 12.0, true, BODY_BLACK);
        }

        self.space(7.0);
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::Layout(e.to_string()))
    }
}

/// Greedy word wrap; words longer than a full line are hard-split so no
/// line ever exceeds the limit.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map(|(byte, _)| byte)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
