// src/services/generator.rs
//
// Renders AI-authored markdown-ish content into DOCX and PDF byte
// streams. Both renderers share one parsed document body so the two
// containers always carry the same text.

use std::io::{BufWriter, Cursor};

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, Start,
};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::info;

use crate::analysis::models::AnalysisResult;
use crate::common::ApiError;
use crate::documents::models::{DocumentFormat, DocumentKind};

const BULLET_NUMBERING_ID: usize = 1;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("{0}")]
    InputMissing(String),

    #[error("document rendering failed: {0}")]
    Render(String),
}

impl From<GeneratorError> for ApiError {
    fn from(e: GeneratorError) -> Self {
        match e {
            GeneratorError::InputMissing(msg) => ApiError::GenerationInputMissing(msg),
            GeneratorError::Render(msg) => ApiError::InternalServer(msg),
        }
    }
}

/// One run of text with inline formatting flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl InlineSpan {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
            italic: false,
        }
    }

    fn bold(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: true,
            italic: false,
        }
    }

    fn italic(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
            italic: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Bullet(Vec<InlineSpan>),
    Paragraph(Vec<InlineSpan>),
}

/// Parsed document content, independent of the output container.
#[derive(Debug, Clone)]
pub struct DocumentBody {
    pub blocks: Vec<Block>,
}

impl DocumentBody {
    /// Flattened plain text of the whole body.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Heading(text) => text.clone(),
                Block::Bullet(spans) | Block::Paragraph(spans) => flatten_spans(spans),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse `**bold**`, `*italic*` and `_italic_` markers into spans.
/// Unterminated markers are kept as literal text.
pub fn parse_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if rest.starts_with("**") {
            if let Some(end) = rest[2..].find("**") {
                spans.push(InlineSpan::bold(&rest[2..2 + end]));
                i += 2 + end + 2;
                continue;
            }
        }

        if rest.starts_with('*') || rest.starts_with('_') {
            let marker = &rest[..1];
            if let Some(end) = rest[1..].find(marker) {
                if end > 0 {
                    spans.push(InlineSpan::italic(&rest[1..1 + end]));
                    i += 1 + end + 1;
                    continue;
                }
            }
        }

        // Plain run up to the next marker.
        let next = ["**", "*", "_"]
            .iter()
            .filter_map(|m| rest.find(m))
            .filter(|&pos| pos > 0)
            .min()
            .unwrap_or(rest.len());
        spans.push(InlineSpan::plain(&rest[..next]));
        i += next;
    }

    spans
}

/// Parse the model's markdown-ish output into blocks: `##`/`###`
/// headings, `- `/`• ` bullets, everything else a paragraph. Blank
/// lines are dropped.
pub fn parse_content(content: &str) -> DocumentBody {
    let mut blocks = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("##") {
            let heading = line.trim_start_matches('#').trim();
            blocks.push(Block::Heading(heading.to_string()));
        } else if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("• ")) {
            blocks.push(Block::Bullet(parse_inline(item.trim())));
        } else {
            blocks.push(Block::Paragraph(parse_inline(line)));
        }
    }

    DocumentBody { blocks }
}

/// Reject generation when the analysis lacks the minimum facts for the
/// requested document kind.
pub fn validate_inputs(kind: DocumentKind, analysis: &AnalysisResult) -> Result<(), GeneratorError> {
    match kind {
        DocumentKind::CoverLetter => {
            if analysis.job_analysis.job_title.trim().is_empty() {
                return Err(GeneratorError::InputMissing(
                    "A cover letter requires a job title in the job description analysis"
                        .to_string(),
                ));
            }
        }
        DocumentKind::Resume => {
            let resume = &analysis.resume_analysis;
            if resume.skills.is_empty() && resume.experience.is_empty() {
                return Err(GeneratorError::InputMissing(
                    "A tailored resume requires at least one skill or experience entry in the resume analysis".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Render AI content into the requested container format. CPU-bound and
/// synchronous; callers keep it off await points.
pub fn generate(
    kind: DocumentKind,
    format: DocumentFormat,
    analysis: &AnalysisResult,
    content: &str,
) -> Result<Vec<u8>, GeneratorError> {
    validate_inputs(kind, analysis)?;

    let body = parse_content(content);
    let bytes = match format {
        DocumentFormat::Docx => render_docx(&body)?,
        DocumentFormat::Pdf => render_pdf(&body, kind.title())?,
    };

    info!(
        kind = %kind,
        format = %format,
        bytes = bytes.len(),
        "Document rendered"
    );
    Ok(bytes)
}

fn flatten_spans(spans: &[InlineSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

fn docx_runs(spans: &[InlineSpan]) -> Vec<Run> {
    spans
        .iter()
        .map(|span| {
            let mut run = Run::new().add_text(span.text.as_str());
            if span.bold {
                run = run.bold();
            }
            if span.italic {
                run = run.italic();
            }
            run
        })
        .collect()
}

fn render_docx(body: &DocumentBody) -> Result<Vec<u8>, GeneratorError> {
    let mut docx = Docx::new()
        .add_abstract_numbering(
            AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(Level::new(
                0,
                Start::new(1),
                NumberFormat::new("bullet"),
                LevelText::new("•"),
                LevelJc::new("left"),
            )),
        )
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID));

    for block in &body.blocks {
        let paragraph = match block {
            Block::Heading(text) => Paragraph::new().add_run(
                Run::new()
                    .add_text(text.as_str())
                    .bold()
                    .size(28)
                    .color("003366"),
            ),
            Block::Bullet(spans) => {
                let mut paragraph = Paragraph::new().numbering(
                    NumberingId::new(BULLET_NUMBERING_ID),
                    IndentLevel::new(0),
                );
                for run in docx_runs(spans) {
                    paragraph = paragraph.add_run(run);
                }
                paragraph
            }
            Block::Paragraph(spans) => {
                let mut paragraph = Paragraph::new();
                for run in docx_runs(spans) {
                    paragraph = paragraph.add_run(run);
                }
                paragraph
            }
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| GeneratorError::Render(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn render_pdf(body: &DocumentBody, title: &str) -> Result<Vec<u8>, GeneratorError> {
    let (doc, page1, layer1) = PdfDocument::new(
        title,
        Mm(210.0), // A4 width
        Mm(297.0), // A4 height
        "Layer 1",
    );

    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| GeneratorError::Render(e.to_string()))?;
    let font_regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| GeneratorError::Render(e.to_string()))?;

    let left_margin = Mm(20.0);
    let top_margin = Mm(277.0);
    let bottom_margin = Mm(20.0);

    let mut current_layer = doc.get_page(page1).get_layer(layer1);
    let mut current_y = top_margin;

    for block in &body.blocks {
        // New page when the next line would run off the bottom.
        if current_y < bottom_margin {
            let (page, layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            current_layer = doc.get_page(page).get_layer(layer);
            current_y = top_margin;
        }

        match block {
            Block::Heading(text) => {
                current_y -= Mm(4.0);
                current_layer.use_text(text.as_str(), 13.0, left_margin, current_y, &font_bold);
                current_y -= Mm(7.0);
            }
            Block::Bullet(spans) => {
                let text = format!("• {}", flatten_spans(spans));
                for line in wrap_text(&text, 90) {
                    if current_y < bottom_margin {
                        let (page, layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
                        current_layer = doc.get_page(page).get_layer(layer);
                        current_y = top_margin;
                    }
                    current_layer.use_text(&line, 11.0, left_margin, current_y, &font_regular);
                    current_y -= Mm(5.0);
                }
            }
            Block::Paragraph(spans) => {
                let text = flatten_spans(spans);
                for line in wrap_text(&text, 90) {
                    if current_y < bottom_margin {
                        let (page, layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
                        current_layer = doc.get_page(page).get_layer(layer);
                        current_y = top_margin;
                    }
                    current_layer.use_text(&line, 11.0, left_margin, current_y, &font_regular);
                    current_y -= Mm(5.0);
                }
                current_y -= Mm(2.0);
            }
        }
    }

    let mut buffer = Vec::new();
    {
        let mut writer = BufWriter::new(Cursor::new(&mut buffer));
        doc.save(&mut writer)
            .map_err(|e| GeneratorError::Render(e.to_string()))?;
    }
    Ok(buffer)
}

/// Word-wrap text to a maximum line width in characters.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
