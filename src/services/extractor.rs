// src/services/extractor.rs
//
// PDF text extraction. Page text is concatenated in page order by the
// pdf-extract crate, with paragraph breaks preserved as newlines.

use crate::common::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    EmptyDocument(String),
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::UnsupportedFormat(msg) => ApiError::UnsupportedFormat(msg),
            ExtractError::EmptyDocument(msg) => ApiError::EmptyDocument(msg),
        }
    }
}

/// Extract plain text from an uploaded PDF.
///
/// The filename extension alone never qualifies a file: the content is
/// sniffed and parsed, so a renamed non-PDF still fails with
/// `UnsupportedFormat`. Extraction that yields only whitespace (scanned
/// image-only documents) fails with `EmptyDocument`.
pub fn extract_text(file_bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(ExtractError::UnsupportedFormat(format!(
            "'{}' must be a PDF file",
            filename
        )));
    }

    let is_pdf = infer::get(file_bytes)
        .map(|kind| kind.mime_type() == "application/pdf")
        .unwrap_or(false);
    if !is_pdf {
        return Err(ExtractError::UnsupportedFormat(format!(
            "'{}' is not a parseable PDF document",
            filename
        )));
    }

    let text = pdf_extract::extract_text_from_mem(file_bytes).map_err(|e| {
        ExtractError::UnsupportedFormat(format!("Could not parse '{}' as a PDF: {}", filename, e))
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::EmptyDocument(format!(
            "No text could be extracted from '{}'",
            filename
        )));
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::{BuiltinFont, Mm, PdfDocument};
    use std::io::{BufWriter, Cursor};

    fn render_pdf(lines: &[&str]) -> Vec<u8> {
        let (doc, page, layer) = PdfDocument::new("Test", Mm(210.0), Mm(297.0), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).unwrap();
        let layer = doc.get_page(page).get_layer(layer);

        let mut y = Mm(277.0);
        for line in lines {
            layer.use_text(*line, 11.0, Mm(20.0), y, &font);
            y -= Mm(6.0);
        }

        let mut buffer = Vec::new();
        {
            let mut writer = BufWriter::new(Cursor::new(&mut buffer));
            doc.save(&mut writer).unwrap();
        }
        buffer
    }

    #[test]
    fn test_text_pdf_extracts_content() {
        let bytes = render_pdf(&["Jane Doe", "Experienced Rust developer"]);
        let text = extract_text(&bytes, "resume.pdf").unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Experienced Rust developer"));
    }

    #[test]
    fn test_text_free_pdf_rejected_as_empty() {
        // Parses fine as a PDF, but extraction yields only whitespace.
        let bytes = render_pdf(&[]);
        let result = extract_text(&bytes, "resume.pdf");
        assert!(matches!(result, Err(ExtractError::EmptyDocument(_))));
    }

    #[test]
    fn test_non_pdf_bytes_with_pdf_filename_rejected() {
        let bytes = b"this is definitely not a pdf";
        let result = extract_text(bytes, "resume.pdf");
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let result = extract_text(b"%PDF-1.4 whatever", "resume.docx");
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = extract_text(&[], "resume.pdf");
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

}
