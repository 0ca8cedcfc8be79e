// src/documents/models.rs

use std::fmt;

/// Which document the pipeline is producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn slug(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover_letter",
        }
    }

    /// Title used for container metadata.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "Resume",
            DocumentKind::CoverLetter => "Cover Letter",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Requested container format. Anything outside this set is rejected
/// with `UnsupportedFormat` before any AI call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Docx,
    Pdf,
}

impl DocumentFormat {
    pub fn from_param(param: &str) -> Option<Self> {
        match param.trim().to_lowercase().as_str() {
            "docx" => Some(DocumentFormat::Docx),
            "pdf" => Some(DocumentFormat::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A generated artifact: the bytes plus the fixed logical filename the
/// store keeps it under.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub kind: DocumentKind,
    pub format: DocumentFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fixed "latest" filename for a (kind, format) slot.
pub fn slot_filename(kind: DocumentKind, format: DocumentFormat) -> String {
    format!("latest_{}.{}", kind.slug(), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_param_parsing() {
        assert_eq!(DocumentFormat::from_param("docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_param(" PDF "), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_param("rtf"), None);
        assert_eq!(DocumentFormat::from_param(""), None);
    }

    #[test]
    fn test_slot_filenames_are_fixed() {
        assert_eq!(
            slot_filename(DocumentKind::Resume, DocumentFormat::Docx),
            "latest_resume.docx"
        );
        assert_eq!(
            slot_filename(DocumentKind::CoverLetter, DocumentFormat::Pdf),
            "latest_cover_letter.pdf"
        );
    }
}
