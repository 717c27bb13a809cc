use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("{0}")]
    Extraction(String),

    #[error("the document contains no extractable text")]
    NoText,

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Extracts the plain text of an uploaded PDF.
///
/// Parsing is CPU-bound, so it runs on the blocking pool. Runs of whitespace
/// (including page breaks) collapse to single spaces.
pub async fn extract_text(data: Bytes) -> Result<String, PdfError> {
    let size = data.len();
    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await?
        .map_err(|e| PdfError::Extraction(e.to_string()))?;

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(PdfError::NoText);
    }

    debug!("Extracted {} chars from a {size}-byte PDF", text.len());
    Ok(text)
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive `.pdf` extension check on the uploaded file name.
pub fn has_pdf_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_page_breaks() {
        let raw = "  Jane Doe\n\nBackend Engineer\t\tBerlin\u{c}\nExperience  ";
        assert_eq!(
            normalize_whitespace(raw),
            "Jane Doe Backend Engineer Berlin Experience"
        );
    }

    #[test]
    fn test_pdf_extension() {
        assert!(has_pdf_extension("cv.pdf"));
        assert!(has_pdf_extension("Jane Doe CV.PDF"));
        assert!(!has_pdf_extension("cv.docx"));
        assert!(!has_pdf_extension("cv.pdf.txt"));
        assert!(!has_pdf_extension("pdf"));
        assert!(!has_pdf_extension(".pdf"));
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_an_extraction_error() {
        let result = extract_text(Bytes::from_static(b"this is not a pdf")).await;
        assert!(result.is_err());
    }
}
