use tracing::debug;

use crate::error::ParseError;
use crate::sanitize::sanitize_page_text;
use crate::types::RawLine;

/// Extract ordered plain-text lines from a PDF byte buffer.
///
/// Reads the PDF's embedded text layer page by page. Page order and
/// in-page line order are preserved; multi-column layouts are not
/// re-flowed, so downstream classifiers must tolerate column-interleaved
/// lines. Scanned or image-only documents carry no text layer and are
/// reported as unreadable.
pub fn extract_lines(pdf_bytes: &[u8]) -> Result<Vec<RawLine>, ParseError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| ParseError::UnreadablePdf(e.to_string()))?;

    let mut lines = Vec::new();
    for (page_index, text) in pages.iter().enumerate() {
        for (line_index, line) in sanitize_page_text(text).into_iter().enumerate() {
            lines.push(RawLine {
                text: line,
                page_index,
                line_index,
            });
        }
    }

    if lines.is_empty() {
        return Err(ParseError::UnreadablePdf(
            "no extractable text layer".to_string(),
        ));
    }

    debug!(
        pages = pages.len(),
        lines = lines.len(),
        "extracted text layer"
    );
    Ok(lines)
}
