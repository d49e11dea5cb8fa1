//! PDF text extraction.
//!
//! This module is only available when the `pdf` feature is enabled.

use lopdf::Document as PdfDocument;
use tracing::{debug, warn};

use crate::error::{RagError, Result};

/// Extract the text of every page, in page order, joined by `\n`.
///
/// A page whose text cannot be extracted contributes an empty string, so a
/// scanned PDF yields blank text rather than an error.
///
/// # Errors
///
/// Returns [`RagError::ExtractionError`] if the bytes are not a readable PDF.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let doc = PdfDocument::load_mem(bytes).map_err(|e| RagError::ExtractionError(e.to_string()))?;

    // `get_pages` is keyed by page number, so iteration is already in order.
    let pages: Vec<String> = doc
        .get_pages()
        .keys()
        .map(|page_number| {
            doc.extract_text(&[*page_number]).unwrap_or_else(|e| {
                warn!(page = page_number, error = %e, "failed to extract page text");
                String::new()
            })
        })
        .collect();

    debug!(pages = pages.len(), "extracted pdf text");
    Ok(pages.join("\n"))
}
