//! lopdf-based page text extraction.

use lopdf::Document as PdfDoc;
use papersmith_common::{PapersmithError, Result};
use tracing::debug;

/// Plain text pulled out of a PDF, one `\n` after every page.
#[derive(Debug, Clone)]
pub struct ParsedPdf {
    pub full_text: String,
    pub page_count: usize,
    pub pages_failed: usize,
}

/// Extract the text of every page of an in-memory PDF.
/// Individual unreadable pages are skipped; a document with no readable page is an error.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<ParsedPdf> {
    let pdf = PdfDoc::load_mem(bytes)
        .map_err(|e| PapersmithError::Extract(format!("not a readable PDF: {e}")))?;

    if pdf.is_encrypted() {
        return Err(PapersmithError::Extract("PDF is encrypted".to_string()));
    }

    let pages = pdf.get_pages();
    let mut full_text = String::new();
    let mut pages_failed = 0;

    for page_num in pages.keys() {
        match pdf.extract_text(&[*page_num]) {
            Ok(text) => {
                full_text.push_str(&text);
                full_text.push('\n');
            }
            Err(e) => {
                debug!(page = page_num, error = %e, "Page text extraction failed");
                pages_failed += 1;
            }
        }
    }

    if !pages.is_empty() && pages_failed == pages.len() {
        return Err(PapersmithError::Extract(format!(
            "no readable text in any of {} pages",
            pages.len()
        )));
    }

    Ok(ParsedPdf {
        full_text,
        page_count: pages.len(),
        pages_failed,
    })
}
