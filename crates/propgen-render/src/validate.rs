//! Sanity checks applied to every PDF before it leaves the renderer.

use crate::error::RenderError;

/// Smallest byte count accepted as a real document.
pub const MIN_PDF_BYTES: usize = 1_024;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// # Errors
///
/// Returns [`RenderError::InvalidPdf`] when the buffer is empty, lacks the
/// `%PDF-` header, or is shorter than [`MIN_PDF_BYTES`].
pub fn validate_pdf(bytes: &[u8]) -> Result<(), RenderError> {
    if bytes.is_empty() {
        return Err(RenderError::InvalidPdf("buffer is empty".to_string()));
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(RenderError::InvalidPdf(
            "buffer does not start with %PDF-".to_string(),
        ));
    }
    if bytes.len() < MIN_PDF_BYTES {
        return Err(RenderError::InvalidPdf(format!(
            "buffer is {} bytes, below the {MIN_PDF_BYTES}-byte minimum",
            bytes.len()
        )));
    }
    Ok(())
}
