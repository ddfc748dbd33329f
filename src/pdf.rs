//! Server-side text extraction for uploaded PDFs.

use async_trait::async_trait;
use tracing::{error, info, instrument};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
  #[error("Could not extract text from the PDF file.")]
  Unreadable(String),
}

/// Turns uploaded file bytes into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
  async fn extract_text(&self, bytes: Vec<u8>) -> Result<String, ExtractError>;
}

/// `pdf-extract` backed extractor. Parsing is CPU-bound, so it runs on the
/// blocking pool; a panic inside the parser is reported as unreadable input.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
  #[instrument(level = "info", skip(self, bytes), fields(bytes = bytes.len()))]
  async fn extract_text(&self, bytes: Vec<u8>) -> Result<String, ExtractError> {
    let joined = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;
    match joined {
      Ok(Ok(text)) => {
        info!(text_len = text.len(), "PDF text extracted");
        Ok(text)
      }
      Ok(Err(e)) => {
        error!(error = ?e, "PDF parser rejected the upload");
        Err(ExtractError::Unreadable(format!("{:?}", e)))
      }
      Err(e) => {
        error!(error = %e, "PDF parser task failed");
        Err(ExtractError::Unreadable(e.to_string()))
      }
    }
  }
}
