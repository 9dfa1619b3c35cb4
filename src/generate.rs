//! Client for the code-generation backend: posts the exported XMI document
//! and returns the generated archive.

use std::io::Read;

use thiserror::Error;

/// Fallback archive name when the response carries no usable
/// `Content-Disposition` header
pub const DEFAULT_ARCHIVE_NAME: &str = "generated.zip";

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Transport failure or non-success HTTP status
    #[error("generation request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("failed to read generated archive: {0}")]
    Io(#[from] std::io::Error),
}

/// A generated archive with its server-suggested filename
#[derive(Debug)]
pub struct GeneratedArchive {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Posts XMI documents to a generation endpoint.
#[derive(Debug, Clone)]
pub struct GenerateClient {
    endpoint: String,
}

impl GenerateClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Send the document and collect the archive. Non-success statuses
    /// surface as [`GenerateError::Http`].
    pub fn generate(&self, xml: &str) -> Result<GeneratedArchive, GenerateError> {
        let mut response = ureq::post(&self.endpoint)
            .header("content-type", "application/xml")
            .send(xml)?;
        let filename = response
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string());
        let mut bytes = Vec::new();
        response.body_mut().as_reader().read_to_end(&mut bytes)?;
        log::debug!("received {} bytes as {}", bytes.len(), filename);
        Ok(GeneratedArchive { filename, bytes })
    }
}

/// Extract a filename from a `Content-Disposition` header value. The
/// RFC 5987 `filename*=UTF-8''…` form wins over the plain `filename=` form.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    for part in header.split(';') {
        let part = part.trim();
        let lower = part.to_ascii_lowercase();
        if lower.starts_with("filename*=") {
            let rest = part["filename*=".len()..].trim_matches('"');
            let encoded = match rest.split_once("''") {
                Some((_charset, encoded)) => encoded,
                None => rest,
            };
            let decoded = percent_decode(encoded);
            if !decoded.is_empty() {
                return Some(decoded);
            }
        } else if lower.starts_with("filename=") {
            let candidate = part["filename=".len()..].trim_matches('"').to_string();
            if !candidate.is_empty() {
                plain = Some(candidate);
            }
        }
    }
    plain
}

fn percent_decode(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
