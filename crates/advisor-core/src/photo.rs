use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use tempfile::NamedTempFile;

use crate::{errors::Error, Result};

/// A photo reference from an advisory request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhotoRef {
    /// `data:[<mime>][;base64],<payload>`, already decoded.
    Embedded(EmbeddedImage),
    /// URL or platform file id, forwarded verbatim.
    Remote(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PhotoRef {
    pub fn parse(raw: &str) -> Result<Self> {
        let Some(rest) = raw.strip_prefix("data:") else {
            return Ok(Self::Remote(raw.to_string()));
        };

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::Photo("data URL has no ',' separator".to_string()))?;

        let mime_type = header
            .split(';')
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_ascii_lowercase);

        Ok(Self::Embedded(EmbeddedImage {
            mime_type,
            bytes: decode_base64(payload)?,
        }))
    }
}

fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(Error::Photo("empty image payload".to_string()));
    }

    general_purpose::STANDARD
        .decode(&compact)
        .or_else(|_| general_purpose::STANDARD_NO_PAD.decode(&compact))
        .map_err(|e| Error::Photo(format!("invalid base64 payload: {e}")))
}

impl EmbeddedImage {
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_deref() {
            Some("image/png") => ".png",
            Some("image/gif") => ".gif",
            Some("image/webp") => ".webp",
            _ => ".jpg",
        }
    }

    /// Write the image to a fresh temp file inside `dir`.
    ///
    /// The file is removed when the returned handle is dropped or closed.
    pub async fn write_temp(&self, dir: &Path) -> Result<NamedTempFile> {
        tokio::fs::create_dir_all(dir).await?;
        let file = tempfile::Builder::new()
            .prefix("advisor-photo-")
            .suffix(self.extension())
            .tempfile_in(dir)?;
        tokio::fs::write(file.path(), &self.bytes).await?;
        Ok(file)
    }
}
