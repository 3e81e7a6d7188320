use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Content type implied by a filename's extension.
pub fn content_type_for_filename(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("pdf") => PDF_CONTENT_TYPE,
        Some("txt") => "text/plain",
        Some("md") | Some("markdown") => "text/markdown",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// The file selected for one workflow run.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    mime_type: String,
    content: Bytes,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Read a local file. The declared MIME type is inferred from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("File has no usable name: {}", path.display()))?
            .to_string();

        let mime_type = content_type_for_filename(&name);
        Ok(Self::new(name, mime_type, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Debug for UploadedFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Durable location of an uploaded file, as returned by the storage service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageReference {
    pub secure_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl StorageReference {
    pub fn new(secure_url: impl Into<String>) -> Self {
        Self {
            secure_url: secure_url.into(),
            public_id: None,
            bytes: None,
            format: None,
        }
    }

    /// First-page thumbnail URL. The storage service renders `.jpg` previews of PDFs.
    pub fn preview_url(&self) -> String {
        match self.secure_url.strip_suffix(".pdf") {
            Some(stem) => format!("{}.jpg", stem),
            None => self.secure_url.clone(),
        }
    }
}
