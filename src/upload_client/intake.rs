use crate::config::Config;
use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use std::path::{Path, PathBuf};

/// A file the user pointed at, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

/// A file that passed intake. Only `validate` produces one.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

#[derive(Clone, PartialEq)]
pub struct PreviewData {
    pub mime_type: String,
    pub encoded: String,
}

impl fmt::Debug for PreviewData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewData")
            .field("mime_type", &self.mime_type)
            .field("encoded", &format_args!("<{} base64 chars>", self.encoded.len()))
            .finish()
    }
}

impl PreviewData {
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            encoded: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.encoded)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(&self.encoded)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeRejection {
    TooLarge { limit: u64 },
    UnsupportedType { mime_type: String },
}

impl IntakeRejection {
    pub fn notice(&self) -> String {
        match self {
            IntakeRejection::TooLarge { limit, .. } => format!(
                "File size must be less than {}MB",
                limit / crate::config::MIB
            ),
            IntakeRejection::UnsupportedType { .. } => {
                "Please upload a valid image file (PNG, JPG, JPEG, GIF, BMP, WEBP)".to_string()
            }
        }
    }
}

/// Declared MIME type from the extension, the way a file picker reports it.
pub fn mime_from_path(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
    .to_string()
}

pub fn inspect(path: &Path) -> std::io::Result<FileCandidate> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a file", path.display()),
        ));
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(FileCandidate {
        path: path.to_path_buf(),
        name,
        size: metadata.len(),
        mime_type: mime_from_path(path),
    })
}

pub fn validate(config: &Config, candidate: FileCandidate) -> Result<SelectedFile, IntakeRejection> {
    if candidate.size > config.max_upload_bytes {
        return Err(IntakeRejection::TooLarge {
            limit: config.max_upload_bytes,
        });
    }

    if !config
        .accepted_mime_types
        .iter()
        .any(|accepted| accepted == &candidate.mime_type)
    {
        return Err(IntakeRejection::UnsupportedType {
            mime_type: candidate.mime_type,
        });
    }

    Ok(SelectedFile {
        path: candidate.path,
        name: candidate.name,
        size: candidate.size,
        mime_type: candidate.mime_type,
    })
}

pub fn read_preview(file: &SelectedFile) -> std::io::Result<PreviewData> {
    let bytes = std::fs::read(&file.path)?;
    Ok(PreviewData::encode(&file.mime_type, &bytes))
}
