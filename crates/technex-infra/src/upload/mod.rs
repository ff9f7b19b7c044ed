//! Resume storage.
//!
//! A resume is accepted only when its extension, declared MIME type and
//! leading bytes all agree on one of the supported document formats.

use std::path::{Path, PathBuf};

use chrono::Utc;

/// Upload handler configuration.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory resumes are written to.
    pub dir: PathBuf,
    /// Size ceiling in bytes.
    pub max_bytes: usize,
    /// URL prefix recorded in front of stored names.
    pub public_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_bytes: 5 * 1024 * 1024,
            public_prefix: "uploads".to_string(),
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dir),
            ..defaults
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Resume file is required.")]
    Missing,

    #[error("File size too large. Maximum size is {0}MB.")]
    TooLarge(usize),

    #[error("Only .pdf, .doc and .docx files are allowed!")]
    UnsupportedType,

    #[error("File content does not match its .{0} extension.")]
    SignatureMismatch(&'static str),

    #[error("Only one resume file may be uploaded.")]
    TooManyFiles,

    #[error("Unexpected file field: {0}. Upload the file as `resume`.")]
    UnexpectedField(String),

    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported resume formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
}

impl DocumentKind {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    fn signature(&self) -> &'static [u8] {
        match self {
            Self::Pdf => b"%PDF",
            Self::Doc => &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
            Self::Docx => b"PK\x03\x04",
        }
    }
}

/// A file part received in full.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Validates and writes resumes under the upload directory.
#[derive(Debug, Clone)]
pub struct ResumeStore {
    config: UploadConfig,
}

impl ResumeStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn max_bytes(&self) -> usize {
        self.config.max_bytes
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    pub fn too_large(&self) -> UploadError {
        UploadError::TooLarge(self.config.max_bytes / (1024 * 1024))
    }

    /// Check size, extension, declared type and content signature.
    pub fn inspect(&self, file: &IncomingFile) -> Result<DocumentKind, UploadError> {
        if file.bytes.len() > self.config.max_bytes {
            return Err(self.too_large());
        }

        let kind = Path::new(&file.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .and_then(|e| DocumentKind::from_extension(&e))
            .ok_or(UploadError::UnsupportedType)?;

        let declared = file
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase());
        if declared.as_deref() != Some(kind.mime()) {
            return Err(UploadError::UnsupportedType);
        }

        if !file.bytes.starts_with(kind.signature()) {
            return Err(UploadError::SignatureMismatch(kind.extension()));
        }

        Ok(kind)
    }

    /// Write an inspected file and return its recorded path
    /// (`<prefix>/<millis>-<random>-<name>`).
    pub async fn store(&self, file: &IncomingFile) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.config.dir).await?;

        let stored_name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            rand::random_range(0..1_000_000_000u32),
            sanitize_file_name(&file.file_name)
        );
        let target = self.config.dir.join(&stored_name);
        tokio::fs::write(&target, &file.bytes).await?;

        tracing::info!(path = %target.display(), bytes = file.bytes.len(), "Resume stored");
        Ok(format!("{}/{}", self.config.public_prefix, stored_name))
    }
}

/// Final path component of a client-supplied name, restricted to
/// `[A-Za-z0-9._-]`.
fn sanitize_file_name(raw: &str) -> String {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> ResumeStore {
        ResumeStore::new(UploadConfig {
            dir: dir.to_path_buf(),
            ..UploadConfig::default()
        })
    }

    fn pdf(name: &str) -> IncomingFile {
        IncomingFile {
            file_name: name.to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: b"%PDF-1.7\n...".to_vec(),
        }
    }

    #[test]
    fn test_accepts_matching_pdf() {
        let store = store_in(Path::new("unused"));
        assert_eq!(store.inspect(&pdf("cv.PDF")).unwrap(), DocumentKind::Pdf);
    }

    #[test]
    fn test_rejects_executable_renamed_to_pdf() {
        let store = store_in(Path::new("unused"));

        let wrong_mime = IncomingFile {
            content_type: Some("application/x-msdownload".to_string()),
            ..pdf("setup.pdf")
        };
        assert!(matches!(
            store.inspect(&wrong_mime),
            Err(UploadError::UnsupportedType)
        ));

        let wrong_bytes = IncomingFile {
            bytes: b"MZ\x90\x00\x03".to_vec(),
            ..pdf("setup.pdf")
        };
        assert!(matches!(
            store.inspect(&wrong_bytes),
            Err(UploadError::SignatureMismatch("pdf"))
        ));
    }

    #[test]
    fn test_rejects_unknown_extension_and_oversize() {
        let store = store_in(Path::new("unused"));
        assert!(matches!(
            store.inspect(&pdf("setup.exe")),
            Err(UploadError::UnsupportedType)
        ));

        let huge = IncomingFile {
            bytes: vec![b'%'; 5 * 1024 * 1024 + 1],
            ..pdf("big.pdf")
        };
        let err = store.inspect(&huge).unwrap_err();
        assert_eq!(err.to_string(), "File size too large. Maximum size is 5MB.");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\My CV (final).pdf"), "My_CV__final_.pdf");
        assert_eq!(sanitize_file_name(".."), "resume");
    }

    #[tokio::test]
    async fn test_store_writes_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let first = store.store(&pdf("cv.pdf")).await.unwrap();
        let second = store.store(&pdf("cv.pdf")).await.unwrap();

        assert!(first.starts_with("uploads/"));
        assert!(first.ends_with("-cv.pdf"));
        assert_ne!(first, second);

        let name = first.trim_start_matches("uploads/");
        let written = std::fs::read(dir.path().join(name)).unwrap();
        assert!(written.starts_with(b"%PDF"));
    }
}
