//! Upload directory layout and safe file name handling

use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

const WINDOWS_DEVICE_NAMES: [&str; 11] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3",
];

fn unsafe_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename regex"))
}

/// Reduce a client supplied file name to a safe basename.
///
/// The name is folded to ASCII, path separators and whitespace runs become
/// `_`, anything outside `[A-Za-z0-9_.-]` is dropped and leading/trailing
/// dots and underscores are trimmed. The result may be empty.
#[must_use]
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = unsafe_chars_re().replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default();
    if !trimmed.is_empty() && WINDOWS_DEVICE_NAMES.contains(&stem.to_ascii_uppercase().as_str()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Name offered to the browser for a stored file: the stored name without
/// its `<id>_<kind>_` prefix, behind `convertido_`.
#[must_use]
pub fn download_name(stored_name: &str) -> String {
    let base = stored_name.splitn(3, '_').last().unwrap_or(stored_name);
    format!("convertido_{base}")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DownloadError {
    #[error("empty file name")]
    EmptyName,

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("path escapes the upload directory: {0}")]
    OutsideRoot(String),

    #[error("not a regular file: {0}")]
    NotAFile(String),
}

/// A stored file that is safe to serve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub stored_name: String,
}

/// The directory holding uploaded originals and processed results.
#[derive(Debug, Clone)]
pub struct TempStore {
    root: PathBuf,
}

impl TempStore {
    /// Create the directory if needed. The root is kept in canonical form so
    /// confinement checks compare like with like.
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        Ok(TempStore {
            root: root.canonicalize()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    /// Where an upload is kept while it is validated and converted.
    pub fn original_path(&self, id: &Uuid, original_name: &str) -> PathBuf {
        self.path_for(&format!("{id}_original_{original_name}"))
    }

    /// Stored name of the converted workbook. Always `.xlsx`, whatever the
    /// upload's extension.
    #[must_use]
    pub fn processed_name(id: &Uuid, original_name: &str) -> String {
        let stem = Path::new(original_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("archivo");
        format!("{id}_processed_{stem}.xlsx")
    }

    /// Map a requested download name to a file inside the store.
    ///
    /// The name goes through [`secure_filename`] first; the canonical path
    /// (symlinks followed) must still lie under the root and be a regular
    /// file.
    pub fn resolve_download(&self, requested: &str) -> Result<ResolvedFile, DownloadError> {
        let stored_name = secure_filename(requested);
        if stored_name.is_empty() {
            return Err(DownloadError::EmptyName);
        }

        let candidate = self.root.join(&stored_name);
        let path = candidate
            .canonicalize()
            .map_err(|_| DownloadError::NotFound(stored_name.clone()))?;

        if !path.starts_with(&self.root) {
            return Err(DownloadError::OutsideRoot(stored_name));
        }
        if !path.is_file() {
            return Err(DownloadError::NotAFile(stored_name));
        }

        Ok(ResolvedFile { path, stored_name })
    }
}
