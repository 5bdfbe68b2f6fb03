//! Input resolution: validate a user-supplied document path.
//!
//! The magic-byte check exists so a wrong path produces a meaningful error
//! here instead of a pdfium failure two stages later.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ExtractError;

/// Validate that `input` names a readable PDF and return its path.
pub fn resolve_pdf(input: impl AsRef<Path>) -> Result<PathBuf, ExtractError> {
    let path = input.as_ref().to_path_buf();

    if !path.exists() {
        return Err(ExtractError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ExtractError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound { path });
        }
    }

    debug!("resolved document: {}", path.display());
    Ok(path)
}

/// Document name used in page artifact names: the file stem of the input.
pub fn document_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
