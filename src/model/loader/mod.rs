//! Model loaders.
//!
//! Currently supports:
//! - **YAML** (.yml, .yaml)
//!
//! # Example
//!
//! ```rust,ignore
//! use semview::model::loader::load_document;
//! use std::path::Path;
//!
//! let document = load_document(Path::new("semantic/model.contract.yml"))?;
//! ```

use std::fs;
use std::path::Path;
use thiserror::Error;

use super::document::ModelDocument;

/// Errors that can occur when loading a model document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Unsupported file extension
    #[error("Unsupported file extension: {extension}. Supported: .yml, .yaml")]
    UnsupportedExtension { extension: String },

    /// IO error reading file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error
    #[error("Invalid YAML in {file}: {source}")]
    Yaml {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The file parsed but holds no model
    #[error("Model file is empty: {path}")]
    Empty { path: String },
}

/// Result type for model loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a model document from a file path.
///
/// The loader is selected based on the file extension.
pub fn load_document(path: &Path) -> LoadResult<ModelDocument> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension {
        "yml" | "yaml" => {
            let content = fs::read_to_string(path)?;
            let filename = path.display().to_string();
            load_document_from_str(&content, &filename)
        }
        _ => Err(LoadError::UnsupportedExtension {
            extension: extension.to_string(),
        }),
    }
}

/// Load a model document from a YAML string (useful for testing).
///
/// `filename` is only used in error messages.
pub fn load_document_from_str(content: &str, filename: &str) -> LoadResult<ModelDocument> {
    if content.trim().is_empty() {
        return Err(LoadError::Empty {
            path: filename.to_string(),
        });
    }

    let document: Option<ModelDocument> =
        serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
            file: filename.to_string(),
            source,
        })?;

    document.ok_or_else(|| LoadError::Empty {
        path: filename.to_string(),
    })
}
