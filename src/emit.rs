//! Artifact emission.
//!
//! Writes one `.sql` file per compiled fact plus an optional
//! `manifest.json`:
//!
//! ```text
//! <out>/
//! ├── manifest.json
//! └── facts/
//!     ├── fact_orders.sql
//!     └── fact_sales.sql
//! ```
//!
//! Facts that failed to compile get no file. They are listed in the manifest
//! so a partial run is visible.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::compile::{CompileReport, CompiledFact};
use crate::sql::dialect::{Dialect, SqlDialect};

/// Name of the manifest file in the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Error type for artifact emission.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("View name '{name}' exceeds the {dialect} identifier limit of {max}")]
    IdentifierTooLong {
        name: String,
        dialect: Dialect,
        max: usize,
    },

    #[error("Fact name '{name}' cannot be used as an artifact file name")]
    InvalidArtifactName { name: String },
}

/// How artifacts are shaped and placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// Wrap each query as `CREATE OR REPLACE VIEW <fact> AS`.
    pub wrap_view: bool,

    /// Append `;` to each artifact.
    pub terminator: bool,

    /// Write `manifest.json`.
    pub manifest: bool,

    /// Subdirectory of the output directory holding fact artifacts.
    pub facts_subdir: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            wrap_view: false,
            terminator: false,
            manifest: true,
            facts_subdir: "facts".to_string(),
        }
    }
}

/// One written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub fact: String,
    /// Path relative to the output directory, `/`-separated.
    pub path: String,
    pub sha256: String,
}

/// One fact that produced no artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub fact: String,
    pub stage: String,
    pub error: String,
}

/// Contents of `manifest.json`, in fact declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub dialect: Dialect,
    pub artifacts: Vec<ArtifactEntry>,
    pub failures: Vec<FailureEntry>,
}

/// Writes compiled facts to disk.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    out_dir: PathBuf,
    dialect: Dialect,
    options: EmitOptions,
}

impl ArtifactWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            dialect: Dialect::default(),
            options: EmitOptions::default(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_options(mut self, options: EmitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Final file content for a compiled fact.
    pub fn artifact_content(&self, fact: &CompiledFact) -> String {
        let mut content = if self.options.wrap_view {
            format!(
                "{} {} AS\n{}",
                self.dialect.create_view_keyword(),
                self.dialect.quote_identifier(&fact.name),
                fact.sql
            )
        } else {
            fact.sql.clone()
        };

        if self.options.terminator {
            content.push(';');
        }
        content
    }

    /// Relative artifact path for a fact.
    pub fn relative_path(&self, fact: &str) -> String {
        if self.options.facts_subdir.is_empty() {
            format!("{}.sql", fact)
        } else {
            format!("{}/{}.sql", self.options.facts_subdir, fact)
        }
    }

    /// Every fact name must be a single plain file name, and a view name
    /// within the dialect's identifier limit when views are wrapped.
    fn check_names(&self, report: &CompileReport) -> Result<(), EmitError> {
        for fact in &report.compiled {
            if !is_plain_file_name(&fact.name) {
                return Err(EmitError::InvalidArtifactName {
                    name: fact.name.clone(),
                });
            }
        }

        if !self.options.wrap_view {
            return Ok(());
        }
        let Some(max) = self.dialect.max_identifier_length() else {
            return Ok(());
        };

        match report
            .compiled
            .iter()
            .find(|f| self.dialect.identifier_length(&f.name) > max)
        {
            Some(fact) => Err(EmitError::IdentifierTooLong {
                name: fact.name.clone(),
                dialect: self.dialect,
                max,
            }),
            None => Ok(()),
        }
    }

    /// Write every successful fact of `report`, then the manifest.
    ///
    /// Nothing is written if a fact name is not a plain file name or a view
    /// name is too long for the dialect.
    pub fn write(&self, report: &CompileReport) -> Result<Manifest, EmitError> {
        self.check_names(report)?;

        let mut manifest = Manifest {
            dialect: self.dialect,
            ..Manifest::default()
        };

        for fact in &report.compiled {
            let relative = self.relative_path(&fact.name);
            let path = self.out_dir.join(&relative);
            let content = self.artifact_content(fact);

            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            write_file(&path, &content)?;
            debug!(fact = %fact.name, path = %path.display(), "wrote artifact");

            manifest.artifacts.push(ArtifactEntry {
                fact: fact.name.clone(),
                path: relative,
                sha256: content_hash(&content),
            });
        }

        manifest.failures = report
            .failures
            .iter()
            .map(|f| FailureEntry {
                fact: f.fact.clone(),
                stage: f.stage.to_string(),
                error: f.error.to_string(),
            })
            .collect();

        if self.options.manifest {
            create_dir_all(&self.out_dir)?;
            let path = self.out_dir.join(MANIFEST_FILE);
            let json = serde_json::to_string_pretty(&manifest)?;
            write_file(&path, &json)?;
        }

        info!(
            out_dir = %self.out_dir.display(),
            artifacts = manifest.artifacts.len(),
            failures = manifest.failures.len(),
            "emitted artifacts"
        );

        Ok(manifest)
    }
}

/// A single normal path component with no separator of either platform.
fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// SHA-256 of `content` as 64 lowercase hex characters.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn create_dir_all(path: &Path) -> Result<(), EmitError> {
    fs::create_dir_all(path).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), EmitError> {
    fs::write(path, content).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}
