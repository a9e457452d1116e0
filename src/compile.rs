//! End-to-end compilation from the semantic model to SQL text.
//!
//! ```text
//! SemanticModel → build_fact_query → Pipeline → Renderer → SQL
//! ```
//!
//! Each fact is compiled independently. A failure stops that fact only; the
//! batch continues and every failure is collected into the [`CompileReport`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use semview::compile::{compile_model, CompileOptions};
//!
//! let model = Arc::new(semview::lowering::lower(&document)?);
//! let report = compile_model(model, CompileOptions::default());
//! for fact in &report.compiled {
//!     println!("{}", fact.sql);
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::model::{Fact, SemanticModel};
use crate::passes::{BindMeasureAggregation, Pipeline, PipelineError};
use crate::sql::builder::{build_fact_query, BuildError};
use crate::sql::dialect::Dialect;
use crate::sql::query::Query;
use crate::sql::render::{RenderError, Renderer};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while compiling one fact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl CompileError {
    /// The stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            CompileError::Build(_) => Stage::Build,
            CompileError::Pipeline(e) => Stage::Pass(e.pass),
            CompileError::Render(_) => Stage::Render,
        }
    }
}

/// Where in the per-fact flow a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Pass(&'static str),
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Build => write!(f, "build"),
            Stage::Pass(name) => write!(f, "{}", name),
            Stage::Render => write!(f, "render"),
        }
    }
}

/// A fact that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactFailure {
    pub fact: String,
    pub stage: Stage,
    pub error: CompileError,
}

impl fmt::Display for FactFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.fact, self.error)
    }
}

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Dialect used for identifier quoting.
    pub dialect: Dialect,

    /// Compile facts on the rayon thread pool.
    pub parallel: bool,

    /// Aggregation binder (uniform `SUM` by default).
    pub aggregation: BindMeasureAggregation,
}

impl CompileOptions {
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_aggregation(mut self, aggregation: BindMeasureAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// SQL for one successfully compiled fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFact {
    pub name: String,
    pub sql: String,
}

/// Outcome of a batch: successes and failures, both in fact declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub compiled: Vec<CompiledFact>,
    pub failures: Vec<FactFailure>,
}

impl CompileReport {
    /// True when no fact failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn sql_for(&self, fact: &str) -> Option<&str> {
        self.compiled
            .iter()
            .find(|c| c.name == fact)
            .map(|c| c.sql.as_str())
    }

    pub fn failure_for(&self, fact: &str) -> Option<&FactFailure> {
        self.failures.iter().find(|f| f.fact == fact)
    }
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles the facts of one semantic model.
///
/// Holds the model, the pass pipeline and the renderer. None of them carry
/// per-fact state, so a compiler can be shared across threads.
#[derive(Debug)]
pub struct Compiler {
    model: Arc<SemanticModel>,
    pipeline: Pipeline,
    renderer: Renderer,
    parallel: bool,
}

impl Compiler {
    pub fn new(model: Arc<SemanticModel>, options: CompileOptions) -> Self {
        let pipeline = Pipeline::with_aggregation(Arc::clone(&model), options.aggregation);
        Self {
            model,
            pipeline,
            renderer: Renderer::new(options.dialect),
            parallel: options.parallel,
        }
    }

    pub fn model(&self) -> &SemanticModel {
        &self.model
    }

    /// Compile a single fact: build, run the pipeline, render.
    pub fn compile_fact(&self, fact: &Fact) -> Result<CompiledFact, FactFailure> {
        self.try_compile_fact(fact).map_err(|error| FactFailure {
            fact: fact.name.clone(),
            stage: error.stage(),
            error,
        })
    }

    fn try_compile_fact(&self, fact: &Fact) -> Result<CompiledFact, CompileError> {
        let query: Query = build_fact_query(fact)?.into();
        let compiled = self.pipeline.run(&query)?;
        let sql = self.renderer.render_query(&compiled)?;

        Ok(CompiledFact {
            name: fact.name.clone(),
            sql,
        })
    }

    /// Compile every fact in declaration order.
    pub fn compile_all(&self) -> CompileReport {
        let facts: Vec<&Fact> = self.model.facts.values().collect();

        let results: Vec<Result<CompiledFact, FactFailure>> = if self.parallel {
            facts.par_iter().map(|fact| self.compile_fact(fact)).collect()
        } else {
            facts.iter().map(|fact| self.compile_fact(fact)).collect()
        };

        // Collected in input order, so the report is identical either way
        let mut report = CompileReport::default();
        for result in results {
            match result {
                Ok(compiled) => {
                    info!(fact = %compiled.name, "compiled fact");
                    report.compiled.push(compiled);
                }
                Err(failure) => {
                    warn!(fact = %failure.fact, stage = %failure.stage, error = %failure.error, "fact failed to compile");
                    report.failures.push(failure);
                }
            }
        }

        report
    }
}

/// Compile every fact of `model`.
pub fn compile_model(model: Arc<SemanticModel>, options: CompileOptions) -> CompileReport {
    Compiler::new(model, options).compile_all()
}
