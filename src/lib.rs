//! # semview
//!
//! Compiles a declarative semantic model into deterministic SQL view
//! definitions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            Model file (facts, dimensions, keys)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [loader] + [validation]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    ModelDocument                        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [lowering]
//! ┌─────────────────────────────────────────────────────────┐
//! │               SemanticModel (semantic IR)               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql::builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Query::Base (SQL IR)                   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [passes]
//!     NormalizeFactQuery → BindMeasureAggregation → BindDimensionJoins
//!                          │
//!                          ▼ [sql::render]
//! ┌─────────────────────────────────────────────────────────┐
//! │                       SQL text                          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`compile`] drives this per fact and collects failures; [`emit`] writes
//! the results to disk.

pub mod compile;
pub mod config;
pub mod emit;
pub mod logging;
pub mod lowering;
pub mod model;
pub mod passes;
pub mod sql;
pub mod validation;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{
        compile_model, CompileError, CompileOptions, CompileReport, CompiledFact, Compiler,
        FactFailure, Stage,
    };
    pub use crate::emit::{ArtifactWriter, EmitOptions, Manifest};
    pub use crate::lowering::{lower, LoweringError};
    pub use crate::model::{Dimension, Fact, Measure, ModelDocument, SemanticModel};
    pub use crate::passes::{
        BindDimensionJoins, BindMeasureAggregation, BindingFailure, NormalizeFactQuery, Pass,
        PassError, Pipeline, PipelineError,
    };
    pub use crate::sql::{
        build_fact_query, build_queries, render, AggregateOp, BaseQuery, BuildError, Dialect,
        FactQuery, Query, QueryKind, RenderError, Renderer, SqlDialect,
    };
}
