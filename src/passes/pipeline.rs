//! Sequential pass pipeline.

use std::sync::Arc;

use tracing::debug;

use crate::model::SemanticModel;
use crate::sql::query::Query;

use super::{BindDimensionJoins, BindMeasureAggregation, NormalizeFactQuery, Pass, PassError};

/// A failed pipeline run: which pass failed, on which fact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pass '{pass}' failed for '{fact}': {source}")]
pub struct PipelineError {
    pub fact: String,
    pub pass: &'static str,
    #[source]
    pub source: PassError,
}

/// Ordered passes, applied left to right.
///
/// No branching and no retries: the first failing pass stops the run for
/// that query. A pipeline holds no per-query state, so one instance can be
/// shared by every fact of a batch.
#[derive(Debug, Default)]
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl Pipeline {
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Self {
        Self { passes }
    }

    /// Normalize, then bind aggregations, then bind dimension joins.
    pub fn standard(model: Arc<SemanticModel>) -> Self {
        Self::with_aggregation(model, BindMeasureAggregation::new())
    }

    /// The standard order with a configured aggregation binder.
    pub fn with_aggregation(model: Arc<SemanticModel>, aggregation: BindMeasureAggregation) -> Self {
        Self::default()
            .then(NormalizeFactQuery::new())
            .then(aggregation)
            .then(BindDimensionJoins::new(model))
    }

    /// Append a pass.
    pub fn then(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Thread `query` through every pass. The input is left untouched.
    pub fn run(&self, query: &Query) -> Result<Query, PipelineError> {
        let mut current = query.clone();

        for pass in &self.passes {
            debug!(pass = pass.name(), fact = %current.from_table(), "running pass");
            current = pass.run(&current).map_err(|source| PipelineError {
                fact: current.from_table().to_string(),
                pass: pass.name(),
                source,
            })?;
        }

        Ok(current)
    }
}
