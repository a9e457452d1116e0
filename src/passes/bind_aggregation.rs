//! Measure aggregation binding.
//!
//! Every measure gets exactly one operator. The default is `SUM` for all of
//! them; [`BindMeasureAggregation::with_override`] is the per-measure lookup
//! for models that need something else.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::sql::query::{AggregateOp, FactQuery, MeasureAggregation, Query, QueryKind};

use super::{Pass, PassError};

/// Attaches a [`MeasureAggregation`] to every measure of a fact query.
#[derive(Debug, Clone, Default)]
pub struct BindMeasureAggregation {
    default: AggregateOp,
    overrides: HashMap<String, AggregateOp>,
}

impl BindMeasureAggregation {
    /// Uniform `SUM` for every measure.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, operator: AggregateOp) -> Self {
        self.default = operator;
        self
    }

    pub fn with_override(mut self, measure: impl Into<String>, operator: AggregateOp) -> Self {
        self.overrides.insert(measure.into(), operator);
        self
    }

    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, AggregateOp)>,
        S: Into<String>,
    {
        self.overrides
            .extend(overrides.into_iter().map(|(m, op)| (m.into(), op)));
        self
    }

    /// The operator bound to `measure`.
    pub fn operator_for(&self, measure: &str) -> AggregateOp {
        self.overrides.get(measure).copied().unwrap_or(self.default)
    }

    fn bind(&self, query: &FactQuery) -> FactQuery {
        let aggregations: IndexMap<String, MeasureAggregation> = query
            .measures
            .iter()
            .map(|m| (m.clone(), MeasureAggregation::new(m.as_str(), self.operator_for(m))))
            .collect();

        debug!(
            fact = %query.from_table,
            measures = aggregations.len(),
            "bound measure aggregations"
        );

        FactQuery {
            aggregations,
            ..query.clone()
        }
    }
}

impl Pass for BindMeasureAggregation {
    fn name(&self) -> &'static str {
        "bind_measure_aggregation"
    }

    fn run(&self, query: &Query) -> Result<Query, PassError> {
        match query {
            Query::Fact(fact) => Ok(Query::Fact(self.bind(fact))),
            Query::Base(_) => Err(PassError::mismatch(self.name(), QueryKind::Fact, query)),
        }
    }
}
