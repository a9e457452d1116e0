//! SQL IR - the typed representation of one SQL statement before rendering.
//!
//! A query starts life as a [`BaseQuery`] built straight from a fact and is
//! promoted to a [`FactQuery`] by normalization. The two shapes are carried
//! in the tagged [`Query`] enum so every pass has to match on the variant it
//! operates on.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Select Column
// =============================================================================

/// A SELECT list item: expression with alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    pub expression: String,
    pub alias: String,
}

impl SelectColumn {
    pub fn new(expression: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            alias: alias.into(),
        }
    }

    /// A bare column selected under its own name.
    pub fn column(name: &str) -> Self {
        Self::new(name, name)
    }
}

// =============================================================================
// Joins
// =============================================================================

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    Inner,
    #[default]
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL OUTER",
        }
    }
}

/// A join condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `left = right`, both sides column references
    Equals { left: String, right: String },
}

impl Predicate {
    pub fn equals(left: impl Into<String>, right: impl Into<String>) -> Self {
        Predicate::Equals {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { left, right } => write!(f, "{} = {}", left, right),
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub predicate: Predicate,
    pub join_type: JoinType,
}

impl Join {
    /// A LEFT JOIN, the default join type.
    pub fn left(table: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            table: table.into(),
            predicate,
            join_type: JoinType::Left,
        }
    }

    pub fn with_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Aggregation operator applied to a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    #[default]
    Sum,
    Count,
    Avg,
    Min,
    Max,
}

impl AggregateOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "SUM",
            AggregateOp::Count => "COUNT",
            AggregateOp::Avg => "AVG",
            AggregateOp::Min => "MIN",
            AggregateOp::Max => "MAX",
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for AggregateOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(AggregateOp::Sum),
            "count" => Ok(AggregateOp::Count),
            "avg" => Ok(AggregateOp::Avg),
            "min" => Ok(AggregateOp::Min),
            "max" => Ok(AggregateOp::Max),
            other => Err(format!("unknown aggregation operator: {}", other)),
        }
    }
}

/// An aggregation operator bound to a measure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureAggregation {
    pub measure: String,
    pub operator: AggregateOp,
}

impl MeasureAggregation {
    pub fn new(measure: impl Into<String>, operator: AggregateOp) -> Self {
        Self {
            measure: measure.into(),
            operator,
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

/// A query as built from a fact, before any role has been inferred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BaseQuery {
    pub select: Vec<SelectColumn>,
    pub from_table: String,
    pub joins: Vec<Join>,
    pub group_by: Vec<String>,
}

/// A query whose columns have been classified into fact roles.
///
/// Invariants kept by the passes:
/// - `group_by == grain_columns`
/// - every key of `aggregations` is in `measures`
/// - `dimension_columns` follows `foreign_keys` order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FactQuery {
    pub select: Vec<SelectColumn>,
    pub from_table: String,
    pub joins: Vec<Join>,
    pub group_by: Vec<String>,

    pub grain_columns: Vec<String>,
    pub foreign_keys: Vec<String>,
    pub measures: Vec<String>,
    pub dimension_columns: Vec<String>,
    /// Keyed by measure name, in measure order
    pub aggregations: IndexMap<String, MeasureAggregation>,
}

/// Which shape a [`Query`] currently has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Base,
    Fact,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Base => write!(f, "base query"),
            QueryKind::Fact => write!(f, "fact query"),
        }
    }
}

/// The value threaded through the pass pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Base(BaseQuery),
    Fact(FactQuery),
}

impl Query {
    pub fn kind(&self) -> QueryKind {
        match self {
            Query::Base(_) => QueryKind::Base,
            Query::Fact(_) => QueryKind::Fact,
        }
    }

    pub fn from_table(&self) -> &str {
        match self {
            Query::Base(q) => &q.from_table,
            Query::Fact(q) => &q.from_table,
        }
    }

    pub fn as_fact(&self) -> Option<&FactQuery> {
        match self {
            Query::Fact(q) => Some(q),
            Query::Base(_) => None,
        }
    }

    pub fn into_fact(self) -> Option<FactQuery> {
        match self {
            Query::Fact(q) => Some(q),
            Query::Base(_) => None,
        }
    }
}

impl From<BaseQuery> for Query {
    fn from(query: BaseQuery) -> Self {
        Query::Base(query)
    }
}

impl From<FactQuery> for Query {
    fn from(query: FactQuery) -> Self {
        Query::Fact(query)
    }
}
