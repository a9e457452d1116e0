//! SQL side of the compiler.
//!
//! - [`query`] - SQL IR: select columns, joins, aggregations, base and fact queries
//! - [`builder`] - semantic IR to base queries
//! - [`render`] - fact queries to SQL text
//! - [`dialect`] - identifier quoting and view syntax per dialect

pub mod builder;
pub mod dialect;
pub mod query;
pub mod render;

pub use builder::{build_fact_query, build_queries, BuildError};
pub use dialect::{Dialect, SqlDialect};
pub use query::{
    AggregateOp, BaseQuery, FactQuery, Join, JoinType, MeasureAggregation, Predicate, Query,
    QueryKind, SelectColumn,
};
pub use render::{render, RenderError, Renderer};
