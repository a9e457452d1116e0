use indexmap::IndexMap;
use insta::assert_snapshot;
use sqlparser::dialect::{GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;
use std::sync::Arc;

use semview::model::{Dimension, Fact, SemanticModel};
use semview::passes::{BindMeasureAggregation, Pipeline};
use semview::sql::builder::build_fact_query;
use semview::sql::query::{AggregateOp, FactQuery, MeasureAggregation};
use semview::sql::render::{render, RenderError, Renderer};
use semview::sql::Dialect;

#[path = "../common/mod.rs"]
mod common;

fn compiled(model: SemanticModel, fact: &str, aggregation: BindMeasureAggregation) -> FactQuery {
    let model = Arc::new(model);
    let base = build_fact_query(model.fact(fact).unwrap()).unwrap();
    Pipeline::with_aggregation(Arc::clone(&model), aggregation)
        .run(&base.into())
        .unwrap()
        .into_fact()
        .unwrap()
}

fn orders() -> FactQuery {
    compiled(common::orders_model(), "fact_orders", BindMeasureAggregation::new())
}

fn aggregations(entries: &[(&str, AggregateOp)]) -> IndexMap<String, MeasureAggregation> {
    entries
        .iter()
        .map(|(m, op)| (m.to_string(), MeasureAggregation::new(*m, *op)))
        .collect()
}

// ============================================================================
// Generic output
// ============================================================================

#[test]
fn test_render_single_join() {
    let sql = render(&orders()).unwrap();
    assert_eq!(sql, common::ORDERS_SQL);
    assert_snapshot!(sql, @r"
SELECT
  order_id,
  dim_customer.customer_id,
  SUM(total_amount) AS total_amount
FROM fact_orders
LEFT JOIN dim_customer ON fact_orders.customer_id = dim_customer.customer_id
GROUP BY order_id
");
}

#[test]
fn test_render_multiple_joins_and_overrides() {
    let binder = BindMeasureAggregation::new().with_override("quantity", AggregateOp::Count);
    let query = compiled(common::retail_model(), "fact_orders", binder);

    assert_snapshot!(render(&query).unwrap(), @r"
SELECT
  order_id,
  dim_customer.customer_id,
  dim_product.product_id,
  COUNT(quantity) AS quantity,
  SUM(total_amount) AS total_amount
FROM fact_orders
LEFT JOIN dim_customer ON fact_orders.customer_id = dim_customer.customer_id
LEFT JOIN dim_product ON fact_orders.product_id = dim_product.product_id
GROUP BY order_id
");
}

#[test]
fn test_render_without_joins() {
    let model = SemanticModel::new().with_fact(
        Fact::new("fact_events")
            .with_grain(["event_id", "event_type"])
            .with_measures(["duration"]),
    );
    let query = compiled(model, "fact_events", BindMeasureAggregation::new());

    let sql = render(&query).unwrap();
    assert!(!sql.contains("JOIN"));
    assert_snapshot!(sql, @r"
SELECT
  event_id,
  event_type,
  SUM(duration) AS duration
FROM fact_events
GROUP BY event_id, event_type
");
}

#[test]
fn test_degenerate_key_renders_once() {
    let query = compiled(common::retail_model(), "fact_shipments", BindMeasureAggregation::new());

    assert_snapshot!(render(&query).unwrap(), @r"
SELECT
  shipment_id,
  store_id,
  dim_carrier.carrier_id,
  SUM(shipped_units) AS shipped_units
FROM fact_shipments
LEFT JOIN dim_carrier ON fact_shipments.carrier_id = dim_carrier.carrier_id
GROUP BY shipment_id, store_id
");
}

#[test]
fn test_dimension_column_equal_to_grain_is_not_repeated() {
    let query = FactQuery {
        from_table: "fact_orders".to_string(),
        group_by: vec!["order_id".to_string()],
        grain_columns: vec!["order_id".to_string()],
        dimension_columns: vec!["order_id".to_string(), "order_date".to_string()],
        ..Default::default()
    };

    assert_eq!(
        render(&query).unwrap(),
        "SELECT\n  order_id,\n  order_date\nFROM fact_orders\nGROUP BY order_id"
    );
}

#[test]
fn test_aggregations_follow_measure_order() {
    let query = FactQuery {
        from_table: "fact_orders".to_string(),
        group_by: vec!["order_id".to_string()],
        grain_columns: vec!["order_id".to_string()],
        measures: vec!["quantity".to_string(), "total_amount".to_string()],
        aggregations: aggregations(&[
            ("total_amount", AggregateOp::Sum),
            ("quantity", AggregateOp::Max),
        ]),
        ..Default::default()
    };

    let sql = render(&query).unwrap();
    let quantity = sql.find("MAX(quantity)").unwrap();
    let total = sql.find("SUM(total_amount)").unwrap();
    assert!(quantity < total);
}

#[test]
fn test_no_terminator_and_no_wrapper() {
    let sql = render(&orders()).unwrap();
    assert!(sql.starts_with("SELECT\n"));
    assert!(!sql.ends_with(';'));
    assert!(!sql.ends_with('\n'));
    assert!(!sql.contains("CREATE"));
}

// ============================================================================
// Dialects
// ============================================================================

#[test]
fn test_render_postgres() {
    let sql = Renderer::new(Dialect::Postgres).render(&orders()).unwrap();
    assert_snapshot!(sql, @r#"
SELECT
  "order_id",
  "dim_customer"."customer_id",
  SUM("total_amount") AS "total_amount"
FROM "fact_orders"
LEFT JOIN "dim_customer" ON "fact_orders"."customer_id" = "dim_customer"."customer_id"
GROUP BY "order_id"
"#);
}

#[test]
fn test_render_tsql() {
    let sql = Renderer::new(Dialect::TSql).render(&orders()).unwrap();
    assert_snapshot!(sql, @r"
SELECT
  [order_id],
  [dim_customer].[customer_id],
  SUM([total_amount]) AS [total_amount]
FROM [fact_orders]
LEFT JOIN [dim_customer] ON [fact_orders].[customer_id] = [dim_customer].[customer_id]
GROUP BY [order_id]
");
}

#[test]
fn test_dialects_keep_ordering() {
    let generic = render(&orders()).unwrap();
    let unquote = |sql: String| sql.replace(['"', '`', '[', ']'], "");

    for dialect in [Dialect::Postgres, Dialect::DuckDb, Dialect::MySql, Dialect::TSql] {
        let sql = Renderer::new(dialect).render(&orders()).unwrap();
        assert_eq!(unquote(sql), generic, "dialect {}", dialect);
    }
}

#[test]
fn test_rendered_sql_parses() {
    let query = compiled(common::retail_model(), "fact_orders", BindMeasureAggregation::new());

    let generic = render(&query).unwrap();
    assert_eq!(Parser::parse_sql(&GenericDialect {}, &generic).unwrap().len(), 1);

    let postgres = Renderer::new(Dialect::Postgres).render(&query).unwrap();
    assert!(Parser::parse_sql(&PostgreSqlDialect {}, &postgres).is_ok());

    let mysql = Renderer::new(Dialect::MySql).render(&query).unwrap();
    assert!(Parser::parse_sql(&MySqlDialect {}, &mysql).is_ok());

    let tsql = Renderer::new(Dialect::TSql).render(&query).unwrap();
    assert!(Parser::parse_sql(&MsSqlDialect {}, &tsql).is_ok());
}

// ============================================================================
// Contract violations
// ============================================================================

#[test]
fn test_aggregation_for_unknown_measure() {
    let mut query = orders();
    query.aggregations = aggregations(&[("discount", AggregateOp::Sum)]);

    match render(&query) {
        Err(RenderError::ContractViolation { fact, reason }) => {
            assert_eq!(fact, "fact_orders");
            assert!(reason.contains("discount"));
        }
        other => panic!("expected ContractViolation, got {:?}", other),
    }
}

#[test]
fn test_group_by_must_match_grain() {
    let mut query = orders();
    query.group_by.push("customer_id".to_string());

    assert!(matches!(
        render(&query),
        Err(RenderError::ContractViolation { .. })
    ));
}

#[test]
fn test_empty_select_is_rejected() {
    let query = FactQuery {
        from_table: "fact_empty".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        render(&query),
        Err(RenderError::ContractViolation { .. })
    ));
}

#[test]
fn test_join_uses_dimension_table_name() {
    let model = SemanticModel::new()
        .with_fact(
            Fact::new("fact_sales")
                .with_grain(["sale_id"])
                .with_foreign_keys(["region_id"])
                .with_measures(["amount"]),
        )
        .with_dimension(Dimension::new("dim_geo", "region_id"));

    let sql = render(&compiled(model, "fact_sales", BindMeasureAggregation::new())).unwrap();
    assert!(sql.contains("LEFT JOIN dim_geo ON fact_sales.region_id = dim_geo.region_id"));
}
