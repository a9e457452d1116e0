use semview::model::Fact;
use semview::passes::{BindMeasureAggregation, NormalizeFactQuery, Pass, PassError};
use semview::sql::builder::build_fact_query;
use semview::sql::query::{AggregateOp, BaseQuery, FactQuery, MeasureAggregation, Query, QueryKind};

fn normalized(fact: &Fact) -> Query {
    let base: Query = build_fact_query(fact).unwrap().into();
    NormalizeFactQuery::new().run(&base).unwrap()
}

fn orders() -> Query {
    normalized(
        &Fact::new("fact_orders")
            .with_grain(["order_id"])
            .with_foreign_keys(["customer_id"])
            .with_measures(["total_amount", "quantity", "discount"]),
    )
}

fn bind(binder: &BindMeasureAggregation, query: &Query) -> FactQuery {
    binder.run(query).unwrap().into_fact().unwrap()
}

#[test]
fn test_default_is_sum_for_every_measure() {
    let fact = bind(&BindMeasureAggregation::new(), &orders());

    let bound: Vec<_> = fact.aggregations.values().cloned().collect();
    assert_eq!(
        bound,
        vec![
            MeasureAggregation::new("total_amount", AggregateOp::Sum),
            MeasureAggregation::new("quantity", AggregateOp::Sum),
            MeasureAggregation::new("discount", AggregateOp::Sum),
        ]
    );
}

#[test]
fn test_keys_follow_measure_order() {
    let fact = bind(&BindMeasureAggregation::new(), &orders());

    let keys: Vec<_> = fact.aggregations.keys().cloned().collect();
    assert_eq!(keys, fact.measures);
}

#[test]
fn test_overrides_and_default() {
    let binder = BindMeasureAggregation::new()
        .with_default(AggregateOp::Avg)
        .with_override("quantity", AggregateOp::Count)
        .with_overrides([("discount", AggregateOp::Max)]);

    let fact = bind(&binder, &orders());
    assert_eq!(fact.aggregations["total_amount"].operator, AggregateOp::Avg);
    assert_eq!(fact.aggregations["quantity"].operator, AggregateOp::Count);
    assert_eq!(fact.aggregations["discount"].operator, AggregateOp::Max);
}

#[test]
fn test_override_for_unknown_measure_is_ignored() {
    let binder = BindMeasureAggregation::new().with_override("margin", AggregateOp::Min);
    let fact = bind(&binder, &orders());

    assert_eq!(fact.aggregations.len(), 3);
    assert!(!fact.aggregations.contains_key("margin"));
}

#[test]
fn test_other_fields_pass_through() {
    let before = orders().into_fact().unwrap();
    let after = bind(&BindMeasureAggregation::new(), &Query::Fact(before.clone()));

    assert_eq!(after.grain_columns, before.grain_columns);
    assert_eq!(after.foreign_keys, before.foreign_keys);
    assert_eq!(after.dimension_columns, before.dimension_columns);
    assert_eq!(after.measures, before.measures);
    assert_eq!(after.joins, before.joins);
    assert_eq!(after.select, before.select);
}

#[test]
fn test_rebinding_replaces_aggregations() {
    let first = BindMeasureAggregation::new().with_default(AggregateOp::Min);
    let once = first.run(&orders()).unwrap();
    let twice = bind(&BindMeasureAggregation::new(), &once);

    assert!(twice
        .aggregations
        .values()
        .all(|a| a.operator == AggregateOp::Sum));
}

#[test]
fn test_unpromoted_query_is_rejected() {
    let query = Query::Base(BaseQuery {
        from_table: "fact_orders".to_string(),
        ..Default::default()
    });

    assert_eq!(
        BindMeasureAggregation::new().run(&query).unwrap_err(),
        PassError::VariantMismatch {
            pass: "bind_measure_aggregation",
            expected: QueryKind::Fact,
            found: QueryKind::Base,
        }
    );
}
