//! Property tests for SELECT ordering and determinism.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use semview::compile::{compile_model, CompileOptions};
use semview::model::{Dimension, Fact, SemanticModel};
use semview::passes::{NormalizeFactQuery, Pass};
use semview::sql::builder::build_fact_query;
use semview::sql::query::Query;

/// Column names for one generated fact.
#[derive(Debug, Clone)]
struct Shape {
    grain: Vec<String>,
    foreign_keys: Vec<String>,
    measures: Vec<String>,
}

fn shape() -> impl Strategy<Value = Shape> {
    ("[a-z]{1,8}", 1usize..4, 0usize..4, 0usize..5).prop_map(|(prefix, g, f, m)| Shape {
        grain: (0..g).map(|i| format!("{}_g{}", prefix, i)).collect(),
        foreign_keys: (0..f).map(|i| format!("{}_{}_id", prefix, i)).collect(),
        measures: (0..m).map(|i| format!("{}_m{}", prefix, i)).collect(),
    })
}

fn model(shape: &Shape) -> SemanticModel {
    let mut model = SemanticModel::new().with_fact(
        Fact::new("fact_generated")
            .with_grain(shape.grain.clone())
            .with_foreign_keys(shape.foreign_keys.clone())
            .with_measures(shape.measures.clone()),
    );
    for (i, fk) in shape.foreign_keys.iter().enumerate() {
        model = model.with_dimension(Dimension::new(format!("dim_{}", i), fk.as_str()));
    }
    model
}

fn select_list(sql: &str) -> Vec<String> {
    let body = sql
        .strip_prefix("SELECT\n  ")
        .and_then(|rest| rest.split("\nFROM ").next())
        .unwrap_or_default();
    body.split(",\n  ").map(str::to_string).collect()
}

fn alias(column: &str) -> &str {
    match column.rsplit_once(" AS ") {
        Some((_, alias)) => alias,
        None => column.rsplit('.').next().unwrap_or(column),
    }
}

proptest! {
    #[test]
    fn select_order_is_grain_then_dimensions_then_measures(shape in shape()) {
        let report = compile_model(Arc::new(model(&shape)), CompileOptions::default());
        prop_assert!(report.is_success());

        let expected: Vec<String> = shape
            .grain
            .iter()
            .cloned()
            .chain(
                shape
                    .foreign_keys
                    .iter()
                    .enumerate()
                    .map(|(i, fk)| format!("dim_{}.{}", i, fk)),
            )
            .chain(shape.measures.iter().map(|m| format!("SUM({}) AS {}", m, m)))
            .collect();

        prop_assert_eq!(select_list(&report.compiled[0].sql), expected);
    }

    #[test]
    fn select_has_no_repeated_alias(shape in shape()) {
        let report = compile_model(Arc::new(model(&shape)), CompileOptions::default());
        let columns = select_list(&report.compiled[0].sql);

        let mut seen = HashSet::new();
        for column in &columns {
            prop_assert!(seen.insert(alias(column)), "repeated alias in {:?}", columns);
        }
    }

    #[test]
    fn compiling_twice_is_byte_identical(shape in shape()) {
        let model = Arc::new(model(&shape));

        let first = compile_model(Arc::clone(&model), CompileOptions::default());
        let second = compile_model(Arc::clone(&model), CompileOptions::default().with_parallel(true));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn normalize_assigns_each_alias_one_role(shape in shape()) {
        let fact = model(&shape).facts["fact_generated"].clone();
        let query: Query = build_fact_query(&fact).unwrap().into();
        let normalized = NormalizeFactQuery::new().run(&query).unwrap().into_fact().unwrap();

        prop_assert_eq!(&normalized.grain_columns, &shape.grain);
        prop_assert_eq!(&normalized.foreign_keys, &shape.foreign_keys);
        prop_assert_eq!(&normalized.measures, &shape.measures);
        prop_assert_eq!(&normalized.dimension_columns, &shape.foreign_keys);
    }
}
