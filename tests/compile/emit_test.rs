//! Artifact writer tests against a temporary directory.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use semview::compile::{compile_model, CompileOptions};
use semview::emit::{
    content_hash, ArtifactWriter, EmitError, EmitOptions, Manifest, MANIFEST_FILE,
};
use semview::model::{Dimension, Fact};
use semview::sql::Dialect;

#[path = "../common/mod.rs"]
mod common;

#[test]
fn test_writes_one_file_per_fact() {
    let dir = TempDir::new().unwrap();
    let report = compile_model(Arc::new(common::retail_model()), CompileOptions::default());

    let manifest = ArtifactWriter::new(dir.path()).write(&report).unwrap();

    let orders = fs::read_to_string(dir.path().join("facts/fact_orders.sql")).unwrap();
    assert_eq!(orders, report.sql_for("fact_orders").unwrap());
    assert!(dir.path().join("facts/fact_shipments.sql").exists());

    let paths: Vec<_> = manifest.artifacts.iter().map(|a| a.path.as_str()).collect();
    assert_eq!(paths, vec!["facts/fact_orders.sql", "facts/fact_shipments.sql"]);
}

#[test]
fn test_failed_facts_produce_no_file() {
    let dir = TempDir::new().unwrap();
    let model = common::orders_model()
        .with_fact(
            Fact::new("fact_visits")
                .with_grain(["visit_id"])
                .with_foreign_keys(["region_id"])
                .with_measures(["duration"]),
        )
        .with_dimension(Dimension::new("dim_store", "store_id"));
    let report = compile_model(Arc::new(model), CompileOptions::default());

    let manifest = ArtifactWriter::new(dir.path()).write(&report).unwrap();

    assert!(dir.path().join("facts/fact_orders.sql").exists());
    assert!(!dir.path().join("facts/fact_visits.sql").exists());
    assert_eq!(manifest.failures.len(), 1);
    assert_eq!(manifest.failures[0].fact, "fact_visits");
    assert_eq!(manifest.failures[0].stage, "bind_dimension_joins");
}

#[test]
fn test_manifest_hashes_file_content() {
    let dir = TempDir::new().unwrap();
    let report = compile_model(common::orders_model_arc(), CompileOptions::default());
    let writer = ArtifactWriter::new(dir.path());

    let manifest = writer.write(&report).unwrap();

    let json = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
    let on_disk: Manifest = serde_json::from_str(&json).unwrap();
    assert_eq!(on_disk, manifest);

    let content = fs::read_to_string(dir.path().join(&manifest.artifacts[0].path)).unwrap();
    assert_eq!(manifest.artifacts[0].sha256, content_hash(&content));
}

#[test]
fn test_wrapped_view_artifacts() {
    let dir = TempDir::new().unwrap();
    let options = CompileOptions::default().with_dialect(Dialect::Postgres);
    let report = compile_model(common::orders_model_arc(), options);

    let writer = ArtifactWriter::new(dir.path())
        .with_dialect(Dialect::Postgres)
        .with_options(EmitOptions {
            wrap_view: true,
            terminator: true,
            manifest: false,
            facts_subdir: "views".to_string(),
        });
    writer.write(&report).unwrap();

    let content = fs::read_to_string(dir.path().join("views/fact_orders.sql")).unwrap();
    assert!(content.starts_with("CREATE OR REPLACE VIEW \"fact_orders\" AS\nSELECT\n"));
    assert!(content.ends_with("GROUP BY \"order_id\";"));
    assert!(!dir.path().join(MANIFEST_FILE).exists());
}

#[test]
fn test_rewrite_is_stable() {
    let dir = TempDir::new().unwrap();
    let writer = ArtifactWriter::new(dir.path());

    let first = writer
        .write(&compile_model(common::orders_model_arc(), CompileOptions::default()))
        .unwrap();
    let second = writer
        .write(&compile_model(common::orders_model_arc(), CompileOptions::default()))
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_creates_missing_output_directory() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("output").join("sql");
    let report = compile_model(common::orders_model_arc(), CompileOptions::default());

    ArtifactWriter::new(&out).write(&report).unwrap();

    assert!(out.join("facts/fact_orders.sql").is_file());
    assert!(out.join(MANIFEST_FILE).is_file());
}

#[test]
fn test_fact_name_cannot_leave_output_directory() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let model = common::orders_model().with_fact(
        Fact::new("../escape")
            .with_grain(["row_id"])
            .with_measures(["value"]),
    );
    let report = compile_model(Arc::new(model), CompileOptions::default());
    assert!(report.sql_for("../escape").is_some());

    let err = ArtifactWriter::new(&out).write(&report).unwrap_err();

    assert!(matches!(err, EmitError::InvalidArtifactName { ref name } if name == "../escape"));
    assert!(!out.exists());
    assert!(!dir.path().join("escape.sql").exists());
}
