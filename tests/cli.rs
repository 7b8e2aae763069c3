mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use common::{ORDERS_CSV, ORDERS_PLAN, TestWorkspace};

fn csv_coerce() -> Command {
    Command::cargo_bin("csv-coerce").expect("binary exists")
}

#[test]
fn compile_prints_one_expression_per_column() {
    let workspace = TestWorkspace::new();
    let plan = workspace.write("orders.yaml", ORDERS_PLAN);
    csv_coerce()
        .args(["compile", "-p", plan.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("order_no: (SELECT CASE WHEN ROUND(__number.__value) BETWEEN"))
        .stdout(contains("Placed: CASE WHEN \"Placed\" ~ "))
        .stdout(contains("Tags: NULLIF(ARRAY_TO_STRING("))
        .stdout(contains("Status: CASE WHEN \"Status\" IN ('open', 'closed')"));
}

#[test]
fn compile_statement_wraps_insert() {
    let workspace = TestWorkspace::new();
    let plan = workspace.write("orders.yaml", ORDERS_PLAN);
    csv_coerce()
        .args(["compile", "-p", plan.to_str().unwrap(), "--statement"])
        .assert()
        .success()
        .stdout(contains(
            "INSERT INTO orders (\"order_no\", \"Placed\", \"Paid\", \"Tags\", \"Status\")",
        ))
        .stdout(contains("FROM staging.raw_orders;"));
}

#[test]
fn compile_fails_for_unsupported_column_type() {
    let workspace = TestWorkspace::new();
    let plan = workspace.write(
        "bad.yaml",
        "source: raw\ncolumns:\n  - name: scan\n    datatype: Attachment\n",
    );
    csv_coerce()
        .args(["compile", "-p", plan.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Column 'scan'"))
        .stderr(contains("coercion not implemented for column type 'Attachment'"));
}

#[test]
fn compile_fails_for_zero_text_limit() {
    let workspace = TestWorkspace::new();
    let plan = workspace.write(
        "bad.yaml",
        "source: raw\ncolumns:\n  - name: note\n    datatype: SingleLineText\n    limit: 0\n",
    );
    csv_coerce()
        .args(["compile", "-p", plan.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Compiling column 'note'"))
        .stderr(contains("invalid limit 0 for column type 'SingleLineText'"));
}

#[test]
fn compile_fails_for_unknown_date_format() {
    let workspace = TestWorkspace::new();
    let plan = workspace.write(
        "bad.yaml",
        "source: raw\ndate_format: iso\ncolumns:\n  - name: when\n    datatype: Date\n",
    );
    csv_coerce()
        .args(["compile", "-p", plan.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("unknown date format 'iso'"));
}

#[test]
fn compile_uses_catalog_referenced_by_plan() {
    let workspace = TestWorkspace::new();
    workspace.write(
        "catalog.yaml",
        r#"
date_formats:
  iso:
    - token: YYYY-MM-DD
      pattern: "[0-9]{4}-[0-9]{2}-[0-9]{2}"
time_formats:
  - token: HH24:MI
    pattern: "[0-9]{2}:[0-9]{2}"
"#,
    );
    let plan = workspace.write(
        "plan.yaml",
        "source: raw\ncatalog: catalog.yaml\ndate_format: iso\ncolumns:\n  - name: when\n    datatype: Date\n",
    );
    csv_coerce()
        .args(["compile", "-p", plan.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            "when: CASE WHEN \"when\" ~ '^[0-9]{4}-[0-9]{2}-[0-9]{2}$' \
             THEN TO_DATE(\"when\", 'YYYY-MM-DD') ELSE NULL END\n",
        );
}

#[test]
fn format_renders_checkbox_as_digits() {
    let workspace = TestWorkspace::new();
    let plan = workspace.write("orders.yaml", ORDERS_PLAN);
    csv_coerce()
        .args(["format", "-p", plan.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains(
            "CASE \"Paid\" WHEN TRUE THEN '1' WHEN FALSE THEN '0' ELSE NULL END AS \"Paid\"",
        ))
        .stdout(contains("FROM orders;"));
}

#[test]
fn preview_shows_coerced_values() {
    let workspace = TestWorkspace::new();
    let plan = workspace.write("orders.yaml", ORDERS_PLAN);
    let input = workspace.write("orders.csv", ORDERS_CSV);
    csv_coerce()
        .args([
            "preview",
            "-p",
            plan.to_str().unwrap(),
            "-i",
            input.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("order_no"))
        .stdout(contains("1001      2024-04-03  1     gift,express  open"))
        .stdout(contains("7         2024-12-31  NULL  NULL          NULL"));
}

#[test]
fn preview_reports_missing_columns() {
    let workspace = TestWorkspace::new();
    let plan = workspace.write("orders.yaml", ORDERS_PLAN);
    let input = workspace.write("orders.csv", "Order No,Placed\n1,01/01/2024\n");
    csv_coerce()
        .args([
            "preview",
            "-p",
            plan.to_str().unwrap(),
            "-i",
            input.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Column 'Paid' not found"));
}

#[test]
fn types_lists_every_semantic_type() {
    csv_coerce()
        .arg("types")
        .assert()
        .success()
        .stdout(contains("Checkbox\tlogical"))
        .stdout(contains("MultiSelect\tenumerated"))
        .stdout(contains("URL\ttext"));
}

#[test]
fn catalog_prints_builtin_formats() {
    csv_coerce()
        .arg("catalog")
        .assert()
        .success()
        .stdout(contains("date_formats:"))
        .stdout(contains("dmy:"))
        .stdout(contains("time_formats:"))
        .stdout(contains("HH12:MI AM").and(contains("mdy:")));
}
