//! Write the built-in datasets to disk so the loader can be tried on real files:
//! `employees.parquet`, `employees.csv` and `sandbox.json` in the current directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use summary_lab::data::sample;
use summary_lab::{Dataset, Value};

fn text_column(ds: &Dataset, field: &str) -> ArrayRef {
    let values: Vec<String> = ds
        .records()
        .iter()
        .map(|r| r.get(field).map(Value::to_string).unwrap_or_default())
        .collect();
    Arc::new(StringArray::from(values))
}

fn int_column(ds: &Dataset, field: &str) -> ArrayRef {
    let values: Vec<Option<i64>> = ds
        .records()
        .iter()
        .map(|r| match r.get(field) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        })
        .collect();
    Arc::new(Int64Array::from(values))
}

fn write_parquet(ds: &Dataset, path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, true),
        Field::new("name", DataType::Utf8, false),
        Field::new("age", DataType::Int64, true),
        Field::new("city", DataType::Utf8, false),
        Field::new("salary", DataType::Int64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            int_column(ds, "id"),
            text_column(ds, "name"),
            int_column(ds, "age"),
            text_column(ds, "city"),
            int_column(ds, "salary"),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(ds: &Dataset, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(ds.columns())?;
    for record in ds.records() {
        writer.write_record(ds.columns().iter().map(|c| match record.get(c) {
            Some(Value::Null) | None => String::new(),
            Some(v) => v.to_string(),
        }))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(ds: &Dataset, path: &str) -> Result<()> {
    let text = serde_json::to_string_pretty(ds.records()).context("serializing records")?;
    std::fs::write(path, text).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let employees = sample::employees();
    write_parquet(&employees, "employees.parquet")?;
    write_csv(&employees, "employees.csv")?;
    write_json(&sample::sandbox_points(), "sandbox.json")?;

    println!(
        "Wrote {} employees to employees.parquet / employees.csv and the sandbox points to sandbox.json",
        employees.len()
    );
    Ok(())
}
