use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Record, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat Parquet file, one column per field
/// * `.json`    – `[{ "name": "Alice", "age": 25, ... }, ...]`
/// * `.csv`     – header row plus one line per record
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} records with fields {:?} from {}",
        dataset.len(),
        dataset.columns(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "id": 1, "name": "Alice", "age": 25, "city": "New York" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub(crate) fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut record = Record::new();
        for (key, val) in obj {
            record.insert(key.clone(), json_to_value(val));
        }
        records.push(record);
    }

    Ok(Dataset::from_records(records)?)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with field names, one record per line.
/// Cell types are guessed (integer, float, bool, otherwise text; empty → null).
fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

pub(crate) fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut record = Record::new();
        for (col_name, cell) in headers.iter().zip(row.iter()) {
            record.insert(col_name.clone(), guess_value_type(cell));
        }
        records.push(record);
    }

    Ok(Dataset::with_columns(headers, records)?)
}

fn guess_value_type(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    // "NaN" and "inf" stay text.
    if let Some(f) = s.parse::<f64>().ok().filter(|f| f.is_finite()) {
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file: every column becomes a field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let mut record = Record::new();
            for (col_idx, col_name) in columns.iter().enumerate() {
                let value = extract_value(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{col_name}'"))?;
                record.insert(col_name.clone(), value);
            }
            records.push(record);
        }
    }

    Ok(Dataset::with_columns(columns, records)?)
}

// -- Parquet / Arrow helpers --

/// Extract a single value from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Value::Text(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Value::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Value::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Value::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Value::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Value::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            Value::Bool(arr.value(row))
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_records() {
        let ds = parse_json(r#"[{"name": "A", "value": 10}, {"name": "B", "value": 2.5}]"#).unwrap();
        assert_eq!(ds.columns(), ["name", "value"]);
        assert_eq!(ds.records()[0].get("value"), Some(&Value::Integer(10)));
        assert_eq!(ds.records()[1].get("value"), Some(&Value::Float(2.5)));
    }

    #[test]
    fn json_keeps_field_order_of_the_file() {
        let ds = parse_json(r#"[{"name": "Alice", "age": 25, "city": "NY"}]"#).unwrap();
        assert_eq!(ds.columns(), ["name", "age", "city"]);
        let fields: Vec<&str> = ds.records()[0].field_names().collect();
        assert_eq!(fields, ["name", "age", "city"]);
    }

    #[test]
    fn json_rejects_mismatched_rows() {
        let err = parse_json(r#"[{"a": 1}, {"b": 2}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("row 1"));
        assert!(parse_json(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn csv_types_are_guessed() {
        let data = "name,age,ratio,active,note\nAlice,25,0.5,true,\n";
        let ds = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        let r = &ds.records()[0];
        assert_eq!(r.get("name"), Some(&Value::Text("Alice".into())));
        assert_eq!(r.get("age"), Some(&Value::Integer(25)));
        assert_eq!(r.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(r.get("active"), Some(&Value::Bool(true)));
        assert_eq!(r.get("note"), Some(&Value::Null));
    }

    #[test]
    fn csv_non_finite_cells_stay_text() {
        let ds = read_csv(csv::Reader::from_reader("v\n1\nNaN\ninf\n".as_bytes())).unwrap();
        assert_eq!(ds.records()[1].get("v"), Some(&Value::Text("NaN".into())));
        assert_eq!(ds.records()[2].get("v"), Some(&Value::Text("inf".into())));
        assert!(ds.numeric_columns().is_empty());
        assert!(matches!(
            crate::describe(&ds, "v"),
            Err(crate::InputError::NonNumericField { row: 1, .. })
        ));
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension: .xlsx"));
    }
}
