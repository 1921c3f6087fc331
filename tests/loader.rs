use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use summary_lab::data::loader::load_file;
use summary_lab::{describe, group_and_aggregate, AggregateSpec, Aggregator, Value};

fn temp_with(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn csv_file_feeds_the_engine() {
    let file = temp_with(
        ".csv",
        "name,age,city,salary\nAlice,25,New York,50000\nBob,30,Los Angeles,60000\nDavid,28,New York,55000\n",
    );
    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.columns(), ["name", "age", "city", "salary"]);

    let groups = group_and_aggregate(&ds, Some("city"), &[AggregateSpec::mean("salary")]).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].get("salary", Aggregator::Mean), Some(52500.0));
}

#[test]
fn json_file_with_uppercase_extension() {
    let file = temp_with(".JSON", r#"[{"name": "A", "value": 10}, {"name": "B", "value": 15}]"#);
    let ds = load_file(file.path()).unwrap();
    assert_eq!(describe(&ds, "value").unwrap().mean, 12.5);
}

#[test]
fn ragged_csv_is_an_error() {
    let file = temp_with(".csv", "a,b\n1,2\n3\n");
    let err = load_file(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("CSV row"));
}

#[test]
fn parquet_columns_become_fields() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("city", DataType::Utf8, true),
        Field::new("age", DataType::Int32, false),
        Field::new("score", DataType::Float64, false),
        Field::new("active", DataType::Boolean, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![Some("Chicago"), None])),
        Arc::new(Int32Array::from(vec![35, 40])),
        Arc::new(Float64Array::from(vec![0.5, 1.5])),
        Arc::new(BooleanArray::from(vec![true, false])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.columns(), ["city", "age", "score", "active"]);
    assert_eq!(ds.records()[0].get("age"), Some(&Value::Integer(35)));
    assert_eq!(ds.records()[1].get("city"), Some(&Value::Null));
    assert_eq!(ds.records()[1].get("active"), Some(&Value::Bool(false)));
    assert_eq!(describe(&ds, "score").unwrap().max, 1.5);
}

#[test]
fn whole_floats_written_as_text_reload_as_floats() {
    let values = [Value::Float(1.0), Value::Float(2.5), Value::Integer(3)];
    let body: Vec<String> = values.iter().map(Value::to_string).collect();
    let file = temp_with(".csv", &format!("v\n{}\n", body.join("\n")));

    let ds = load_file(file.path()).unwrap();
    let loaded: Vec<&Value> = ds.records().iter().filter_map(|r| r.get("v")).collect();
    assert_eq!(loaded, values.iter().collect::<Vec<_>>());
}
