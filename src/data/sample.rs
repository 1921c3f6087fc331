//! Built-in datasets used by the lab and its tests.

use super::model::{Dataset, Record};

const EMPLOYEES: [(i64, &str, i64, &str, i64); 10] = [
    (1, "Alice", 25, "New York", 50000),
    (2, "Bob", 30, "Los Angeles", 60000),
    (3, "Charlie", 35, "Chicago", 70000),
    (4, "David", 28, "New York", 55000),
    (5, "Eva", 22, "Los Angeles", 48000),
    (6, "Frank", 40, "Chicago", 80000),
    (7, "Grace", 32, "New York", 65000),
    (8, "Henry", 27, "Los Angeles", 52000),
    (9, "Ivy", 38, "Chicago", 75000),
    (10, "Jack", 29, "New York", 58000),
];

const SANDBOX: [(&str, i64); 4] = [("A", 10), ("B", 15), ("C", 8), ("D", 12)];

/// Ten employees with `id`, `name`, `age`, `city` and `salary`.
pub fn employees() -> Dataset {
    let records = EMPLOYEES
        .iter()
        .map(|&(id, name, age, city, salary)| {
            Record::new()
                .with("id", id)
                .with("name", name)
                .with("age", age)
                .with("city", city)
                .with("salary", salary)
        })
        .collect();
    Dataset::from_records(records).unwrap_or_else(|_| unreachable!("static rows share one schema"))
}

/// Four labelled points (`name`, `value`) for the chart sandbox.
pub fn sandbox_points() -> Dataset {
    let records = SANDBOX
        .iter()
        .map(|&(name, value)| Record::new().with("name", name).with("value", value))
        .collect();
    Dataset::from_records(records).unwrap_or_else(|_| unreachable!("static rows share one schema"))
}
