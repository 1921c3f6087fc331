use std::collections::{BTreeMap, BTreeSet};

use summary_lab::{
    summarize, AggregateSpec, Comparison, Dataset, InputError, Predicate, Record, SummaryReport,
    SummaryRequest, Value,
};

use crate::color::GroupColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

/// Collapsible explanation boxes in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Explanation {
    Filtering,
    Grouping,
    Statistics,
    Chart,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file or sample is loaded).
    pub dataset: Option<LoadedDataset>,

    /// Minimum-threshold text per numeric field, exactly as typed.
    pub min_thresholds: BTreeMap<String, String>,

    /// Selected value per categorical field (`None` = all).
    pub equals: BTreeMap<String, Option<Value>>,

    /// Group-by field (`None` = whole dataset).
    pub group_by: Option<String>,

    /// Numeric fields averaged per group.
    pub aggregate_fields: BTreeSet<String>,

    /// Field described in the statistics box.
    pub stats_field: Option<String>,

    pub chart_kind: ChartKind,

    pub expanded: BTreeSet<Explanation>,

    /// Sandbox input boxes.
    pub new_name: String,
    pub new_value: String,

    /// Last successful summary.
    pub report: Option<SummaryReport>,

    /// Why the current inputs could not be summarized.
    pub input_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    pub group_colors: Option<GroupColors>,
}

/// A loaded dataset and where it came from.
pub struct LoadedDataset {
    pub name: String,
    pub dataset: Dataset,
}

impl AppState {
    /// Ingest a newly loaded dataset, reset inputs and recompute.
    pub fn set_dataset(&mut self, name: impl Into<String>, dataset: Dataset) {
        let numeric: BTreeSet<String> = dataset.numeric_columns().into_iter().collect();

        self.min_thresholds = numeric.iter().map(|f| (f.clone(), String::new())).collect();
        self.equals = dataset
            .columns()
            .iter()
            .filter(|c| !numeric.contains(*c))
            .map(|c| (c.clone(), None))
            .collect();
        self.aggregate_fields = numeric.iter().filter(|f| f.as_str() != "id").cloned().collect();
        self.stats_field = self
            .aggregate_fields
            .iter()
            .next()
            .or_else(|| numeric.iter().next())
            .cloned();
        self.group_by = None;
        self.group_colors = None;
        self.report = None;
        self.status_message = None;

        self.dataset = Some(LoadedDataset {
            name: name.into(),
            dataset,
        });
        self.refresh();
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref().map(|s| &s.dataset)
    }

    /// Translate the current inputs into an engine request.
    pub fn request(&self) -> Result<SummaryRequest, InputError> {
        let mut request = SummaryRequest::new();
        for (field, text) in &self.min_thresholds {
            if !text.trim().is_empty() {
                request = request.filter(Predicate::parse(field.clone(), Comparison::Ge, text)?);
            }
        }
        for (field, selected) in &self.equals {
            if let Some(value) = selected {
                request = request.filter(Predicate::equals(field.clone(), value.clone()));
            }
        }
        request.group_key = self.group_by.clone();
        request.aggregates = self
            .aggregate_fields
            .iter()
            .map(|f| AggregateSpec::mean(f.clone()))
            .collect();
        request.stats_fields = self.stats_field.iter().cloned().collect();
        Ok(request)
    }

    /// Recompute the report after any input change.
    ///
    /// On invalid input the previous report stays visible next to the error.
    pub fn refresh(&mut self) {
        let Some(dataset) = self.dataset() else {
            return;
        };
        match self.request().and_then(|r| summarize(dataset, &r)) {
            Ok(report) => {
                self.report = Some(report);
                self.input_error = None;
            }
            Err(e) => {
                log::debug!("summary rejected: {e}");
                self.input_error = Some(e.to_string());
            }
        }
    }

    pub fn set_min_threshold(&mut self, field: &str, text: String) {
        self.min_thresholds.insert(field.to_string(), text);
        self.refresh();
    }

    pub fn set_equals(&mut self, field: &str, value: Option<Value>) {
        self.equals.insert(field.to_string(), value);
        self.refresh();
    }

    /// Set group-by field and rebuild the group colours.
    pub fn set_group_by(&mut self, field: Option<String>) {
        self.group_by = field;
        self.rebuild_group_colors();
        self.refresh();
    }

    fn rebuild_group_colors(&mut self) {
        self.group_colors = match (&self.group_by, self.dataset()) {
            (Some(f), Some(ds)) => ds.unique_values(f).map(GroupColors::new),
            _ => None,
        };
    }

    pub fn set_stats_field(&mut self, field: Option<String>) {
        self.stats_field = field;
        self.refresh();
    }

    pub fn toggle_aggregate(&mut self, field: &str) {
        if !self.aggregate_fields.remove(field) {
            self.aggregate_fields.insert(field.to_string());
        }
        self.refresh();
    }

    pub fn toggle_explanation(&mut self, which: Explanation) {
        if !self.expanded.remove(&which) {
            self.expanded.insert(which);
        }
    }

    /// Whether the loaded dataset has the sandbox shape (`name`, `value`).
    pub fn is_sandbox(&self) -> bool {
        self.dataset()
            .is_some_and(|ds| ds.columns() == ["name", "value"])
    }

    /// Append the sandbox input boxes as a new data point.
    pub fn add_point(&mut self) {
        let name = self.new_name.trim().to_string();
        if name.is_empty() || self.new_value.trim().is_empty() {
            self.status_message = Some("Enter a name and a value".to_string());
            return;
        }
        let value = match parse_number(&self.new_value) {
            Some(v) => v,
            None => {
                self.status_message = Some(format!("'{}' is not a number", self.new_value.trim()));
                return;
            }
        };
        let Some(source) = &mut self.dataset else {
            return;
        };
        match source
            .dataset
            .appended(Record::new().with("name", name).with("value", value))
        {
            Ok(ds) => {
                source.dataset = ds;
                self.new_name.clear();
                self.new_value.clear();
                self.status_message = None;
                self.rebuild_group_colors();
                self.refresh();
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    pub fn remove_point(&mut self, index: usize) {
        if let Some(source) = &mut self.dataset {
            source.dataset = source.dataset.without(index);
            self.rebuild_group_colors();
            self.refresh();
        }
    }
}

/// Integer when possible, otherwise a finite float.
fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Integer(i));
    }
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Value::Float)
}
